//! doubledollar reactive binding
//!
//! Binds a root's markup to a key/value data map. The root's markup is
//! captured once as a template of `{{ key }}` placeholders; writing a new
//! value to a bound key re-renders the whole template into the root.

mod value;
mod template;
mod binding;

pub use value::Value;
pub use template::{Template, Segment};
pub use binding::{Binding, Interceptor, MarkupRoot};

/// Binding errors
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error("root element not found: {0}")]
    RootNotFound(String),

    #[error("'{0}' is not a bound data key")]
    UnknownKey(String),

    #[error("root element error: {0}")]
    Root(String),
}
