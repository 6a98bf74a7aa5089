//! doubledollar
//!
//! A selector-based convenience wrapper over a page (`Page::select` is the
//! `$$` entry point) and `React`, which keeps an element's `{{ key }}`
//! placeholders in sync with a data map.
//!
//! ```no_run
//! use doubledollar::{Page, PageConfig, React, ReactOptions};
//!
//! let page = Page::from_html(r#"<div id="app">Hello {{ name }}</div>"#, PageConfig::default())?;
//! let mut app = React::new(&page, ReactOptions::new("#app").with("name", "A"))?;
//! app.set("name", "B")?;
//! assert_eq!(page.select("#app")?.text()?, "Hello B");
//! # Ok::<(), doubledollar::Error>(())
//! ```

mod config;
mod page;
mod react;
mod selection;

pub use config::PageConfig;
pub use page::Page;
pub use react::{ElementRoot, React, ReactOptions, Target};
pub use selection::{Selection, StorageAction, FINGERPRINT_KEY};

pub use dd_dom::{Document, DomError, Event, NodeId};
pub use dd_net::{Fetcher, HttpFetcher, MemoryFetcher, NetError};
pub use dd_reactive::{BindError, Value};
pub use dd_web::{ClientInfo, NavigatorConfig, StorageError, VibrationPattern, WebError};

/// doubledollar errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no element matches '{0}'")]
    NoElement(String),

    #[error("element {0} is not a <canvas>")]
    NotCanvas(NodeId),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Net(#[from] NetError),

    #[error(transparent)]
    Web(#[from] WebError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("config file error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    ConfigJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
