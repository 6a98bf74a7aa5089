//! doubledollar Web APIs
//!
//! The browser context pieces a page talks to besides its document:
//! local storage, the cookie jar, navigator info, location, speech
//! synthesis, vibration and 2D canvas contexts.

pub mod storage;
pub mod cookies;
pub mod navigator;
pub mod location;
pub mod speech;
pub mod vibration;
pub mod canvas;

pub use storage::{Storage, StorageError};
pub use cookies::{Cookie, CookieJar, SameSite, decode_uri_component};
pub use navigator::{ClientInfo, NavigatorConfig, DEFAULT_USER_AGENT};
pub use location::Location;
pub use speech::{SpeechSynthesis, Utterance};
pub use vibration::{VibrationPattern, Vibrator, MAX_PATTERN_LEN, MAX_PULSE_MS};
pub use canvas::{CanvasContext2d, DrawOp};

/// Web API error
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
