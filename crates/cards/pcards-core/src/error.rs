//! Error types for the card navigator.

use serde::{Deserialize, Serialize};

/// Reason a navigation request was dropped.
///
/// Rejections never surface to the page. [`crate::Navigator::request_card`]
/// logs them and reports them as [`crate::NavEvent::RequestDropped`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Rejection {
    /// A transition is still inside its blocking window.
    #[error("transition in flight")]
    Busy,

    /// No card exists at the requested index.
    #[error("no card at index {index}")]
    MissingTarget { index: usize },

    /// The card currently shown could not be found.
    #[error("no current card at index {index}")]
    MissingCurrent { index: usize },
}

/// Failures decoding host-supplied configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config json parse error: {0}")]
    Json(#[from] serde_json::Error),
}
