//! Error types for folio operations.

use thiserror::Error;

/// Errors that escape the page runtime.
///
/// Most runtime problems (unknown routes, missing post content, broken
/// storage) are logged and recovered locally. Only a template that lacks an
/// essential anchor, an unparsable selector, or a bad config surface here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required element: {0}")]
    MissingElement(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
