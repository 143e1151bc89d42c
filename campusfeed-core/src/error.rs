//! Error types for the campusfeed ecosystem.

use thiserror::Error;

/// Errors that can occur while fetching or normalizing feeds.
///
/// Record-level noise (missing attributes, unparsable timestamps, malformed
/// course links) is not an error: the pipeline drops such records silently.
#[derive(Error, Debug)]
pub enum CampusError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Feed response is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No course record found for '{0}'")]
    CourseLookup(String),
}

/// Result type alias for campusfeed operations.
pub type CampusResult<T> = Result<T, CampusError>;
