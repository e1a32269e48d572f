// src/error.rs
// =============================================================================
// Library-wide error type.
//
// Almost every failure during an audit is absorbed and written into the
// report as data, so these errors mostly travel a short distance: from a
// checker up to the code that turns them into a `parse_error` or `error`
// field. Only configuration problems (a bad base URL, a client that cannot
// be built) and output problems escape to the binary.
// =============================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not decode {encoding} body: {source}")]
    Decode {
        encoding: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSS selector '{0}'")]
    Selector(String),

    #[error("XML parsing failed: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
