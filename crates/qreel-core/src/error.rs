//! Error types for qreel

use thiserror::Error;

/// Result type alias for landing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Landing error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Catalog errors
    #[error("Catalog unavailable at {url}: {reason}")]
    CatalogUnavailable { url: String, reason: String },

    #[error("Failed to parse catalog: {0}")]
    CatalogMalformed(String),

    #[error("No media found for slug {slug:?}")]
    NotFound { slug: Option<String> },

    // Playback errors
    #[error("Playback start rejected: {0}")]
    PlaybackStartRejected(String),

    // Surface errors
    #[error("Page element not found: {0}")]
    MissingElement(String),

    #[error("Surface operation failed: {0}")]
    Surface(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a catalog-unavailable error
    pub fn unavailable(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::CatalogUnavailable {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a surface error
    pub fn surface(msg: impl Into<String>) -> Self {
        Error::Surface(msg.into())
    }

    /// Returns true if this error ends the page in a failure state.
    ///
    /// A rejected playback attempt is the only error the page shrugs off;
    /// the native controls remain usable.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Error::PlaybackStartRejected(_))
    }

    /// Returns the error code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::CatalogUnavailable { .. } => "CATALOG_UNAVAILABLE",
            Error::CatalogMalformed(_) => "CATALOG_MALFORMED",
            Error::NotFound { .. } => "NOT_FOUND",
            Error::PlaybackStartRejected(_) => "PLAYBACK_REJECTED",
            Error::MissingElement(_) => "MISSING_ELEMENT",
            Error::Surface(_) => "SURFACE",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::CatalogMalformed(err.to_string())
    }
}
