//! Domain error types
//!
//! All errors raised by the crate funnel into [`XtractorError`]. Third-party
//! error types (reqwest, quick-xml, toml) are converted to strings at the
//! boundary so callers never depend on them.

use std::path::PathBuf;
use thiserror::Error;

/// Main Xtractor error type
#[derive(Debug, Error)]
pub enum XtractorError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The content source could not be reached or refused the session
    #[error("Connection error: {0}")]
    Connection(CmsError),

    /// Failures while querying an established content source
    #[error("CMS error: {0}")]
    Cms(#[from] CmsError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed markup in a field value
    #[error("Markup error: {0}")]
    Markup(String),

    /// Writing to the output tree failed
    #[error("Failed to write {}: {message}", path.display())]
    Output { path: PathBuf, message: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl XtractorError {
    /// Builds an [`XtractorError::Output`] for a failed write at `path`
    pub fn output(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        XtractorError::Output {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Process exit code the CLI reports for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            XtractorError::Configuration(_) | XtractorError::Validation(_) => 2,
            XtractorError::Connection(_) => 4,
            _ => 5,
        }
    }
}

/// Content-source errors
///
/// Raised by [`crate::adapters::cms::ContentSource`] implementations.
#[derive(Debug, Error)]
pub enum CmsError {
    /// Failed to reach the content source
    #[error("Failed to connect to content source: {0}")]
    ConnectionFailed(String),

    /// Credentials were rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Invalid response from server
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },
}

impl CmsError {
    /// Maps a non-success HTTP status to the matching variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => CmsError::AuthenticationFailed(format!("HTTP {status}: {message}")),
            400..=499 => CmsError::ClientError { status, message },
            _ => CmsError::ServerError { status, message },
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for XtractorError {
    fn from(err: std::io::Error) -> Self {
        XtractorError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for XtractorError {
    fn from(err: serde_json::Error) -> Self {
        XtractorError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for XtractorError {
    fn from(err: toml::de::Error) -> Self {
        XtractorError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<quick_xml::Error> for XtractorError {
    fn from(err: quick_xml::Error) -> Self {
        XtractorError::Markup(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xtractor_error_display() {
        let err = XtractorError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_cms_error_conversion() {
        let cms_err = CmsError::QueryFailed("bad column".to_string());
        let err: XtractorError = cms_err.into();
        assert!(matches!(err, XtractorError::Cms(_)));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_connection_error_exit_code() {
        let err = XtractorError::Connection(CmsError::ConnectionFailed("refused".to_string()));
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn test_configuration_error_exit_code() {
        assert_eq!(XtractorError::Configuration("x".into()).exit_code(), 2);
        assert_eq!(XtractorError::Validation("x".into()).exit_code(), 2);
    }

    #[test]
    fn test_output_error_names_path() {
        let err = XtractorError::output("/tmp/out/a.xml", "disk full");
        assert_eq!(err.to_string(), "Failed to write /tmp/out/a.xml: disk full");
    }

    #[test]
    fn test_cms_error_from_status() {
        assert!(matches!(
            CmsError::from_status(401, "nope"),
            CmsError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            CmsError::from_status(404, "missing"),
            CmsError::ClientError { status: 404, .. }
        ));
        assert!(matches!(
            CmsError::from_status(503, "down"),
            CmsError::ServerError { status: 503, .. }
        ));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: XtractorError = io_err.into();
        assert!(matches!(err, XtractorError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: XtractorError = json_err.into();
        assert!(matches!(err, XtractorError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: XtractorError = toml_err.into();
        assert!(matches!(err, XtractorError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
