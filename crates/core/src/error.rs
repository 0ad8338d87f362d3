//! Unified error taxonomy for plat.
//!
//! Every failure a lookup can surface carries a stable kind so the HTTP
//! boundary can pick an equivalent status without string matching.

use tokio_rusqlite::rusqlite;

/// Unified error types for the plat property service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., blank address).
    #[error("VALIDATION: {0}")]
    InvalidInput(String),

    /// Server-side misconfiguration (e.g., no provider credential).
    #[error("CONFIG: {0}")]
    Config(String),

    /// The provider returned no matching property.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// The provider rejected our credential.
    #[error("AUTH: {0}")]
    Auth(String),

    /// Generic provider/transport failure; safe for the caller to retry.
    #[error("UPSTREAM: {0}")]
    Upstream(String),

    /// Cache database operation failed.
    #[error("STORAGE: {0}")]
    Storage(tokio_rusqlite::Error),

    /// A cache row could not be decoded back into a property record.
    #[error("STORAGE: corrupt cache row: {0}")]
    CorruptRow(String),

    /// Migration failed to apply.
    #[error("STORAGE: migration failed: {0}")]
    MigrationFailed(String),
}

impl Error {
    /// HTTP-equivalent status code for this error.
    ///
    /// Storage errors map to 500 but are absorbed by the lookup
    /// orchestrator before they can reach a caller.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::InvalidInput(_) => 400,
            Error::Auth(_) => 401,
            Error::NotFound(_) => 404,
            Error::Config(_) => 500,
            Error::Upstream(_) => 502,
            Error::Storage(_) | Error::CorruptRow(_) | Error::MigrationFailed(_) => 500,
        }
    }

    /// Stable lowercase kind string for observers and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "validation",
            Error::Config(_) => "config",
            Error::NotFound(_) => "not_found",
            Error::Auth(_) => "auth",
            Error::Upstream(_) => "upstream",
            Error::Storage(_) => "storage",
            Error::CorruptRow(_) => "storage",
            Error::MigrationFailed(_) => "storage",
        }
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Storage(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Storage(tokio_rusqlite::Error::Close(c)),
            _ => Error::Storage(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Storage(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Storage(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("11760 baltimore ave".to_string());
        assert!(err.to_string().contains("NOT_FOUND"));
        assert!(err.to_string().contains("11760 baltimore ave"));
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(Error::InvalidInput("x".into()).http_status(), 400);
        assert_eq!(Error::Auth("x".into()).http_status(), 401);
        assert_eq!(Error::NotFound("x".into()).http_status(), 404);
        assert_eq!(Error::Config("x".into()).http_status(), 500);
        assert_eq!(Error::Upstream("x".into()).http_status(), 502);
        assert_eq!(Error::MigrationFailed("x".into()).http_status(), 500);
    }

    #[test]
    fn test_kind_is_stable() {
        assert_eq!(Error::Upstream("HTTP 503".into()).kind(), "upstream");
        assert_eq!(Error::MigrationFailed("x".into()).kind(), "storage");
    }
}
