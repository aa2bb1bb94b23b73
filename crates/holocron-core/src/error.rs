//! Unified error type for holocron.
//!
//! Every crate funnels its failures into [`Error`], which carries enough
//! context for an API layer to derive an HTTP status code via
//! [`Error::http_status`].

use std::fmt;

/// Unified error type covering all failure modes of the catalog model.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required field was missing or empty, or a value was malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A uniqueness constraint was violated.
    #[error("Constraint violation: {entity}.{field} must be unique")]
    ConstraintViolation {
        /// The table that rejected the write (e.g. "user").
        entity: String,
        /// The column carrying the unique constraint.
        field: String,
    },

    /// A foreign reference points at a record that does not exist.
    #[error("Reference error: {0}")]
    Reference(String),

    /// The requested record could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record (e.g. "user", "vehicle").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// A database operation failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::ConstraintViolation { .. } => 409,
            Error::Reference(_) => 422,
            Error::NotFound { .. } => 404,
            Error::Database { .. } => 500,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Convenience constructor for [`Error::ConstraintViolation`].
    pub fn constraint(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Error::ConstraintViolation {
            entity: entity.into(),
            field: field.into(),
        }
    }

    /// Convenience constructor for [`Error::Reference`].
    pub fn reference(msg: impl Into<String>) -> Self {
        Error::Reference(msg.into())
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::Internal`].
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Internal(format!("JSON error: {e}"))
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display() {
        let err = Error::validation("user.username is required");
        assert_eq!(
            err.to_string(),
            "Validation error: user.username is required"
        );
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn constraint_display() {
        let err = Error::constraint("user", "email");
        assert_eq!(
            err.to_string(),
            "Constraint violation: user.email must be unique"
        );
        assert_eq!(err.http_status(), 409);
    }

    #[test]
    fn reference_display() {
        let err = Error::reference("favorite.user_id points at a missing user");
        assert!(err.to_string().starts_with("Reference error:"));
        assert_eq!(err.http_status(), 422);
    }

    #[test]
    fn not_found_display() {
        let err = Error::not_found("planet", 7);
        assert_eq!(err.to_string(), "planet not found: 7");
        assert_eq!(err.http_status(), 404);
    }

    #[test]
    fn database_display() {
        let err = Error::database("disk I/O error");
        assert!(err.to_string().contains("disk I/O error"));
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn json_error_is_internal() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::from(json_err);
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn result_alias() {
        fn ok_fn() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(ok_fn().unwrap(), 42);

        fn err_fn() -> Result<i32> {
            Err(Error::internal("boom"))
        }
        assert!(err_fn().is_err());
    }
}
