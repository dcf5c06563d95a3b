//! Error types for the articulation core
//!
//! Normalization and rendering are total and never return errors.
//! Only the boundary operations (reading JSON text, looking up a course,
//! serializing canonical output) are fallible.

/// Boundary error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Input text is not syntactically valid JSON, or not a record/record list
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No receiving-course record carries the requested key
    #[error("Course not found: {0}")]
    CourseNotFound(String),

    /// Canonical output could not be serialized
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_eof() {
            Error::ParseError(err.to_string())
        } else {
            Error::SerializationError(err.to_string())
        }
    }
}

/// Result type alias for articulation operations
pub type Result<T> = std::result::Result<T, Error>;
