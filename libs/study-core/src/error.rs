//! Error types for study-core.

use thiserror::Error;

/// Result type alias using StudyError.
pub type Result<T> = std::result::Result<T, StudyError>;

/// Errors raised by the scheduling engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StudyError {
    #[error("flashcard set has no cards")]
    EmptySet,

    #[error("not enough unique answers to build options: need {needed}, found {available}")]
    InsufficientDistractors { needed: usize, available: usize },

    #[error("card index {index} out of range for {len} cards")]
    OutOfRange { index: usize, len: usize },

    #[error("session is already complete")]
    SessionComplete,

    #[error("no question is currently presented")]
    NoActiveQuestion,

    #[error("current question has not been answered correctly yet")]
    NotAnswered,

    #[error("current question was already answered")]
    AlreadyAnswered,

    #[error("option is not part of the current question: {0}")]
    UnknownOption(String),
}

/// Errors that can occur while parsing a set file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing question at line {line}")]
    MissingQuestion { line: usize },

    #[error("missing answer at line {line}")]
    MissingAnswer { line: usize },

    #[error("invalid difficulty at line {line}: {value}")]
    InvalidDifficulty { line: usize, value: String },

    /// Text that continues no question, answer or hint.
    #[error("unexpected text at line {line}")]
    UnexpectedText { line: usize },

    #[error("no cards found")]
    EmptyFile,
}

/// Errors from validating a flashcard set before it is saved.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetError {
    #[error("set name is empty")]
    MissingName,

    #[error("set needs at least {required} cards, found {found}")]
    TooFewCards { required: usize, found: usize },
}

/// Errors reported by a progress sink.
///
/// These never reach the scheduler's caller; sessions log them and move on.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_distractors_message() {
        let err = StudyError::InsufficientDistractors {
            needed: 3,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "not enough unique answers to build options: need 3, found 1"
        );
    }

    #[test]
    fn out_of_range_message() {
        let err = StudyError::OutOfRange { index: 7, len: 4 };
        assert_eq!(err.to_string(), "card index 7 out of range for 4 cards");
    }

    #[test]
    fn persistence_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: PersistenceError = io.into();
        assert!(matches!(err, PersistenceError::Io(_)));
        assert_eq!(err.to_string(), "io error: read-only");
    }
}
