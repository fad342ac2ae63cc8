//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionError, QuizError};
use storage::repository::StorageError;

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    /// Title or question validation failed; nothing was stored.
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("quiz not found")]
    NotFound,
    #[error(transparent)]
    Storage(StorageError),
}

/// Coarse classification used by callers that map failures onto a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingTitle,
    InvalidQuestionType,
    InvalidQuestion,
    InvalidArgument,
    NotFound,
    StorageFailure,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::MissingTitle => "MissingTitle",
            ErrorKind::InvalidQuestionType => "InvalidQuestionType",
            ErrorKind::InvalidQuestion => "InvalidQuestion",
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::StorageFailure => "StorageFailure",
        }
    }
}

impl QuizServiceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuizServiceError::Quiz(QuizError::MissingTitle) => ErrorKind::MissingTitle,
            QuizServiceError::Quiz(err) => match err.question_error() {
                Some(QuestionError::InvalidType(_)) => ErrorKind::InvalidQuestionType,
                _ => ErrorKind::InvalidQuestion,
            },
            QuizServiceError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            QuizServiceError::NotFound => ErrorKind::NotFound,
            QuizServiceError::Storage(_) => ErrorKind::StorageFailure,
        }
    }
}

impl From<StorageError> for QuizServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => QuizServiceError::NotFound,
            other => QuizServiceError::Storage(other),
        }
    }
}
