#![forbid(unsafe_code)]

pub mod error;
pub mod quiz_service;

pub use quiz_core::{Clock, Logger};

pub use error::{ErrorKind, QuizServiceError};
pub use quiz_service::QuizService;
