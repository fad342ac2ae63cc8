use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quiz_core::model::ParseIdError;
use serde::Serialize;
use services::{ErrorKind, QuizServiceError};

/// Error returned by every handler; rendered as `{ "error", "message" }`.
#[derive(Debug)]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    message: &'a str,
}

impl ApiError {
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidArgument,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.kind {
            ErrorKind::MissingTitle
            | ErrorKind::InvalidQuestionType
            | ErrorKind::InvalidQuestion
            | ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QuizServiceError> for ApiError {
    fn from(err: QuizServiceError) -> Self {
        let kind = err.kind();
        // Storage details stay in the service log.
        let message = match kind {
            ErrorKind::StorageFailure => "storage failure".to_string(),
            _ => err.to_string(),
        };
        Self { kind, message }
    }
}

impl From<ParseIdError> for ApiError {
    fn from(err: ParseIdError) -> Self {
        Self::invalid_argument(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.kind.as_str(),
            message: &self.message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuizError, QuizId};
    use storage::StorageError;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (
                QuizServiceError::Quiz(QuizError::MissingTitle),
                StatusCode::BAD_REQUEST,
            ),
            (
                QuizServiceError::InvalidArgument("quiz id is required"),
                StatusCode::BAD_REQUEST,
            ),
            (QuizServiceError::NotFound, StatusCode::NOT_FOUND),
            (
                QuizServiceError::Storage(StorageError::Connection("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn storage_details_are_not_exposed() {
        let err = ApiError::from(QuizServiceError::Storage(StorageError::Connection(
            "secret path".into(),
        )));
        assert_eq!(err.message, "storage failure");
        assert_eq!(err.kind(), ErrorKind::StorageFailure);
    }

    #[test]
    fn unparsable_id_is_invalid_argument() {
        let err = ApiError::from("abc".parse::<QuizId>().unwrap_err());
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.message.contains("abc"));
    }
}
