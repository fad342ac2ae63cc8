use std::sync::Arc;

use quiz_core::model::{Quiz, QuizDraft, QuizId};
use storage::repository::{NewQuizRecord, QuizRepository};

use crate::error::QuizServiceError;
use crate::{Clock, Logger};

/// Orchestrates quiz validation and persistence.
///
/// Every failure is logged once here before it is returned; repositories do
/// not log.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
    logger: Arc<dyn Logger>,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, quizzes: Arc<dyn QuizRepository>, logger: Arc<dyn Logger>) -> Self {
        Self {
            clock,
            quizzes,
            logger,
        }
    }

    /// Validate a draft and persist it together with its questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Quiz` for validation failures (nothing is
    /// stored), or `QuizServiceError::Storage` if persistence fails.
    pub async fn create_quiz(&self, draft: QuizDraft) -> Result<Quiz, QuizServiceError> {
        self.logger
            .info(&format!("creating quiz with title: {:?}", draft.title));

        let quiz = draft
            .validate()
            .map_err(|e| self.fail("creating quiz", e.into()))?;

        for position in quiz.blank_prompt_positions() {
            self.logger.warn(&format!(
                "quiz {:?}: question {} has an empty prompt",
                quiz.title,
                position + 1
            ));
        }

        let record = NewQuizRecord::from_new_quiz(quiz, self.clock.now());
        let created = self
            .quizzes
            .create_quiz(record)
            .await
            .map_err(|e| self.fail("creating quiz", e.into()))?;

        self.logger.info(&format!(
            "created quiz {} with {} questions",
            created.id(),
            created.questions().len()
        ));
        Ok(created)
    }

    /// List every quiz with its questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn list_quizzes(&self) -> Result<Vec<Quiz>, QuizServiceError> {
        self.quizzes
            .list_quizzes()
            .await
            .map_err(|e| self.fail("fetching quizzes", e.into()))
    }

    /// Fetch a quiz by ID.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::InvalidArgument` for an unset id without
    /// touching storage, `QuizServiceError::NotFound` if no quiz has that id,
    /// or `QuizServiceError::Storage` if repository access fails.
    pub async fn get_quiz(&self, id: QuizId) -> Result<Quiz, QuizServiceError> {
        let context = format!("fetching quiz by ID {id}");
        self.require_id(id, &context)?;
        self.quizzes
            .get_quiz(id)
            .await
            .map_err(|e| self.fail(&context, e.into()))
    }

    /// Delete a quiz and its questions, returning the removed quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::InvalidArgument` for an unset id without
    /// touching storage, `QuizServiceError::NotFound` if no quiz has that id,
    /// or `QuizServiceError::Storage` if repository access fails.
    pub async fn delete_quiz(&self, id: QuizId) -> Result<Quiz, QuizServiceError> {
        let context = format!("deleting quiz with ID {id}");
        self.require_id(id, &context)?;
        let deleted = self
            .quizzes
            .delete_quiz(id)
            .await
            .map_err(|e| self.fail(&context, e.into()))?;
        self.logger.info(&format!("deleted quiz {id}"));
        Ok(deleted)
    }

    fn require_id(&self, id: QuizId, context: &str) -> Result<(), QuizServiceError> {
        if id.is_unset() {
            return Err(self.fail(context, QuizServiceError::InvalidArgument("quiz id is required")));
        }
        Ok(())
    }

    fn fail(&self, context: &str, err: QuizServiceError) -> QuizServiceError {
        self.logger.error(&format!("error {context}: {err}"));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use quiz_core::log::{LogLevel, MemoryLogger};
    use quiz_core::model::QuestionDraft;
    use quiz_core::time::{fixed_clock, fixed_now};
    use storage::repository::InMemoryRepository;

    use crate::error::ErrorKind;

    fn service() -> (QuizService, Arc<MemoryLogger>) {
        let logger = Arc::new(MemoryLogger::new());
        let service = QuizService::new(
            fixed_clock(),
            Arc::new(InMemoryRepository::new()),
            logger.clone(),
        );
        (service, logger)
    }

    #[tokio::test]
    async fn create_stamps_clock_and_logs_title() {
        let (service, logger) = service();
        let quiz = service
            .create_quiz(QuizDraft::new(
                "Geography",
                vec![QuestionDraft::new("boolean", "Is Earth round?").with_correct_answers(["True"])],
            ))
            .await
            .unwrap();

        assert_eq!(quiz.created_at(), fixed_now());
        let info = logger.messages(LogLevel::Info);
        assert!(info[0].contains("Geography"));
        assert!(logger.messages(LogLevel::Error).is_empty());
    }

    #[tokio::test]
    async fn blank_prompt_is_warned_not_rejected() {
        let (service, logger) = service();
        let quiz = service
            .create_quiz(QuizDraft::new("Blank", vec![QuestionDraft::new("input", "")]))
            .await
            .unwrap();

        assert_eq!(quiz.questions()[0].content(), "");
        let warnings = logger.messages(LogLevel::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("question 1"));
    }

    #[tokio::test]
    async fn validation_failure_is_logged_once() {
        let (service, logger) = service();
        let err = service
            .create_quiz(QuizDraft::new("", Vec::new()))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingTitle);
        assert_eq!(logger.messages(LogLevel::Error).len(), 1);
    }

    #[tokio::test]
    async fn zero_id_is_invalid_argument() {
        let (service, logger) = service();
        let err = service.get_quiz(QuizId::new(0)).await.unwrap_err();
        assert!(matches!(err, QuizServiceError::InvalidArgument(_)));
        let err = service.delete_quiz(QuizId::new(0)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(logger.messages(LogLevel::Error).len(), 2);
    }

    #[tokio::test]
    async fn missing_quiz_is_not_found() {
        let (service, _) = service();
        let err = service.get_quiz(QuizId::new(42)).await.unwrap_err();
        assert!(matches!(err, QuizServiceError::NotFound));
        let err = service.delete_quiz(QuizId::new(42)).await.unwrap_err();
        assert!(matches!(err, QuizServiceError::NotFound));
    }
}
