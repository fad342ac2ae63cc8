use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{NewQuestion, NewQuiz, QuestionId, Quiz, QuizId};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Insert shape for a quiz and its questions.
///
/// Ids are assigned by the repository; the creation timestamp is chosen by
/// the caller so services can drive it from their clock.
#[derive(Debug, Clone)]
pub struct NewQuizRecord {
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<NewQuestion>,
}

impl NewQuizRecord {
    #[must_use]
    pub fn from_new_quiz(quiz: NewQuiz, created_at: DateTime<Utc>) -> Self {
        Self {
            title: quiz.title,
            created_at,
            questions: quiz.questions,
        }
    }
}

/// Repository contract for quiz aggregates. Questions are always stored and
/// loaded together with their quiz.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Persist a quiz and all of its questions as one unit.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored; nothing is
    /// persisted in that case.
    async fn create_quiz(&self, quiz: NewQuizRecord) -> Result<Quiz, StorageError>;

    /// All quizzes with their questions, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quizzes cannot be read.
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError>;

    /// Fetch a quiz by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_quiz(&self, id: QuizId) -> Result<Quiz, StorageError>;

    /// Remove a quiz and its questions, returning what was removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn delete_quiz(&self, id: QuizId) -> Result<Quiz, StorageError>;
}

#[derive(Default)]
struct InMemoryState {
    last_quiz_id: u64,
    last_question_id: u64,
    quizzes: BTreeMap<QuizId, Quiz>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn create_quiz(&self, quiz: NewQuizRecord) -> Result<Quiz, StorageError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut next_question = guard.last_question_id;
        let questions = quiz
            .questions
            .into_iter()
            .map(|q| {
                next_question += 1;
                q.assign_id(QuestionId::new(next_question))
            })
            .collect();

        let id = QuizId::new(guard.last_quiz_id + 1);
        let stored = Quiz::from_persisted(id, quiz.title, questions, quiz.created_at)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        // Counters only advance once the quiz is known to be storable.
        guard.last_quiz_id = id.value();
        guard.last_question_id = next_question;
        guard.quizzes.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError> {
        let guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.quizzes.values().cloned().collect())
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Quiz, StorageError> {
        let guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.quizzes.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn delete_quiz(&self, id: QuizId) -> Result<Quiz, StorageError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.quizzes.remove(&id).ok_or(StorageError::NotFound)
    }
}

/// Holds the quiz repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let quizzes: Arc<dyn QuizRepository> = Arc::new(InMemoryRepository::new());
        Self { quizzes }
    }
}
