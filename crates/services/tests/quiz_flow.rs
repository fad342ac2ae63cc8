use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use quiz_core::MemoryLogger;
use quiz_core::log::LogLevel;
use quiz_core::model::{QuestionDraft, QuestionType, Quiz, QuizDraft, QuizId};
use quiz_core::time::fixed_now;
use services::{Clock, ErrorKind, QuizService, QuizServiceError};
use storage::repository::{InMemoryRepository, NewQuizRecord, QuizRepository, Storage, StorageError};

/// Counts every call that reaches the repository.
#[derive(Default)]
struct CountingRepository {
    inner: InMemoryRepository,
    calls: AtomicUsize,
}

impl CountingRepository {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl QuizRepository for CountingRepository {
    async fn create_quiz(&self, quiz: NewQuizRecord) -> Result<Quiz, StorageError> {
        self.hit();
        self.inner.create_quiz(quiz).await
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError> {
        self.hit();
        self.inner.list_quizzes().await
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Quiz, StorageError> {
        self.hit();
        self.inner.get_quiz(id).await
    }

    async fn delete_quiz(&self, id: QuizId) -> Result<Quiz, StorageError> {
        self.hit();
        self.inner.delete_quiz(id).await
    }
}

/// Fails every call, standing in for an unreachable database.
struct UnavailableRepository;

#[async_trait]
impl QuizRepository for UnavailableRepository {
    async fn create_quiz(&self, _quiz: NewQuizRecord) -> Result<Quiz, StorageError> {
        Err(StorageError::Connection("database unavailable".into()))
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError> {
        Err(StorageError::Connection("database unavailable".into()))
    }

    async fn get_quiz(&self, _id: QuizId) -> Result<Quiz, StorageError> {
        Err(StorageError::Connection("database unavailable".into()))
    }

    async fn delete_quiz(&self, _id: QuizId) -> Result<Quiz, StorageError> {
        Err(StorageError::Connection("database unavailable".into()))
    }
}

async fn sqlite_service(name: &str) -> QuizService {
    let storage = Storage::sqlite(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect sqlite");
    QuizService::new(
        Clock::fixed(fixed_now()),
        Arc::clone(&storage.quizzes),
        Arc::new(MemoryLogger::new()),
    )
}

fn geography() -> QuizDraft {
    QuizDraft::new(
        "Geography",
        vec![QuestionDraft::new("boolean", "Is Earth round?").with_correct_answers(["True"])],
    )
}

#[tokio::test]
async fn geography_create_list_delete() {
    let service = sqlite_service("memdb_flow_geography").await;

    let created = service.create_quiz(geography()).await.expect("create");
    assert!(created.id().value() > 0);
    assert_eq!(created.title(), "Geography");
    assert_eq!(created.questions().len(), 1);
    let question = &created.questions()[0];
    assert_eq!(question.kind(), QuestionType::Boolean);
    assert_eq!(question.content(), "Is Earth round?");
    assert_eq!(question.correct_answers(), ["True"]);

    let listed = service.list_quizzes().await.expect("list");
    assert!(listed.contains(&created));

    let deleted = service.delete_quiz(created.id()).await.expect("delete");
    assert_eq!(deleted, created);

    let err = service.get_quiz(created.id()).await.unwrap_err();
    assert!(matches!(err, QuizServiceError::NotFound));
    let err = service.delete_quiz(created.id()).await.unwrap_err();
    assert!(matches!(err, QuizServiceError::NotFound));
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let service = sqlite_service("memdb_flow_roundtrip").await;
    let draft = QuizDraft::new(
        "Mixed",
        vec![
            QuestionDraft::new("checkbox", "Pick the even numbers")
                .with_options(["1", "2", "3", "4"])
                .with_correct_answers(["2", "4"]),
            QuestionDraft::new("input", "Spell seven"),
            QuestionDraft::new("BOOLEAN", "Is zero even?").with_correct_answers(["true"]),
        ],
    );

    let created = service.create_quiz(draft).await.expect("create");
    let fetched = service.get_quiz(created.id()).await.expect("get");
    assert_eq!(fetched, created);

    let contents: Vec<_> = fetched.questions().iter().map(|q| q.content()).collect();
    assert_eq!(
        contents,
        vec!["Pick the even numbers", "Spell seven", "Is zero even?"]
    );
    assert_eq!(fetched.questions()[2].correct_answers(), ["True"]);
}

#[tokio::test]
async fn rejected_quizzes_leave_nothing_behind() {
    let service = sqlite_service("memdb_flow_rejected").await;
    service.create_quiz(geography()).await.expect("seed");
    let before = service.list_quizzes().await.expect("list").len();

    let err = service
        .create_quiz(QuizDraft::new("   ", vec![QuestionDraft::new("input", "Q")]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingTitle);

    let err = service
        .create_quiz(QuizDraft::new(
            "Essays",
            vec![
                QuestionDraft::new("input", "fine"),
                QuestionDraft::new("essay", "Discuss."),
            ],
        ))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidQuestionType);

    let err = service
        .create_quiz(QuizDraft::new(
            "Stray answer",
            vec![
                QuestionDraft::new("checkbox", "Pick one")
                    .with_options(["a", "b"])
                    .with_correct_answers(["c"]),
            ],
        ))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidQuestion);

    assert_eq!(service.list_quizzes().await.expect("list").len(), before);
}

#[tokio::test]
async fn zero_id_never_reaches_storage() {
    let repo = Arc::new(CountingRepository::default());
    let service = QuizService::new(
        Clock::fixed(fixed_now()),
        repo.clone(),
        Arc::new(MemoryLogger::new()),
    );

    let err = service.get_quiz(QuizId::new(0)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = service.delete_quiz(QuizId::new(0)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(repo.calls(), 0);

    let err = service
        .create_quiz(QuizDraft::new("", Vec::new()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingTitle);
    assert_eq!(repo.calls(), 0);

    let _ = service.get_quiz(QuizId::new(5)).await;
    assert_eq!(repo.calls(), 1);
}

#[tokio::test]
async fn list_is_idempotent() {
    let service = sqlite_service("memdb_flow_idempotent").await;
    service.create_quiz(geography()).await.expect("create");
    service
        .create_quiz(QuizDraft::new("Empty", Vec::new()))
        .await
        .expect("create empty");

    let first = service.list_quizzes().await.expect("list");
    let second = service.list_quizzes().await.expect("list again");
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn storage_failures_are_logged_and_surfaced() {
    let logger = Arc::new(MemoryLogger::new());
    let service = QuizService::new(
        Clock::fixed(fixed_now()),
        Arc::new(UnavailableRepository),
        logger.clone(),
    );

    let err = service.create_quiz(geography()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageFailure);
    let err = service.list_quizzes().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageFailure);
    let err = service.get_quiz(QuizId::new(1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageFailure);
    let err = service.delete_quiz(QuizId::new(1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageFailure);

    let errors = logger.messages(LogLevel::Error);
    assert_eq!(errors.len(), 4);
    assert!(errors.iter().all(|m| m.contains("database unavailable")));
}
