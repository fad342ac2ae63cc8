use quiz_core::model::{QuestionId, Quiz, QuizId};
use sqlx::{Row, SqliteConnection};

use super::SqliteRepository;
use super::mapping::{
    conn, encode_strings, group_questions, map_question_row, map_quiz_row, question_id_from_i64,
    quiz_id_from_i64, quiz_id_to_i64, ser,
};
use crate::repository::{NewQuizRecord, QuizRepository, StorageError};

const QUESTION_COLUMNS: &str =
    "id, quiz_id, position, type, content, options, correct_answers";

async fn load_quiz(db: &mut SqliteConnection, id: i64) -> Result<Option<Quiz>, StorageError> {
    let Some(row) = sqlx::query("SELECT id, title, created_at FROM quizzes WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *db)
        .await
        .map_err(conn)?
    else {
        return Ok(None);
    };

    let sql = format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE quiz_id = ?1 ORDER BY position ASC"
    );
    let rows = sqlx::query(&sql)
        .bind(id)
        .fetch_all(&mut *db)
        .await
        .map_err(conn)?;

    let mut questions = Vec::with_capacity(rows.len());
    for row in &rows {
        questions.push(map_question_row(row)?.1);
    }

    map_quiz_row(&row, questions).map(Some)
}

async fn insert_quiz(
    db: &mut SqliteConnection,
    quiz: &NewQuizRecord,
) -> Result<(QuizId, Vec<QuestionId>), StorageError> {
    let res = sqlx::query("INSERT INTO quizzes (title, created_at) VALUES (?1, ?2)")
        .bind(quiz.title.as_str())
        .bind(quiz.created_at)
        .execute(&mut *db)
        .await
        .map_err(conn)?;
    let quiz_row_id = res.last_insert_rowid();

    let mut question_ids = Vec::with_capacity(quiz.questions.len());
    for (position, question) in quiz.questions.iter().enumerate() {
        let position = i64::try_from(position)
            .map_err(|_| StorageError::Serialization("position overflow".into()))?;
        let res = sqlx::query(
            r"
            INSERT INTO questions (quiz_id, position, type, content, options, correct_answers)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(quiz_row_id)
        .bind(position)
        .bind(question.kind.as_storage_str())
        .bind(question.content.as_str())
        .bind(encode_strings(&question.options)?)
        .bind(encode_strings(&question.correct_answers)?)
        .execute(&mut *db)
        .await
        .map_err(conn)?;

        question_ids.push(question_id_from_i64(res.last_insert_rowid())?);
    }

    Ok((quiz_id_from_i64(quiz_row_id)?, question_ids))
}

#[async_trait::async_trait]
impl QuizRepository for SqliteRepository {
    async fn create_quiz(&self, quiz: NewQuizRecord) -> Result<Quiz, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let (quiz_id, question_ids) = match insert_quiz(&mut *tx, &quiz).await {
            Ok(ids) => ids,
            Err(err) => {
                // A failed rollback outranks the insert error it follows.
                tx.rollback().await.map_err(conn)?;
                return Err(err);
            }
        };
        tx.commit().await.map_err(conn)?;

        let questions = quiz
            .questions
            .into_iter()
            .zip(question_ids)
            .map(|(question, id)| question.assign_id(id))
            .collect();

        Quiz::from_persisted(quiz_id, quiz.title, questions, quiz.created_at).map_err(ser)
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError> {
        let mut db = self.pool.acquire().await.map_err(conn)?;

        let quiz_rows = sqlx::query("SELECT id, title, created_at FROM quizzes ORDER BY id ASC")
            .fetch_all(&mut *db)
            .await
            .map_err(conn)?;

        let sql =
            format!("SELECT {QUESTION_COLUMNS} FROM questions ORDER BY quiz_id ASC, position ASC");
        let question_rows = sqlx::query(&sql)
            .fetch_all(&mut *db)
            .await
            .map_err(conn)?;
        let mut grouped = group_questions(&question_rows)?;

        let mut quizzes = Vec::with_capacity(quiz_rows.len());
        for row in &quiz_rows {
            let id = quiz_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
            let questions = grouped.remove(&id).unwrap_or_default();
            quizzes.push(map_quiz_row(row, questions)?);
        }
        Ok(quizzes)
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Quiz, StorageError> {
        let id = quiz_id_to_i64(id).ok_or(StorageError::NotFound)?;
        let mut db = self.pool.acquire().await.map_err(conn)?;
        load_quiz(&mut *db, id).await?.ok_or(StorageError::NotFound)
    }

    async fn delete_quiz(&self, id: QuizId) -> Result<Quiz, StorageError> {
        let id = quiz_id_to_i64(id).ok_or(StorageError::NotFound)?;

        // Write lock up front: a concurrent delete of the same quiz waits on
        // busy_timeout, then finds the row gone.
        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(conn)?;

        let quiz = load_quiz(&mut *tx, id).await?.ok_or(StorageError::NotFound)?;

        // Questions go with the quiz through ON DELETE CASCADE.
        let res = sqlx::query("DELETE FROM quizzes WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        tx.commit().await.map_err(conn)?;
        Ok(quiz)
    }
}
