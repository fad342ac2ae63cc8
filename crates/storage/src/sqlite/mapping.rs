use std::collections::HashMap;

use chrono::{DateTime, Utc};
use quiz_core::model::{Question, QuestionId, QuestionType, Quiz, QuizId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn quiz_id_from_i64(v: i64) -> Result<QuizId, StorageError> {
    Ok(QuizId::new(i64_to_u64("quiz_id", v)?))
}

/// `None` for ids past `i64::MAX`; no stored row can carry one.
pub(crate) fn quiz_id_to_i64(id: QuizId) -> Option<i64> {
    i64::try_from(id.value()).ok()
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    Ok(QuestionId::new(i64_to_u64("question_id", v)?))
}

/// Unknown stored variants are an integrity failure, never coerced.
pub(crate) fn parse_question_type(s: &str) -> Result<QuestionType, StorageError> {
    QuestionType::from_storage_str(s)
        .ok_or_else(|| StorageError::Serialization(format!("invalid question type: {s}")))
}

/// Options and correct answers are stored as JSON string arrays.
pub(crate) fn encode_strings(values: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(values).map_err(ser)
}

pub(crate) fn decode_strings(raw: &str) -> Result<Vec<String>, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<(QuizId, Question), StorageError> {
    let quiz_id = quiz_id_from_i64(row.try_get::<i64, _>("quiz_id").map_err(ser)?)?;
    let kind = parse_question_type(row.try_get::<String, _>("type").map_err(ser)?.as_str())?;

    let question = Question::from_persisted(
        question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        kind,
        row.try_get::<String, _>("content").map_err(ser)?,
        decode_strings(&row.try_get::<String, _>("options").map_err(ser)?)?,
        decode_strings(&row.try_get::<String, _>("correct_answers").map_err(ser)?)?,
    );
    Ok((quiz_id, question))
}

pub(crate) fn map_quiz_row(row: &SqliteRow, questions: Vec<Question>) -> Result<Quiz, StorageError> {
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(ser)?;
    Quiz::from_persisted(
        quiz_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get::<String, _>("title").map_err(ser)?,
        questions,
        created_at,
    )
    .map_err(ser)
}

/// Groups question rows (already sorted by position) under their quiz.
pub(crate) fn group_questions(
    rows: &[SqliteRow],
) -> Result<HashMap<QuizId, Vec<Question>>, StorageError> {
    let mut grouped: HashMap<QuizId, Vec<Question>> = HashMap::new();
    for row in rows {
        let (quiz_id, question) = map_question_row(row)?;
        grouped.entry(quiz_id).or_default().push(question);
    }
    Ok(grouped)
}
