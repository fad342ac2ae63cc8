//! JSON shapes returned by the HTTP API.

use chrono::{DateTime, Utc};
use quiz_core::model::{Question, Quiz};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub options: Vec<String>,
    pub correct_answers: Vec<String>,
}

impl From<&Question> for QuestionResponse {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id().value(),
            kind: question.kind().as_str().to_string(),
            content: question.content().to_string(),
            options: question.options().to_vec(),
            correct_answers: question.correct_answers().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub id: u64,
    pub title: String,
    pub questions: Vec<QuestionResponse>,
    pub created_at: DateTime<Utc>,
}

impl From<&Quiz> for QuizResponse {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id().value(),
            title: quiz.title().to_string(),
            questions: quiz.questions().iter().map(QuestionResponse::from).collect(),
            created_at: quiz.created_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
