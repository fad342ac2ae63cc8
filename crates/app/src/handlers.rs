use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use quiz_core::model::{QuizDraft, QuizId};

use crate::AppState;
use crate::dto::{HealthResponse, QuizResponse};
use crate::error::ApiError;
use crate::extractors::AppJson;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// POST /quizzes
pub async fn create_quiz(
    State(state): State<Arc<AppState>>,
    AppJson(draft): AppJson<QuizDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let quiz = state.quizzes.create_quiz(draft).await?;
    Ok((StatusCode::CREATED, Json(QuizResponse::from(&quiz))))
}

/// GET /quizzes
pub async fn list_quizzes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<QuizResponse>>, ApiError> {
    let quizzes = state.quizzes.list_quizzes().await?;
    Ok(Json(quizzes.iter().map(QuizResponse::from).collect()))
}

/// GET /quizzes/{id}
pub async fn get_quiz(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<QuizResponse>, ApiError> {
    let id: QuizId = id.parse()?;
    let quiz = state.quizzes.get_quiz(id).await?;
    Ok(Json(QuizResponse::from(&quiz)))
}

/// DELETE /quizzes/{id}
pub async fn delete_quiz(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<QuizResponse>, ApiError> {
    let id: QuizId = id.parse()?;
    let quiz = state.quizzes.delete_quiz(id).await?;
    Ok(Json(QuizResponse::from(&quiz)))
}
