#![forbid(unsafe_code)]

use std::sync::Arc;

use axum::{
    Router,
    http::{Method, header},
    routing::get,
};
use quiz_core::{Clock, Logger};
use services::QuizService;
use storage::Storage;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;

pub use config::{Config, Invocation};
pub use error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub quizzes: QuizService,
}

impl AppState {
    #[must_use]
    pub fn new(clock: Clock, storage: &Storage, logger: Arc<dyn Logger>) -> Self {
        Self {
            quizzes: QuizService::new(clock, Arc::clone(&storage.quizzes), logger),
        }
    }
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(quiz_routes())
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn quiz_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/quizzes",
            get(handlers::list_quizzes).post(handlers::create_quiz),
        )
        .route(
            "/quizzes/{id}",
            get(handlers::get_quiz).delete(handlers::delete_quiz),
        )
}
