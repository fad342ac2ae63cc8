use axum::{
    Json,
    extract::{FromRequest, Request},
};

use crate::error::ApiError;

/// JSON body extractor whose rejections use the API's tagged error shape.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: serde::de::DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                tracing::warn!("rejected request body: {rejection}");
                Err(ApiError::invalid_argument(format!(
                    "malformed request body: {}",
                    rejection.body_text()
                )))
            }
        }
    }
}
