use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<ApiSuccess<VerifyEmailResponseData>, ApiError> {
    state
        .account_service
        .verify_email(&token)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                VerifyEmailResponseData {
                    message: "Email verified. You can now log in.".to_string(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyEmailResponseData {
    pub message: String,
}
