use std::sync::Arc;

use auth::Role;
use auth::TokenService;
use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::user::models::UserId;

/// Extension type to store the authenticated caller in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: Role,
}

/// Middleware that validates access tokens and adds caller info to request extensions
pub async fn authenticate(
    State(token_service): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    // Extract token from Authorization header
    let token = extract_token_from_header(&req)?;

    // Expired, tampered, and malformed tokens all get the same response body
    let claims = token_service.validate(token).map_err(|e| {
        tracing::warn!("Token validation failed: {}", e);
        unauthorized("Invalid or expired token")
    })?;

    let user_id = claims.user_id().map_err(|e| {
        tracing::warn!("Failed to parse user id from token subject: {}", e);
        unauthorized("Invalid or expired token")
    })?;

    // Add authenticated caller info to request extensions
    req.extensions_mut().insert(AuthenticatedUser {
        user_id: UserId(user_id),
        role: claims.role,
    });

    Ok(next.run(req).await)
}

/// Middleware that restricts a route to callers holding the admin role.
///
/// Must run after `authenticate`, which inserts the caller extension.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, Response> {
    let caller = req.extensions().get::<AuthenticatedUser>().ok_or_else(|| {
        tracing::error!("Admin check reached without an authenticated caller");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        )
            .into_response()
    })?;

    match caller.role {
        Role::Admin => Ok(next.run(req).await),
        Role::Client => Err((
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "Admin access required"
            })),
        )
            .into_response()),
    }
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing or invalid Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Missing or invalid Authorization header"))?;

    if !auth_str.starts_with("Bearer ") {
        return Err(unauthorized("Missing or invalid Authorization header"));
    }

    Ok(auth_str.trim_start_matches("Bearer "))
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": message
        })),
    )
        .into_response()
}
