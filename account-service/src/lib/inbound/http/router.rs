use std::sync::Arc;
use std::time::Duration;

use auth::TokenService;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::admin_dashboard::admin_dashboard;
use super::handlers::get_user::get_user;
use super::handlers::login::login;
use super::handlers::profile::profile;
use super::handlers::register::register;
use super::handlers::verify_email::verify_email;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_admin;
use crate::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn UserServicePort>,
    pub token_service: Arc<TokenService>,
}

pub fn create_router(
    account_service: Arc<dyn UserServicePort>,
    token_service: Arc<TokenService>,
) -> Router {
    let state = AppState {
        account_service,
        token_service: token_service.clone(),
    };

    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/verify-email/:token", get(verify_email));

    let protected_routes = Router::new()
        .route("/api/users/me", get(profile))
        .route("/api/users/:user_id", get(get_user))
        .route_layer(middleware::from_fn_with_state(
            token_service.clone(),
            auth_middleware,
        ));

    // The layer added last runs first, so authenticate populates the caller
    // extension before require_admin reads it.
    let admin_routes = Router::new()
        .route("/api/admin/dashboard", get(admin_dashboard))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            token_service,
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
