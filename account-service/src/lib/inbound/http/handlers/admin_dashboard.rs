use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;

/// Admin-only landing endpoint. Role enforcement happens in middleware.
pub async fn admin_dashboard() -> ApiSuccess<AdminDashboardResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        AdminDashboardResponseData {
            message: "Welcome to the admin dashboard.".to_string(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminDashboardResponseData {
    pub message: String,
}
