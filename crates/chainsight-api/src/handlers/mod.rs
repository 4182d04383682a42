pub mod health;
pub mod dashboard;
pub mod queries;
pub mod narrative;

use axum::http::StatusCode;

pub(crate) fn bad_request<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

pub(crate) fn internal_error<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    tracing::error!("Request failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
