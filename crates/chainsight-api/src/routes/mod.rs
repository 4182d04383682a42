use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::{handlers, state::ApiState};

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))

        // Dashboard datasets
        .route("/api/dashboard/:strategy/:shock", get(handlers::dashboard::get_dashboard))
        .route("/api/baseline/:strategy", get(handlers::dashboard::get_baseline))

        // Analysis query registry
        .route("/api/queries", get(handlers::queries::list_queries))
        .route("/api/queries/:name", get(handlers::queries::run_query))

        // Narrative answers
        .route("/api/ask", post(handlers::narrative::ask_analyst))
        .route("/api/ask/documents", post(handlers::narrative::ask_documents))
        .route("/api/explain", post(handlers::narrative::explain_link))

        // Add state
        .with_state(state)

        // Add CORS
        .layer(CorsLayer::permissive())
}
