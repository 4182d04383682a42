use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use chainsight_core::StrategyMode;
use chainsight_narrative::NarrativeOutcome;

use crate::handlers::bad_request;
use crate::state::ApiState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

pub async fn ask_analyst(
    State(state): State<ApiState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<NarrativeOutcome>, (StatusCode, String)> {
    let service = narrative_service(&state)?;

    let outcome = chainsight_narrative::ask_analyst(service.as_ref(), &request.question).await;
    Ok(Json(outcome))
}

#[derive(Debug, Serialize)]
pub struct DocumentAnswer {
    pub answer: String,
}

pub async fn ask_documents(
    State(state): State<ApiState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<DocumentAnswer>, (StatusCode, String)> {
    let service = narrative_service(&state)?;

    let answer = chainsight_narrative::generate_rag_response(
        service.as_ref(),
        state.warehouse.as_ref(),
        &request.question,
    )
    .await;

    Ok(Json(DocumentAnswer { answer }))
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub source_metric: String,
    pub target_metric: String,
    pub relationship_type: String,
    pub weight: f64,
    pub strategy_mode: String,
}

/// Explain one causal trace edge for the selected strategy.
pub async fn explain_link(
    State(state): State<ApiState>,
    Json(request): Json<ExplainRequest>,
) -> Result<Json<NarrativeOutcome>, (StatusCode, String)> {
    let strategy: StrategyMode = request.strategy_mode.parse().map_err(bad_request)?;
    let service = narrative_service(&state)?;

    let outcome = chainsight_narrative::explain_causal_link(
        service.as_ref(),
        &request.source_metric,
        &request.target_metric,
        &request.relationship_type,
        request.weight,
        strategy,
    )
    .await;

    Ok(Json(outcome))
}

fn narrative_service(
    state: &ApiState,
) -> Result<std::sync::Arc<dyn chainsight_narrative::NarrativeService>, (StatusCode, String)> {
    state.narrative.clone().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "No narrative service configured".to_string(),
    ))
}
