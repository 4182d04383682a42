use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use chainsight_core::{DataTable, ShockEvent, StrategyMode};

use crate::handlers::{bad_request, internal_error};
use crate::state::ApiState;

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    /// Also fetch the unshocked baseline for side-by-side comparison.
    #[serde(default)]
    pub baseline: bool,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub strategy_mode: StrategyMode,
    pub shock_event: ShockEvent,
    /// True when the performance dataset came back empty; the front end
    /// renders "no data for current selection" instead of derived metrics.
    pub no_data: bool,
    pub performance: DataTable,
    pub predictions: DataTable,
    pub causal_traces: DataTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<DataTable>,
}

pub async fn get_dashboard(
    State(state): State<ApiState>,
    Path((strategy, shock)): Path<(String, String)>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<DashboardResponse>, (StatusCode, String)> {
    let strategy: StrategyMode = strategy.parse().map_err(bad_request)?;
    let shock: ShockEvent = shock.parse().map_err(bad_request)?;

    let (bundle, baseline) = if params.baseline {
        // Caller-requested comparison; baseline loads concurrently with the
        // bundle rather than after it.
        let (bundle, baseline) = tokio::join!(
            state.loader.load_dashboard_data(strategy, shock),
            state.loader.load_baseline_data(strategy),
        );
        (
            bundle.map_err(internal_error)?,
            Some(baseline.map_err(internal_error)?),
        )
    } else {
        let bundle = state
            .loader
            .load_dashboard_data(strategy, shock)
            .await
            .map_err(internal_error)?;
        (bundle, None)
    };

    Ok(Json(DashboardResponse {
        strategy_mode: strategy,
        shock_event: shock,
        no_data: !bundle.has_data(),
        performance: bundle.performance,
        predictions: bundle.predictions,
        causal_traces: bundle.causal_traces,
        baseline,
    }))
}

#[derive(Debug, Serialize)]
pub struct BaselineResponse {
    pub strategy_mode: StrategyMode,
    pub baseline: DataTable,
}

pub async fn get_baseline(
    State(state): State<ApiState>,
    Path(strategy): Path<String>,
) -> Result<Json<BaselineResponse>, (StatusCode, String)> {
    let strategy: StrategyMode = strategy.parse().map_err(bad_request)?;

    let baseline = state
        .loader
        .load_baseline_data(strategy)
        .await
        .map_err(internal_error)?;

    Ok(Json(BaselineResponse {
        strategy_mode: strategy,
        baseline,
    }))
}
