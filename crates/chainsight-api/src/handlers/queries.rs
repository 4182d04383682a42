use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use chainsight_core::DataTable;
use chainsight_loader::registry;

use crate::handlers::internal_error;
use crate::state::ApiState;

#[derive(Debug, Serialize)]
pub struct QueryInfo {
    pub name: &'static str,
    pub description: &'static str,
}

pub async fn list_queries() -> Json<Vec<QueryInfo>> {
    let queries = registry::ANALYSIS_QUERIES
        .iter()
        .map(|q| QueryInfo {
            name: q.name,
            description: q.description,
        })
        .collect();

    Json(queries)
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub name: String,
    pub table: DataTable,
}

pub async fn run_query(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> Result<Json<QueryResponse>, (StatusCode, String)> {
    match state.loader.run_analysis_query(&name).await {
        Ok(table) => Ok(Json(QueryResponse { name, table })),
        Err(e @ chainsight_loader::Error::UnknownQuery(_)) => {
            Err((StatusCode::NOT_FOUND, e.to_string()))
        }
        Err(e) => Err(internal_error(e)),
    }
}
