use anyhow::Result;
use std::env;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod handlers;
mod routes;
mod state;

use chainsight_loader::DashboardLoader;
use chainsight_narrative::CortexClient;
use chainsight_warehouse::WarehousePool;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chainsight_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Get configuration
    let port = env::var("API_PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()?;

    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    // Initialize warehouse connection
    let warehouse: Arc<dyn chainsight_core::Warehouse> =
        Arc::new(WarehousePool::new(&database_url).await?);

    // Initialize narrative service (optional)
    let narrative: Option<Arc<dyn chainsight_narrative::NarrativeService>> =
        match (env::var("CORTEX_API_URL"), env::var("CORTEX_API_TOKEN")) {
            (Ok(api_url), Ok(api_token)) => {
                let mut client = CortexClient::new(api_url, api_token);
                if let Ok(model) = env::var("CORTEX_MODEL") {
                    client = client.with_model(model);
                }
                Some(Arc::new(client))
            }
            _ => {
                tracing::warn!("No CORTEX_API_URL/CORTEX_API_TOKEN provided, narrative endpoints disabled");
                None
            }
        };

    // Create app state
    let state = state::ApiState {
        loader: Arc::new(DashboardLoader::new(warehouse.clone())),
        warehouse,
        narrative,
    };

    // Build router
    let app = routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("Chainsight API Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
