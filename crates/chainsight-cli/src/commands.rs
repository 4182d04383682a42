use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::Commands;
use crate::settings::Settings;
use chainsight_core::{ShockEvent, StrategyMode, Warehouse};
use chainsight_loader::{registry, DashboardBundle, DashboardLoader};
use chainsight_narrative::{CortexClient, NarrativeService};
use chainsight_warehouse::WarehousePool;

pub async fn execute(
    command: Commands,
    warehouse: Option<Arc<WarehousePool>>,
    settings: Settings,
) -> Result<()> {
    match command {
        Commands::Dashboard {
            strategy,
            shock,
            baseline,
        } => {
            let warehouse = require_warehouse(&warehouse)?;
            let loader = make_loader(warehouse, &settings);

            let strategy: StrategyMode = strategy.parse()?;
            let shock: ShockEvent = shock.parse()?;

            println!("Loading dashboard data for {} / {}...", strategy, shock);

            if baseline {
                // Caller-requested comparison; both fetches run concurrently.
                let (bundle, baseline_table) = tokio::join!(
                    loader.load_dashboard_data(strategy, shock),
                    loader.load_baseline_data(strategy),
                );
                let bundle = bundle?;
                let baseline_table = baseline_table?;

                print_bundle(&bundle);
                println!("  Baseline rows: {}", baseline_table.num_rows());
            } else {
                let bundle = loader.load_dashboard_data(strategy, shock).await?;
                print_bundle(&bundle);
            }
        }

        Commands::Baseline { strategy } => {
            let warehouse = require_warehouse(&warehouse)?;
            let loader = make_loader(warehouse, &settings);

            let strategy: StrategyMode = strategy.parse()?;
            let table = loader.load_baseline_data(strategy).await?;

            if table.is_empty() {
                println!("No data available for selected filters");
            } else {
                println!("✓ Baseline loaded for {}", strategy);
                println!("  Rows: {}", table.num_rows());
                println!("  Columns: {}", table.columns.join(", "));
            }
        }

        Commands::Queries => {
            println!("Analysis queries: {}", registry::ANALYSIS_QUERIES.len());
            println!();

            for query in registry::ANALYSIS_QUERIES {
                println!("{}", query.name);
                println!("  {}", query.description);
            }
        }

        Commands::Query { name } => {
            let warehouse = require_warehouse(&warehouse)?;
            let loader = make_loader(warehouse, &settings);

            println!("Running analysis query: {}", name);
            let table = loader.run_analysis_query(&name).await?;

            println!("✓ {} rows, {} columns", table.num_rows(), table.num_columns());
            if !table.is_empty() {
                println!("  Columns: {}", table.columns.join(", "));
                for row in table.rows.iter().take(5) {
                    println!("  {}", serde_json::to_string(row)?);
                }
                if table.num_rows() > 5 {
                    println!("  ... {} more rows", table.num_rows() - 5);
                }
            }
        }

        Commands::Ask {
            question,
            documents,
        } => {
            let service = make_narrative(&settings)?;

            if documents {
                let warehouse = require_warehouse(&warehouse)?;
                let answer = chainsight_narrative::generate_rag_response(
                    service.as_ref(),
                    warehouse.as_ref(),
                    &question,
                )
                .await;
                println!("{}", answer);
            } else {
                let outcome =
                    chainsight_narrative::ask_analyst(service.as_ref(), &question).await;

                match outcome.response {
                    Some(response) => println!("{}", response),
                    None => println!(
                        "Analyst unavailable: {}",
                        outcome.error.unwrap_or_else(|| "unknown error".to_string())
                    ),
                }
            }
        }

        Commands::Serve { port } => {
            println!("Starting API server on port {}...", port);

            let warehouse = require_warehouse(&warehouse)?;
            let narrative = match make_narrative(&settings) {
                Ok(service) => Some(service),
                Err(_) => {
                    println!("Warning: No narrative service configured. Ask endpoints disabled.");
                    None
                }
            };

            // Create API state
            let api_state = chainsight_api::state::ApiState {
                loader: Arc::new(make_loader(warehouse.clone(), &settings)),
                warehouse,
                narrative,
            };

            // Create and run server
            let app = chainsight_api::routes::create_router(api_state);

            let addr = format!("0.0.0.0:{}", port);
            println!("Chainsight API Server running on http://{}", addr);

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await?;
        }

        Commands::InitDb => {
            match &warehouse {
                Some(pool) => {
                    println!("Initializing warehouse schema...");
                    pool.init_schema().await?;
                    println!("✓ Warehouse schema initialized successfully");
                }
                None => {
                    anyhow::bail!("No database URL provided. Set DATABASE_URL environment variable.");
                }
            }
        }
    }

    Ok(())
}

fn print_bundle(bundle: &DashboardBundle) {
    if !bundle.has_data() {
        println!("No data available for selected filters");
        return;
    }

    println!("✓ Dashboard data loaded");
    println!("  Performance rows: {}", bundle.performance.num_rows());
    println!("  Prediction rows: {}", bundle.predictions.num_rows());
    println!("  Causal trace rows: {}", bundle.causal_traces.num_rows());
}

fn require_warehouse(warehouse: &Option<Arc<WarehousePool>>) -> Result<Arc<dyn Warehouse>> {
    match warehouse {
        Some(pool) => {
            let warehouse: Arc<dyn Warehouse> = pool.clone();
            Ok(warehouse)
        }
        None => anyhow::bail!("No database URL provided. Set DATABASE_URL environment variable."),
    }
}

fn make_loader(warehouse: Arc<dyn Warehouse>, settings: &Settings) -> DashboardLoader {
    DashboardLoader::new(warehouse).with_ttl(Duration::from_secs(settings.cache_ttl_seconds))
}

fn make_narrative(settings: &Settings) -> Result<Arc<dyn NarrativeService>> {
    let (api_url, api_token) = match (&settings.cortex.api_url, &settings.cortex.api_token) {
        (Some(url), Some(token)) => (url.clone(), token.clone()),
        _ => anyhow::bail!(
            "No narrative service configured. Set CHAINSIGHT_CORTEX__API_URL and CHAINSIGHT_CORTEX__API_TOKEN."
        ),
    };

    let mut client = CortexClient::new(api_url, api_token);
    if let Some(ref model) = settings.cortex.model {
        client = client.with_model(model.clone());
    }

    Ok(Arc::new(client))
}
