use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use chainsight_core::{DataTable, QueryTask, ShockEvent, StrategyMode, Warehouse};
use chainsight_executor::run_queries;
use chainsight_loader::DashboardLoader;
use chainsight_narrative::{ask_analyst, generate_rag_response, NarrativeService};

/// Call-counting warehouse fake shared by the scenarios below. Statements
/// touching a table named in `fail` error out; everything else returns a
/// one-row marker table.
struct ScriptedWarehouse {
    calls: AtomicUsize,
    fail: Vec<&'static str>,
}

impl ScriptedWarehouse {
    fn healthy() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: Vec::new(),
        }
    }

    fn failing_on(fail: Vec<&'static str>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Warehouse for ScriptedWarehouse {
    async fn execute(&self, statement: &str) -> anyhow::Result<DataTable> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        for marker in &self.fail {
            if statement.contains(marker) {
                anyhow::bail!("relation \"{}\" is unavailable", marker);
            }
        }

        let mut table = DataTable::with_columns(vec!["marker".to_string()]);
        table.push_row(vec![json!("row")])?;
        Ok(table)
    }
}

#[tokio::test]
async fn test_dashboard_flow_end_to_end() {
    let warehouse = Arc::new(ScriptedWarehouse::healthy());
    let loader = DashboardLoader::new(warehouse.clone());

    let bundle = loader
        .load_dashboard_data(StrategyMode::Growth, ShockEvent::None)
        .await
        .unwrap();

    assert!(bundle.has_data());
    assert!(!bundle.predictions.is_empty());
    assert!(!bundle.causal_traces.is_empty());
    assert_eq!(warehouse.call_count(), 3);

    // A refresh inside the TTL window is served entirely from cache.
    loader
        .load_dashboard_data(StrategyMode::Growth, ShockEvent::None)
        .await
        .unwrap();
    assert_eq!(warehouse.call_count(), 3);
}

#[tokio::test]
async fn test_shocked_scenario_with_baseline_comparison() {
    let warehouse = Arc::new(ScriptedWarehouse::healthy());
    let loader = DashboardLoader::new(warehouse.clone());

    // The caller opts into the baseline fetch; both loads run concurrently.
    let (bundle, baseline) = tokio::join!(
        loader.load_dashboard_data(StrategyMode::Cash, ShockEvent::PortStrike),
        loader.load_baseline_data(StrategyMode::Cash),
    );

    assert!(bundle.unwrap().has_data());
    assert!(!baseline.unwrap().is_empty());
    assert_eq!(warehouse.call_count(), 4);

    // The baseline cache key is independent of the dashboard cache key.
    loader.load_baseline_data(StrategyMode::Cash).await.unwrap();
    assert_eq!(warehouse.call_count(), 4);
}

#[tokio::test]
async fn test_degraded_scenario_still_renders() {
    let warehouse = Arc::new(ScriptedWarehouse::failing_on(vec![
        "predictive_bridge",
        "v_causal_traces",
    ]));
    let loader = DashboardLoader::new(warehouse);

    let bundle = loader
        .load_dashboard_data(StrategyMode::Margin, ShockEvent::DemandSurge)
        .await
        .unwrap();

    // Core performance data survives; the failed datasets come back empty.
    assert!(bundle.has_data());
    assert!(bundle.predictions.is_empty());
    assert!(bundle.causal_traces.is_empty());
}

#[tokio::test]
async fn test_expired_cache_refetches() {
    let warehouse = Arc::new(ScriptedWarehouse::healthy());
    let loader = DashboardLoader::new(warehouse.clone()).with_ttl(Duration::from_millis(20));

    loader
        .load_dashboard_data(StrategyMode::Growth, ShockEvent::SupplyDisruption)
        .await
        .unwrap();
    assert_eq!(warehouse.call_count(), 3);

    tokio::time::sleep(Duration::from_millis(50)).await;

    loader
        .load_dashboard_data(StrategyMode::Growth, ShockEvent::SupplyDisruption)
        .await
        .unwrap();
    assert_eq!(warehouse.call_count(), 6);
}

// ============================================================================
// Executor Tests
// ============================================================================

#[tokio::test]
async fn test_executor_reports_every_task() {
    let warehouse = Arc::new(ScriptedWarehouse::failing_on(vec!["broken_table"]));

    let tasks = vec![
        QueryTask::new("good".to_string(), "SELECT 1".to_string()),
        QueryTask::new(
            "bad".to_string(),
            "SELECT * FROM broken_table".to_string(),
        ),
    ];

    let report = run_queries(warehouse, tasks, 2, false).await.unwrap();

    assert_eq!(report.len(), 2);
    assert!(report.table("good").is_some());
    assert!(report.table("bad").is_none());
    assert_eq!(report.failures().len(), 1);
}

#[tokio::test]
async fn test_executor_fail_fast_names_all_failures() {
    let warehouse = Arc::new(ScriptedWarehouse::failing_on(vec!["broken_table"]));

    let tasks = vec![
        QueryTask::new("first_bad".to_string(), "SELECT * FROM broken_table".to_string()),
        QueryTask::new("second_bad".to_string(), "SELECT 1 FROM broken_table".to_string()),
        QueryTask::new("good".to_string(), "SELECT 1".to_string()),
    ];

    let err = run_queries(warehouse, tasks, 3, true).await.unwrap_err();
    let message = err.to_string();

    assert!(message.contains("first_bad"));
    assert!(message.contains("second_bad"));
}

// ============================================================================
// Narrative Tests
// ============================================================================

struct StubService {
    up: bool,
}

#[async_trait]
impl NarrativeService for StubService {
    fn model(&self) -> &str {
        "stub"
    }

    async fn complete(&self, _prompt: &str) -> chainsight_narrative::Result<String> {
        if self.up {
            Ok("Pipeline stock ties up working capital.".to_string())
        } else {
            Err(chainsight_narrative::Error::ApiError(
                "model offline".to_string(),
            ))
        }
    }
}

#[tokio::test]
async fn test_analyst_outcome_success_and_failure() {
    let outcome = ask_analyst(&StubService { up: true }, "Why does FCF drop?").await;
    assert!(outcome.success);

    let outcome = ask_analyst(&StubService { up: false }, "Why does FCF drop?").await;
    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("model offline"));
}

#[tokio::test]
async fn test_rag_answer_over_scripted_documents() {
    // The QBR search runs through the warehouse seam like any other query.
    let warehouse = ScriptedWarehouse::healthy();

    let answer =
        generate_rag_response(&StubService { up: true }, &warehouse, "working capital").await;

    assert_eq!(answer, "Pipeline stock ties up working capital.");
    assert_eq!(warehouse.call_count(), 1);
}

#[tokio::test]
async fn test_rag_degrades_when_search_fails() {
    let warehouse = ScriptedWarehouse::failing_on(vec!["qbr_documents"]);

    let answer =
        generate_rag_response(&StubService { up: true }, &warehouse, "working capital").await;

    assert_eq!(answer, "No relevant documents found for your query.");
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[test]
fn test_scenario_round_trips() {
    for mode in StrategyMode::ALL {
        let parsed: StrategyMode = mode.to_string().parse().unwrap();
        assert_eq!(parsed, mode);
    }

    for shock in ShockEvent::ALL {
        let parsed: ShockEvent = shock.to_string().parse().unwrap();
        assert_eq!(parsed, shock);
    }
}

#[test]
fn test_unknown_scenario_strings_are_rejected() {
    assert!("COMMODITY_SPIKE".parse::<ShockEvent>().is_err());
    assert!("HYPERGROWTH".parse::<StrategyMode>().is_err());
}
