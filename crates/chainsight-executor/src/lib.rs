pub mod error;

// Re-exports
pub use error::{Error, Result};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, Semaphore};

use chainsight_core::{ExecutionReport, QueryResult, QueryTask, Warehouse};

/// Run a batch of named queries against the warehouse with bounded
/// parallelism. Every task runs to completion; one task's failure never
/// cancels its siblings. With `fail_fast` the whole call fails after the
/// batch completes if any task failed, and the error lists every failing
/// task, not just the first. Without it the report carries a table per
/// success and an error entry per failure and callers check per task.
pub async fn run_queries(
    warehouse: Arc<dyn Warehouse>,
    tasks: Vec<QueryTask>,
    max_concurrency: usize,
    fail_fast: bool,
) -> Result<ExecutionReport> {
    if max_concurrency == 0 {
        return Err(Error::ZeroConcurrency);
    }

    let mut seen = HashSet::new();
    for task in &tasks {
        if !seen.insert(task.name.clone()) {
            return Err(Error::DuplicateTask(task.name.clone()));
        }
    }

    let started_at = Utc::now();
    let total = tasks.len();

    tracing::debug!(
        "Dispatching {} queries (max_concurrency={}, fail_fast={})",
        total,
        max_concurrency,
        fail_fast
    );

    let semaphore = Arc::new(Semaphore::new(max_concurrency));
    let (tx, mut rx) = mpsc::unbounded_channel::<QueryResult>();

    let mut handles = Vec::with_capacity(total);
    for task in tasks {
        let warehouse = warehouse.clone();
        let semaphore = semaphore.clone();
        let tx = tx.clone();
        let name = task.name.clone();

        let handle = tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    // The semaphore is never closed while workers are live.
                    let _ = tx.send(QueryResult::failed(
                        task.name,
                        "executor semaphore closed".to_string(),
                    ));
                    return;
                }
            };

            let outcome = warehouse.execute(&task.statement).await;

            let result = match outcome {
                Ok(table) => QueryResult::ok(task.name, table),
                Err(e) => {
                    tracing::warn!("Query '{}' failed: {}", task.name, e);
                    QueryResult::failed(task.name, e.to_string())
                }
            };

            let _ = tx.send(result);
        });

        handles.push((name, handle));
    }

    // Workers hold the only remaining senders; the drain below ends once
    // every worker has reported or died.
    drop(tx);

    let mut results: HashMap<String, QueryResult> = HashMap::with_capacity(total);
    while let Some(result) = rx.recv().await {
        results.insert(result.name.clone(), result);
    }

    // A worker that panicked never sent a result; record it as a per-task
    // failure so the report still has one entry per submitted name.
    for (name, handle) in handles {
        if let Err(e) = handle.await {
            tracing::error!("Query worker for '{}' panicked: {}", name, e);
            results
                .entry(name.clone())
                .or_insert_with(|| QueryResult::failed(name, format!("query worker panicked: {}", e)));
        }
    }

    let report = ExecutionReport::new(results, started_at, Utc::now());
    let failed = report.failures().len();

    tracing::info!(
        "Query batch {} finished: {}/{} succeeded",
        report.batch_id,
        report.len() - failed,
        report.len()
    );

    if fail_fast && failed > 0 {
        let failures = report
            .failures()
            .into_iter()
            .map(|(name, message)| (name.to_string(), message.to_string()))
            .collect();
        return Err(Error::BatchFailure { failures });
    }

    Ok(report)
}
