use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::query::QueryResult;
use crate::table::DataTable;

/// Outcome of one execution batch: a result per submitted task name.
/// Produced once by the executor and never mutated after return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub batch_id: String,
    pub results: HashMap<String, QueryResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ExecutionReport {
    pub fn new(
        results: HashMap<String, QueryResult>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            batch_id: Uuid::new_v4().to_string(),
            results,
            started_at,
            finished_at,
        }
    }

    pub fn table(&self, name: &str) -> Option<&DataTable> {
        self.results.get(name)?.table.as_ref()
    }

    /// Remove a task's table from the report, if it succeeded.
    pub fn take_table(&mut self, name: &str) -> Option<DataTable> {
        self.results.remove(name)?.table
    }

    /// Every failing task as (name, message), in no particular order.
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.results
            .values()
            .filter_map(|r| r.error.as_deref().map(|e| (r.name.as_str(), e)))
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.results.values().all(|r| r.is_ok())
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with(results: Vec<QueryResult>) -> ExecutionReport {
        let map = results.into_iter().map(|r| (r.name.clone(), r)).collect();
        let now = Utc::now();
        ExecutionReport::new(map, now, now)
    }

    #[test]
    fn test_all_success() {
        let report = report_with(vec![
            QueryResult::ok("a".to_string(), DataTable::empty()),
            QueryResult::ok("b".to_string(), DataTable::empty()),
        ]);

        assert!(report.is_success());
        assert!(report.failures().is_empty());
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_failures_listed() {
        let report = report_with(vec![
            QueryResult::ok("a".to_string(), DataTable::empty()),
            QueryResult::failed("b".to_string(), "timeout".to_string()),
        ]);

        assert!(!report.is_success());
        let failures = report.failures();
        assert_eq!(failures, vec![("b", "timeout")]);
        assert!(report.table("b").is_none());
        assert!(report.table("a").is_some());
    }

    #[test]
    fn test_take_table() {
        let mut report = report_with(vec![QueryResult::ok(
            "a".to_string(),
            DataTable::with_columns(vec!["X".to_string()]),
        )]);

        let table = report.take_table("a").unwrap();
        assert_eq!(table.num_columns(), 1);
        assert!(report.take_table("a").is_none());
    }
}
