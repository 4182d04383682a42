use serde::{Deserialize, Serialize};

use crate::table::DataTable;

/// One named SQL statement submitted to the executor. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryTask {
    pub name: String,
    pub statement: String,
}

impl QueryTask {
    pub fn new(name: String, statement: String) -> Self {
        Self { name, statement }
    }
}

/// Per-task outcome. Exactly one of `table`/`error` is set; use the
/// constructors rather than building the struct by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub name: String,
    pub table: Option<DataTable>,
    pub error: Option<String>,
}

impl QueryResult {
    pub fn ok(name: String, table: DataTable) -> Self {
        Self {
            name,
            table: Some(table),
            error: None,
        }
    }

    pub fn failed(name: String, error: String) -> Self {
        Self {
            name,
            table: None,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_result() {
        let result = QueryResult::ok("performance".to_string(), DataTable::empty());
        assert!(result.is_ok());
        assert!(result.table.is_some());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_failed_result() {
        let result = QueryResult::failed(
            "predictions".to_string(),
            "relation does not exist".to_string(),
        );
        assert!(!result.is_ok());
        assert!(result.table.is_none());
    }
}
