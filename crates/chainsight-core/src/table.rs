use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Tabular query result: named columns, ordered rows, JSON-typed cells.
/// An empty table (no rows) is a normal value, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl DataTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. The row must have one value per column.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::ColumnCountMismatch {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell lookup by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Numeric cell lookup, tolerating integer-typed JSON values.
    pub fn f64_value(&self, row: usize, column: &str) -> Option<f64> {
        self.value(row, column)?.as_f64()
    }

    pub fn first_row(&self) -> Option<&Vec<Value>> {
        self.rows.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_table() {
        let table = DataTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.num_columns(), 0);
    }

    #[test]
    fn test_push_row() {
        let mut table =
            DataTable::with_columns(vec!["REGION".to_string(), "ROCE_PCT".to_string()]);

        table
            .push_row(vec![json!("EMEA"), json!(14.2)])
            .unwrap();

        assert_eq!(table.num_rows(), 1);
        assert_eq!(table.value(0, "REGION"), Some(&json!("EMEA")));
        assert_eq!(table.f64_value(0, "ROCE_PCT"), Some(14.2));
    }

    #[test]
    fn test_push_row_arity_mismatch() {
        let mut table = DataTable::with_columns(vec!["A".to_string(), "B".to_string()]);

        let result = table.push_row(vec![json!(1)]);
        assert!(result.is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_unknown_column() {
        let mut table = DataTable::with_columns(vec!["A".to_string()]);
        table.push_row(vec![json!(1)]).unwrap();

        assert_eq!(table.value(0, "MISSING"), None);
    }
}
