use async_trait::async_trait;

use crate::table::DataTable;

/// Any client that can run a text query and return rows with named columns.
/// Implementations must be safe for concurrent independent calls; the
/// executor issues one `execute` per task with no coordination between them.
#[async_trait]
pub trait Warehouse: Send + Sync {
    async fn execute(&self, statement: &str) -> anyhow::Result<DataTable>;
}
