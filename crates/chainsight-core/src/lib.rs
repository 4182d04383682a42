pub mod scenario;
pub mod table;
pub mod query;
pub mod report;
pub mod warehouse;
pub mod error;

// Re-exports
pub use scenario::{ShockEvent, StrategyMode};
pub use table::DataTable;
pub use query::{QueryResult, QueryTask};
pub use report::ExecutionReport;
pub use warehouse::Warehouse;
pub use error::{Error, Result};
