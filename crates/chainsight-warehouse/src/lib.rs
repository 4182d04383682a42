pub mod pool;
pub mod error;

// Re-exports
pub use pool::WarehousePool;
pub use error::{Error, Result};
