pub mod queries;
pub mod registry;
pub mod loader;
pub mod error;

// Re-exports
pub use loader::{DashboardBundle, DashboardLoader, DEFAULT_CACHE_TTL};
pub use registry::AnalysisQuery;
pub use error::{Error, Result};
