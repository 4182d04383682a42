use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;

use chainsight_core::{DataTable, ShockEvent, StrategyMode, Warehouse};
use chainsight_executor::run_queries;

use crate::error::Result;
use crate::queries;

/// How long a cached bundle stays valid.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// The three dashboard queries are submitted together; one worker each.
const DASHBOARD_CONCURRENCY: usize = 3;

/// The datasets behind one dashboard view. Any table may be empty; an empty
/// `performance` table means "no data for this selection" and consumers must
/// not derive metrics from it.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardBundle {
    pub performance: DataTable,
    pub predictions: DataTable,
    pub causal_traces: DataTable,
}

impl DashboardBundle {
    pub fn has_data(&self) -> bool {
        !self.performance.is_empty()
    }
}

struct CacheEntry<T> {
    value: T,
    created_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            created_at: Instant::now(),
        }
    }

    fn fresh(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() < ttl
    }
}

/// Loads and memoizes the dashboard datasets. Owns two independent TTL
/// caches: bundles keyed by (strategy, shock) and baseline tables keyed by
/// strategy alone. Expired entries are replaced wholesale under the write
/// lock; concurrent misses for the same key may refetch redundantly.
pub struct DashboardLoader {
    warehouse: Arc<dyn Warehouse>,
    ttl: Duration,
    dashboard_cache: RwLock<HashMap<(StrategyMode, ShockEvent), CacheEntry<DashboardBundle>>>,
    baseline_cache: RwLock<HashMap<StrategyMode, CacheEntry<DataTable>>>,
}

impl DashboardLoader {
    pub fn new(warehouse: Arc<dyn Warehouse>) -> Self {
        Self {
            warehouse,
            ttl: DEFAULT_CACHE_TTL,
            dashboard_cache: RwLock::new(HashMap::new()),
            baseline_cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Load the current scenario's datasets, from cache when fresh. Missing
    /// datasets are downgraded to empty tables so the dashboard can degrade
    /// instead of crash; only executor-level misuse surfaces as an error.
    pub async fn load_dashboard_data(
        &self,
        strategy: StrategyMode,
        shock: ShockEvent,
    ) -> Result<DashboardBundle> {
        let key = (strategy, shock);

        if let Some(entry) = self.dashboard_cache.read().await.get(&key) {
            if entry.fresh(self.ttl) {
                tracing::debug!("Dashboard cache hit for {}/{}", strategy, shock);
                return Ok(entry.value.clone());
            }
        }

        tracing::info!("Loading dashboard data for {}/{}", strategy, shock);

        let tasks = queries::dashboard_tasks(strategy, shock);
        let mut report = run_queries(
            self.warehouse.clone(),
            tasks,
            DASHBOARD_CONCURRENCY,
            false,
        )
        .await?;

        for (name, message) in report.failures() {
            tracing::warn!(
                "Dashboard query '{}' failed, substituting empty table: {}",
                name,
                message
            );
        }

        let bundle = DashboardBundle {
            performance: report
                .take_table(queries::PERFORMANCE)
                .unwrap_or_else(DataTable::empty),
            predictions: report
                .take_table(queries::PREDICTIONS)
                .unwrap_or_else(DataTable::empty),
            causal_traces: report
                .take_table(queries::CAUSAL_TRACES)
                .unwrap_or_else(DataTable::empty),
        };

        self.dashboard_cache
            .write()
            .await
            .insert(key, CacheEntry::new(bundle.clone()));

        Ok(bundle)
    }

    /// Load the unshocked scenario's performance rows for baseline
    /// comparison. Separate cache from the bundle path; callers opt in to
    /// this fetch, the loader never issues it on its own.
    pub async fn load_baseline_data(&self, strategy: StrategyMode) -> Result<DataTable> {
        if let Some(entry) = self.baseline_cache.read().await.get(&strategy) {
            if entry.fresh(self.ttl) {
                tracing::debug!("Baseline cache hit for {}", strategy);
                return Ok(entry.value.clone());
            }
        }

        tracing::info!("Loading baseline data for {}", strategy);

        let table = self
            .warehouse
            .execute(&queries::baseline_sql(strategy))
            .await?;

        self.baseline_cache
            .write()
            .await
            .insert(strategy, CacheEntry::new(table.clone()));

        Ok(table)
    }

    /// Run one registry query by name. Errors surface directly; this path
    /// is not cached.
    pub async fn run_analysis_query(&self, name: &str) -> Result<DataTable> {
        let query = crate::registry::lookup(name)?;
        let table = self.warehouse.execute(query.sql).await?;
        Ok(table)
    }
}
