use crate::Result;
use async_trait::async_trait;
use chainsight_core::{DataTable, Warehouse};
use serde_json::{json, Value};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Column, Pool, Postgres, Row, TypeInfo};

/// Postgres-backed warehouse connection. The pool is safe for concurrent
/// independent calls, so one instance can be shared across query workers.
#[derive(Clone)]
pub struct WarehousePool {
    pool: Pool<Postgres>,
}

impl WarehousePool {
    /// Create new warehouse connection
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Initialize the warehouse schemas and tables the dashboard reads
    pub async fn init_schema(&self) -> Result<()> {
        for schema in ["analytics", "consumption", "intelligence", "raw"] {
            sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
                .execute(&self.pool)
                .await?;
        }

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS analytics.fact_performance_snapshot (
                snapshot_id BIGSERIAL PRIMARY KEY,
                performance_month DATE NOT NULL,
                region TEXT NOT NULL,
                strategy_mode TEXT NOT NULL,
                otif_pct DOUBLE PRECISION,
                fill_rate_pct DOUBLE PRECISION,
                net_sales_growth_pct DOUBLE PRECISION,
                lead_time_days DOUBLE PRECISION,
                order_flexibility_score DOUBLE PRECISION,
                forecast_mape_pct DOUBLE PRECISION,
                forecast_bias_pct DOUBLE PRECISION,
                npi_count INTEGER,
                gross_margin_pct DOUBLE PRECISION,
                ebitda_margin_pct DOUBLE PRECISION,
                cogs_usd DOUBLE PRECISION,
                sga_usd DOUBLE PRECISION,
                oee_pct DOUBLE PRECISION,
                first_pass_yield_pct DOUBLE PRECISION,
                purchasing_price_index DOUBLE PRECISION,
                roce_pct DOUBLE PRECISION,
                free_cash_flow_usd DOUBLE PRECISION,
                cash_conversion_cycle_days DOUBLE PRECISION,
                dioh_days DOUBLE PRECISION,
                dso_days DOUBLE PRECISION,
                dpo_days DOUBLE PRECISION,
                asset_turns DOUBLE PRECISION,
                cycle_stock_value DOUBLE PRECISION,
                safety_stock_value DOUBLE PRECISION,
                pipeline_stock_value DOUBLE PRECISION,
                anticipation_stock_value DOUBLE PRECISION,
                strategic_stock_value DOUBLE PRECISION,
                total_inventory_value DOUBLE PRECISION,
                nopat_usd DOUBLE PRECISION,
                working_capital_delta_usd DOUBLE PRECISION,
                fixed_asset_delta_usd DOUBLE PRECISION,
                capital_employed_usd DOUBLE PRECISION,
                eva_usd DOUBLE PRECISION
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS analytics.scenario_control (
                scenario_id INTEGER PRIMARY KEY,
                strategy_mode TEXT NOT NULL,
                shock_event TEXT,
                service_weight DOUBLE PRECISION NOT NULL,
                cost_weight DOUBLE PRECISION NOT NULL,
                cash_weight DOUBLE PRECISION NOT NULL,
                otif_delta_pct DOUBLE PRECISION NOT NULL,
                lead_time_delta_days DOUBLE PRECISION NOT NULL,
                safety_stock_delta_pct DOUBLE PRECISION NOT NULL,
                pipeline_stock_delta_pct DOUBLE PRECISION NOT NULL,
                roce_delta_pct DOUBLE PRECISION NOT NULL,
                fcf_delta_pct DOUBLE PRECISION NOT NULL,
                permissible_red TEXT NOT NULL,
                mandatory_green TEXT NOT NULL,
                economic_bet TEXT NOT NULL,
                UNIQUE (strategy_mode, shock_event)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS consumption.predictive_bridge (
                bridge_id BIGSERIAL PRIMARY KEY,
                performance_month DATE NOT NULL,
                region TEXT NOT NULL,
                scenario_id INTEGER NOT NULL REFERENCES analytics.scenario_control(scenario_id),
                predicted_fcf_usd DOUBLE PRECISION,
                predicted_roce_pct DOUBLE PRECISION,
                predicted_safety_stock_usd DOUBLE PRECISION,
                predicted_pipeline_stock_usd DOUBLE PRECISION,
                lead_time_impact_fcf DOUBLE PRECISION,
                forecast_error_impact_safety DOUBLE PRECISION,
                batch_size_impact_cycle DOUBLE PRECISION,
                fcf_lower_bound DOUBLE PRECISION,
                fcf_upper_bound DOUBLE PRECISION,
                roce_lower_bound DOUBLE PRECISION,
                roce_upper_bound DOUBLE PRECISION,
                model_source TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS intelligence.causal_trace_definitions (
                trace_id INTEGER PRIMARY KEY,
                source_metric TEXT NOT NULL,
                target_metric TEXT NOT NULL,
                relationship_type TEXT NOT NULL,
                causal_weight DOUBLE PRECISION NOT NULL,
                description TEXT NOT NULL,
                example_scenario TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE OR REPLACE VIEW intelligence.v_causal_traces AS
            SELECT trace_id, source_metric, target_metric, relationship_type,
                   causal_weight, description, example_scenario
            FROM intelligence.causal_trace_definitions
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS raw.qbr_documents (
                doc_id INTEGER PRIMARY KEY,
                doc_name TEXT NOT NULL,
                doc_type TEXT NOT NULL,
                quarter TEXT NOT NULL,
                year INTEGER NOT NULL,
                content_text TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Create indexes
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_perf_mode_month \
             ON analytics.fact_performance_snapshot(strategy_mode, performance_month)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_bridge_scenario_month \
             ON consumption.predictive_bridge(scenario_id, performance_month)",
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Warehouse schema initialized");

        Ok(())
    }
}

#[async_trait]
impl Warehouse for WarehousePool {
    async fn execute(&self, statement: &str) -> anyhow::Result<DataTable> {
        let rows = sqlx::query(statement).fetch_all(&self.pool).await?;

        if rows.is_empty() {
            return Ok(DataTable::empty());
        }

        let columns = rows[0]
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let mut table = DataTable::with_columns(columns);
        for row in &rows {
            table.push_row(row_to_values(row)?)?;
        }

        Ok(table)
    }
}

fn row_to_values(row: &PgRow) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        values.push(decode_cell(row, index, column.type_info().name())?);
    }
    Ok(values)
}

/// Decode one cell into a JSON value. NULLs map to JSON null; types without
/// a native mapping are surfaced as text.
fn decode_cell(row: &PgRow, index: usize, type_name: &str) -> Result<Value> {
    let value = match type_name {
        "BOOL" => row.try_get::<Option<bool>, _>(index)?.map(Value::from),
        "INT2" => row.try_get::<Option<i16>, _>(index)?.map(Value::from),
        "INT4" => row.try_get::<Option<i32>, _>(index)?.map(Value::from),
        "INT8" => row.try_get::<Option<i64>, _>(index)?.map(Value::from),
        "FLOAT4" => row.try_get::<Option<f32>, _>(index)?.map(|v| json!(v)),
        "FLOAT8" => row.try_get::<Option<f64>, _>(index)?.map(|v| json!(v)),
        "NUMERIC" => row
            .try_get::<Option<sqlx::types::BigDecimal>, _>(index)?
            .map(|v| {
                let text = v.to_string();
                match text.parse::<f64>() {
                    Ok(f) => json!(f),
                    Err(_) => Value::String(text),
                }
            }),
        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(index)?
            .map(|v| Value::String(v.to_string())),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(index)?
            .map(|v| Value::String(v.to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)?
            .map(|v| Value::String(v.to_rfc3339())),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => row
            .try_get::<Option<String>, _>(index)?
            .map(Value::String),
        other => match row.try_get::<Option<String>, _>(index) {
            Ok(v) => v.map(Value::String),
            Err(_) => {
                tracing::warn!("Unsupported column type {} at index {}", other, index);
                None
            }
        },
    };

    Ok(value.unwrap_or(Value::Null))
}
