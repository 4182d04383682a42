use chainsight_core::{QueryTask, ShockEvent, StrategyMode};

/// Task names for the dashboard bundle.
pub const PERFORMANCE: &str = "performance";
pub const PREDICTIONS: &str = "predictions";
pub const CAUSAL_TRACES: &str = "causal_traces";

pub const CAUSAL_TRACES_SQL: &str = "\
    SELECT * FROM intelligence.v_causal_traces \
    ORDER BY causal_weight DESC";

/// SQL fragment matching the scenario's shock column: the unshocked
/// scenario is stored as a NULL shock_event.
fn shock_filter(shock: ShockEvent) -> String {
    match shock.as_sql() {
        Some(literal) => format!("= '{}'", literal),
        None => "IS NULL".to_string(),
    }
}

pub fn performance_sql(strategy: StrategyMode, shock: ShockEvent) -> String {
    format!(
        r#"
        SELECT
            f.performance_month, f.region, f.strategy_mode,
            f.otif_pct, f.fill_rate_pct, f.net_sales_growth_pct,
            f.gross_margin_pct, f.ebitda_margin_pct, f.cogs_usd,
            f.roce_pct, f.free_cash_flow_usd, f.cash_conversion_cycle_days,
            f.cycle_stock_value, f.safety_stock_value, f.pipeline_stock_value,
            f.anticipation_stock_value, f.strategic_stock_value, f.total_inventory_value,
            f.forecast_mape_pct, f.lead_time_days, f.oee_pct,
            f.nopat_usd, f.capital_employed_usd, f.eva_usd,
            s.service_weight, s.cost_weight, s.cash_weight,
            s.permissible_red, s.mandatory_green, s.economic_bet
        FROM analytics.fact_performance_snapshot f
        JOIN analytics.scenario_control s
            ON f.strategy_mode = s.strategy_mode
            AND s.shock_event {shock_filter}
        WHERE f.strategy_mode = '{strategy}'
        ORDER BY f.performance_month DESC
        "#,
        shock_filter = shock_filter(shock),
        strategy = strategy.as_sql(),
    )
}

pub fn predictions_sql(strategy: StrategyMode, shock: ShockEvent) -> String {
    format!(
        r#"
        SELECT
            p.performance_month, p.region,
            p.predicted_fcf_usd, p.predicted_roce_pct,
            p.predicted_safety_stock_usd, p.predicted_pipeline_stock_usd,
            p.lead_time_impact_fcf, p.forecast_error_impact_safety,
            p.fcf_lower_bound, p.fcf_upper_bound,
            p.roce_lower_bound, p.roce_upper_bound
        FROM consumption.predictive_bridge p
        JOIN analytics.scenario_control s ON p.scenario_id = s.scenario_id
        WHERE s.strategy_mode = '{strategy}'
        AND s.shock_event {shock_filter}
        ORDER BY p.performance_month DESC
        "#,
        strategy = strategy.as_sql(),
        shock_filter = shock_filter(shock),
    )
}

/// The unshocked scenario's performance rows, used for side-by-side
/// baseline comparison.
pub fn baseline_sql(strategy: StrategyMode) -> String {
    format!(
        r#"
        SELECT
            f.performance_month, f.region, f.strategy_mode,
            f.otif_pct, f.gross_margin_pct, f.roce_pct, f.free_cash_flow_usd,
            f.safety_stock_value, f.pipeline_stock_value, f.total_inventory_value,
            f.capital_employed_usd, f.eva_usd
        FROM analytics.fact_performance_snapshot f
        JOIN analytics.scenario_control s
            ON f.strategy_mode = s.strategy_mode
            AND s.shock_event IS NULL
        WHERE f.strategy_mode = '{strategy}'
        ORDER BY f.performance_month DESC
        "#,
        strategy = strategy.as_sql(),
    )
}

/// The three named queries behind one dashboard view.
pub fn dashboard_tasks(strategy: StrategyMode, shock: ShockEvent) -> Vec<QueryTask> {
    vec![
        QueryTask::new(PERFORMANCE.to_string(), performance_sql(strategy, shock)),
        QueryTask::new(PREDICTIONS.to_string(), predictions_sql(strategy, shock)),
        QueryTask::new(CAUSAL_TRACES.to_string(), CAUSAL_TRACES_SQL.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unshocked_scenario_uses_null_filter() {
        let sql = performance_sql(StrategyMode::Growth, ShockEvent::None);
        assert!(sql.contains("s.shock_event IS NULL"));
        assert!(sql.contains("WHERE f.strategy_mode = 'GROWTH'"));
    }

    #[test]
    fn test_shocked_scenario_uses_literal_filter() {
        let sql = predictions_sql(StrategyMode::Cash, ShockEvent::PortStrike);
        assert!(sql.contains("s.shock_event = 'PORT_STRIKE'"));
        assert!(sql.contains("'CASH'"));
    }

    #[test]
    fn test_dashboard_tasks_have_unique_names() {
        let tasks = dashboard_tasks(StrategyMode::Margin, ShockEvent::DemandSurge);
        assert_eq!(tasks.len(), 3);

        let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec![PERFORMANCE, PREDICTIONS, CAUSAL_TRACES]);
    }
}
