//! Named analysis queries used by individual dashboard panels. Kept as a
//! static registry so the API and CLI can enumerate and run them by name.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct AnalysisQuery {
    pub name: &'static str,
    pub sql: &'static str,
    pub description: &'static str,
}

pub const ANALYSIS_QUERIES: &[AnalysisQuery] = &[
    AnalysisQuery {
        name: "performance_snapshot",
        sql: "\
            SELECT * FROM analytics.fact_performance_snapshot \
            ORDER BY performance_month DESC",
        description: "Full performance snapshot data",
    },
    AnalysisQuery {
        name: "latest_metrics",
        sql: "\
            SELECT \
                region, \
                strategy_mode, \
                ROUND(AVG(otif_pct)::numeric, 1) as otif, \
                ROUND(AVG(gross_margin_pct)::numeric, 1) as margin, \
                ROUND(AVG(roce_pct)::numeric, 1) as roce, \
                ROUND((SUM(free_cash_flow_usd) / 1000000)::numeric, 2) as fcf_m \
            FROM analytics.fact_performance_snapshot \
            WHERE performance_month >= CURRENT_DATE - INTERVAL '3 months' \
            GROUP BY region, strategy_mode \
            ORDER BY region, strategy_mode",
        description: "Latest 3-month performance metrics",
    },
    AnalysisQuery {
        name: "inventory_breakdown",
        sql: "\
            SELECT \
                performance_month, \
                ROUND((SUM(cycle_stock_value) / 1000000)::numeric, 2) as cycle_m, \
                ROUND((SUM(safety_stock_value) / 1000000)::numeric, 2) as safety_m, \
                ROUND((SUM(pipeline_stock_value) / 1000000)::numeric, 2) as pipeline_m, \
                ROUND((SUM(anticipation_stock_value) / 1000000)::numeric, 2) as anticipation_m, \
                ROUND((SUM(strategic_stock_value) / 1000000)::numeric, 2) as strategic_m \
            FROM analytics.fact_performance_snapshot \
            GROUP BY performance_month \
            ORDER BY performance_month",
        description: "Monthly inventory decomposition",
    },
    AnalysisQuery {
        name: "triangle_metrics",
        sql: "\
            SELECT \
                strategy_mode, \
                ROUND(AVG(otif_pct)::numeric, 2) as service, \
                ROUND(AVG(gross_margin_pct)::numeric, 2) as cost, \
                ROUND(AVG(roce_pct)::numeric, 2) as cash \
            FROM analytics.fact_performance_snapshot \
            WHERE performance_month >= CURRENT_DATE - INTERVAL '1 month' \
            GROUP BY strategy_mode",
        description: "Triangle trade-off metrics by strategy",
    },
    AnalysisQuery {
        name: "scenario_control",
        sql: "\
            SELECT * FROM analytics.scenario_control \
            ORDER BY strategy_mode, shock_event NULLS FIRST",
        description: "Scenario control parameters",
    },
    AnalysisQuery {
        name: "financial_bridge",
        sql: "\
            SELECT \
                performance_month, \
                ROUND((SUM(nopat_usd) / 1000000)::numeric, 2) as nopat_m, \
                ROUND((SUM(working_capital_delta_usd) / 1000000)::numeric, 2) as wc_delta_m, \
                ROUND((SUM(fixed_asset_delta_usd) / 1000000)::numeric, 2) as fa_delta_m, \
                ROUND((SUM(free_cash_flow_usd) / 1000000)::numeric, 2) as fcf_m, \
                ROUND(AVG(roce_pct)::numeric, 2) as roce_pct \
            FROM analytics.fact_performance_snapshot \
            GROUP BY performance_month \
            ORDER BY performance_month DESC \
            LIMIT 12",
        description: "Financial bridge waterfall data",
    },
    AnalysisQuery {
        name: "causal_traces",
        sql: "\
            SELECT * FROM intelligence.causal_trace_definitions \
            ORDER BY causal_weight DESC",
        description: "Causal trace relationship definitions",
    },
    AnalysisQuery {
        name: "predictions",
        sql: "\
            SELECT \
                p.performance_month, \
                p.region, \
                s.strategy_mode, \
                s.shock_event, \
                ROUND((p.predicted_fcf_usd / 1000000)::numeric, 2) as pred_fcf_m, \
                ROUND(p.predicted_roce_pct::numeric, 2) as pred_roce, \
                ROUND((p.predicted_safety_stock_usd / 1000000)::numeric, 2) as pred_safety_m \
            FROM consumption.predictive_bridge p \
            JOIN analytics.scenario_control s ON p.scenario_id = s.scenario_id \
            WHERE p.performance_month >= CURRENT_DATE - INTERVAL '6 months' \
            ORDER BY p.performance_month DESC",
        description: "ML predictions with scenario context",
    },
    AnalysisQuery {
        name: "pipeline_vs_roce",
        sql: "\
            SELECT \
                performance_month, \
                ROUND((SUM(pipeline_stock_value) / 1000000)::numeric, 2) as pipeline_m, \
                ROUND(AVG(roce_pct)::numeric, 2) as roce \
            FROM analytics.fact_performance_snapshot \
            WHERE performance_month >= CURRENT_DATE - INTERVAL '1 year' \
            GROUP BY performance_month \
            ORDER BY performance_month",
        description: "Pipeline stock vs ROCE trend",
    },
];

pub fn lookup(name: &str) -> Result<&'static AnalysisQuery> {
    ANALYSIS_QUERIES
        .iter()
        .find(|q| q.name == name)
        .ok_or_else(|| Error::UnknownQuery(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_names_are_unique() {
        let names: HashSet<&str> = ANALYSIS_QUERIES.iter().map(|q| q.name).collect();
        assert_eq!(names.len(), ANALYSIS_QUERIES.len());
    }

    #[test]
    fn test_lookup() {
        let query = lookup("triangle_metrics").unwrap();
        assert!(query.sql.contains("strategy_mode"));

        assert!(lookup("golden_query").is_err());
    }
}
