use chainsight_core::StrategyMode;

use crate::service::{NarrativeOutcome, NarrativeService};

/// Build the analyst prompt for a free-form question about the data model.
pub fn analyst_prompt(question: &str) -> String {
    format!(
        r#"You are a supply chain finance analyst. Given this question about the causal chain data model, answer based on the semantic model context.

Question: {question}

The data model includes:
- performance: Monthly metrics (OTIF, ROCE, FCF, inventory values)
- inventory_structure: Inventory types and economic drivers
- scenarios: Strategy modes (GROWTH/MARGIN/CASH) and shock events
- predictions: ML-predicted outcomes

Provide a concise answer with specific metrics when relevant."#
    )
}

/// Ask the analyst a question. Failures fold into the outcome so the UI
/// always has something renderable.
pub async fn ask_analyst(service: &dyn NarrativeService, question: &str) -> NarrativeOutcome {
    let prompt = analyst_prompt(question);

    match service.complete(&prompt).await {
        Ok(response) => NarrativeOutcome::ok(response),
        Err(e) => {
            tracing::warn!("Analyst completion failed: {}", e);
            NarrativeOutcome::failed(e.to_string())
        }
    }
}

/// Build the CFO-facing explanation prompt for one causal trace edge.
pub fn causal_link_prompt(
    source_metric: &str,
    target_metric: &str,
    relationship_type: &str,
    weight: f64,
    strategy: StrategyMode,
) -> String {
    format!(
        r#"You are a supply chain strategist. Explain this causal link concisely for a CFO.

LINK: {source_metric} to {target_metric} ({relationship_type}, weight: {weight:.2})
STRATEGY: {strategy}

Provide 4 brief sections (about 100 words each):

1. MECHANISM: How does {source_metric} mechanically impact {target_metric}? One clear cause-effect chain.

2. FINANCIAL IMPACT: If {source_metric} improves 10 percent, what is the expected impact on {target_metric}? One industry benchmark.

3. STRATEGIC FIT: How does this link align with {strategy} strategy? One key trade-off.

4. ACTION LEVERS: 2-3 specific operational actions to influence {source_metric}. Be concrete.

Use markdown headers. Be direct and specific. Max 400 words total. No preamble or follow-up questions."#
    )
}

/// Explain one causal trace edge for the current strategy.
pub async fn explain_causal_link(
    service: &dyn NarrativeService,
    source_metric: &str,
    target_metric: &str,
    relationship_type: &str,
    weight: f64,
    strategy: StrategyMode,
) -> NarrativeOutcome {
    let prompt = causal_link_prompt(source_metric, target_metric, relationship_type, weight, strategy);

    match service.complete(&prompt).await {
        Ok(response) => NarrativeOutcome::ok(response),
        Err(e) => {
            tracing::warn!(
                "Causal explanation failed for {} -> {}: {}",
                source_metric,
                target_metric,
                e
            );
            NarrativeOutcome::failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoService;

    #[async_trait]
    impl NarrativeService for EchoService {
        fn model(&self) -> &str {
            "echo"
        }

        async fn complete(&self, prompt: &str) -> crate::Result<String> {
            Ok(format!("echo: {}", prompt.len()))
        }
    }

    struct DownService;

    #[async_trait]
    impl NarrativeService for DownService {
        fn model(&self) -> &str {
            "down"
        }

        async fn complete(&self, _prompt: &str) -> crate::Result<String> {
            Err(crate::Error::ApiError("service unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_ask_analyst_success() {
        let outcome = ask_analyst(&EchoService, "What drives safety stock?").await;
        assert!(outcome.success);
        assert!(outcome.response.is_some());
    }

    #[tokio::test]
    async fn test_ask_analyst_folds_failures() {
        let outcome = ask_analyst(&DownService, "What drives safety stock?").await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("service unavailable"));
    }

    #[test]
    fn test_causal_link_prompt_mentions_both_metrics() {
        let prompt = causal_link_prompt(
            "LEAD_TIME_DAYS",
            "PIPELINE_STOCK_VALUE",
            "POSITIVE",
            0.92,
            StrategyMode::Cash,
        );

        assert!(prompt.contains("LEAD_TIME_DAYS"));
        assert!(prompt.contains("PIPELINE_STOCK_VALUE"));
        assert!(prompt.contains("weight: 0.92"));
        assert!(prompt.contains("CASH"));
    }
}
