use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Hosted language model seam: takes one templated prompt, returns free
/// text. Implementations decide model and transport.
#[async_trait]
pub trait NarrativeService: Send + Sync {
    /// Model identifier used for completions.
    fn model(&self) -> &str;

    async fn complete(&self, prompt: &str) -> crate::Result<String>;
}

/// A narrative answer as the UI consumes it: either a response or an error
/// string, never an exception.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeOutcome {
    pub success: bool,
    pub response: Option<String>,
    pub error: Option<String>,
}

impl NarrativeOutcome {
    pub fn ok(response: String) -> Self {
        Self {
            success: true,
            response: Some(response),
            error: None,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error),
        }
    }
}
