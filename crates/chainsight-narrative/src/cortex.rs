use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::service::NarrativeService;
use crate::Result;

pub const DEFAULT_MODEL: &str = "mistral-large2";

/// REST client for a hosted completion endpoint.
pub struct CortexClient {
    client: Client,
    api_url: String,
    api_token: String,
    model: String,
}

impl CortexClient {
    pub fn new(api_url: String, api_token: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_token,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    async fn call_api(&self, messages: Vec<Message>) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/api/v2/cortex/inference:complete", self.api_url))
            .header("authorization", format!("Bearer {}", self.api_token))
            .header("content-type", "application/json")
            .json(&json!({
                "model": &self.model,
                "messages": messages,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(crate::Error::ApiError(format!(
                "Cortex API error: {}",
                error_text
            )));
        }

        let result: CompletionResponse = response.json().await?;
        Ok(result
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl NarrativeService for CortexClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        tracing::debug!("Requesting completion from {}", self.model);

        let messages = vec![Message {
            role: "user".to_string(),
            content: prompt.to_string(),
        }];

        self.call_api(messages).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_complete_parses_response() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/api/v2/cortex/inference:complete")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"content":"Longer lead times inflate pipeline stock."}}]}"#,
            )
            .create_async()
            .await;

        let client = CortexClient::new(server.url(), "test-token".to_string());
        let text = client
            .complete("Why does lead time matter?")
            .await
            .unwrap();

        assert_eq!(text, "Longer lead times inflate pipeline stock.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_surfaces() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/api/v2/cortex/inference:complete")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let client = CortexClient::new(server.url(), "test-token".to_string());
        let err = client.complete("question").await.unwrap_err();

        assert!(matches!(err, crate::Error::ApiError(_)));
    }

    #[tokio::test]
    async fn test_empty_choices_yield_empty_text() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/api/v2/cortex/inference:complete")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = CortexClient::new(server.url(), "test-token".to_string());
        let text = client.complete("question").await.unwrap();

        assert!(text.is_empty());
    }
}
