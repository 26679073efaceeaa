use {
    async_trait::async_trait,
    secrecy::{ExposeSecret, SecretString},
};

use postpilot_common::{Error, Result};
use postpilot_config::PerplexityConfig;

use crate::model::{CompletionRequest, TextProvider};

/// Perplexity online model. No strict-JSON mode: the `json` flag is
/// ignored and callers extract JSON from the returned prose.
pub struct PerplexityProvider {
    api_key: SecretString,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl PerplexityProvider {
    pub fn new(config: &PerplexityConfig, client: reqwest::Client) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            client,
        }
    }
}

#[async_trait]
impl TextProvider for PerplexityProvider {
    fn name(&self) -> &str {
        "perplexity"
    }

    async fn complete(&self, req: CompletionRequest<'_>) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": req.system },
                { "role": "user", "content": req.user },
            ],
            "max_tokens": req.max_tokens.unwrap_or(2000),
            "temperature": req.temperature,
            "top_p": 0.9,
            "return_citations": false,
            "search_recency_filter": "month",
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp.text().await.unwrap_or_default();
            return Err(Error::upstream(
                "online search completion failed",
                Some(format!("HTTP {status}: {body_text}")),
            ));
        }

        let resp = resp.json::<serde_json::Value>().await?;
        resp["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| Error::Parse("completion response missing content".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn complete_returns_content() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"[{\"title\":\"t\"}]"}}]}"#)
            .create_async()
            .await;

        let provider = PerplexityProvider::new(
            &PerplexityConfig {
                api_key: SecretString::new("pk-test".into()),
                base_url: server.url(),
                model: "llama-3.1-sonar-small-128k-online".into(),
            },
            reqwest::Client::new(),
        );
        let out = provider
            .complete(CompletionRequest::json("sys", "user"))
            .await
            .unwrap();
        assert!(out.starts_with('['));
    }
}
