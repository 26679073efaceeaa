use {
    async_trait::async_trait,
    secrecy::{ExposeSecret, SecretString},
};

use postpilot_common::{Error, Result};
use postpilot_config::OpenAiConfig;

use crate::model::{CompletionRequest, ImageProvider, ModelTier, TextProvider};

pub struct OpenAiProvider {
    api_key: SecretString,
    chat_model: String,
    summary_model: String,
    image_model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(config: &OpenAiConfig, client: reqwest::Client) -> Self {
        Self {
            api_key: config.api_key.clone(),
            chat_model: config.chat_model.clone(),
            summary_model: config.summary_model.clone(),
            image_model: config.image_model.clone(),
            base_url: config.base_url.clone(),
            client,
        }
    }

    fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Light => &self.chat_model,
            ModelTier::Heavy => &self.summary_model,
        }
    }
}

#[async_trait]
impl TextProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, req: CompletionRequest<'_>) -> Result<String> {
        let mut body = serde_json::json!({
            "model": self.model_for(req.tier),
            "messages": [
                { "role": "system", "content": req.system },
                { "role": "user", "content": req.user },
            ],
            "temperature": req.temperature,
        });
        if req.json {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }
        if let Some(max_tokens) = req.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

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
                "text generation failed",
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

#[async_trait]
impl ImageProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate_image(&self, prompt: &str, size: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.image_model,
            "prompt": prompt,
            "size": size,
            "quality": "hd",
            "n": 1,
            "response_format": "b64_json",
        });

        let resp = self
            .client
            .post(format!("{}/images/generations", self.base_url))
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
                "image generation failed",
                Some(format!("HTTP {status}: {body_text}")),
            ));
        }

        let resp = resp.json::<serde_json::Value>().await?;
        resp["data"][0]["b64_json"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| Error::Parse("image response missing b64_json".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base_url: &str) -> OpenAiProvider {
        OpenAiProvider::new(
            &OpenAiConfig {
                api_key: SecretString::new("sk-test".into()),
                base_url: base_url.into(),
                chat_model: "gpt-4o-mini".into(),
                summary_model: "gpt-4o".into(),
                image_model: "dall-e-3".into(),
            },
            reqwest::Client::new(),
        )
    }

    #[tokio::test]
    async fn complete_returns_message_content() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"{\"tweets\":[]}"}}]}"#)
            .create_async()
            .await;

        let out = provider(&server.url())
            .complete(CompletionRequest::json("sys", "user"))
            .await
            .unwrap();
        assert_eq!(out, r#"{"tweets":[]}"#);
    }

    #[tokio::test]
    async fn upstream_error_carries_status_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let err = provider(&server.url())
            .complete(CompletionRequest::json("sys", "user"))
            .await
            .unwrap_err();
        match err {
            Error::Upstream { detail, .. } => {
                assert!(detail.unwrap_or_default().contains("429"));
            },
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn image_generation_returns_b64() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/images/generations")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":[{"b64_json":"aGVsbG8="}]}"#)
            .create_async()
            .await;

        let b64 = provider(&server.url())
            .generate_image("a lighthouse", "1024x1024")
            .await
            .unwrap();
        assert_eq!(b64, "aGVsbG8=");
    }
}
