pub mod model;
pub mod openai;
pub mod perplexity;
pub mod serper;

use std::sync::Arc;

use postpilot_config::AppConfig;

pub use {
    model::{CompletionRequest, ImageProvider, ModelTier, TextProvider},
    openai::OpenAiProvider,
    perplexity::PerplexityProvider,
    serper::{SearchHit, SerperClient},
};

/// Registry of configured external providers.
///
/// Built once from the startup configuration; a missing key simply leaves
/// the slot empty and callers fall back accordingly.
pub struct Providers {
    openai: Option<Arc<OpenAiProvider>>,
    perplexity: Option<Arc<PerplexityProvider>>,
    serper: Option<Arc<SerperClient>>,
}

impl Providers {
    pub fn from_config(config: &AppConfig, client: reqwest::Client) -> Self {
        Self {
            openai: config
                .openai
                .as_ref()
                .map(|c| Arc::new(OpenAiProvider::new(c, client.clone()))),
            perplexity: config
                .perplexity
                .as_ref()
                .map(|c| Arc::new(PerplexityProvider::new(c, client.clone()))),
            serper: config
                .serper
                .as_ref()
                .map(|c| Arc::new(SerperClient::new(c, client.clone()))),
        }
    }

    /// Preferred provider for structured text generation.
    pub fn text(&self) -> Option<Arc<dyn TextProvider>> {
        self.openai
            .clone()
            .map(|p| p as Arc<dyn TextProvider>)
    }

    /// Provider with live web knowledge, preferred for trending lookups.
    pub fn online_text(&self) -> Option<Arc<dyn TextProvider>> {
        self.perplexity
            .clone()
            .map(|p| p as Arc<dyn TextProvider>)
    }

    pub fn image(&self) -> Option<Arc<dyn ImageProvider>> {
        self.openai
            .clone()
            .map(|p| p as Arc<dyn ImageProvider>)
    }

    pub fn serper(&self) -> Option<Arc<SerperClient>> {
        self.serper.clone()
    }

    pub fn summary(&self) -> String {
        let mut configured = Vec::new();
        if self.openai.is_some() {
            configured.push("openai");
        }
        if self.perplexity.is_some() {
            configured.push("perplexity");
        }
        if self.serper.is_some() {
            configured.push("serper");
        }
        if configured.is_empty() {
            "no providers configured".into()
        } else {
            configured.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_yields_empty_registry() {
        let config = AppConfig::from_lookup(&|_| None).unwrap();
        let providers = Providers::from_config(&config, reqwest::Client::new());
        assert!(providers.text().is_none());
        assert!(providers.online_text().is_none());
        assert!(providers.image().is_none());
        assert!(providers.serper().is_none());
        assert_eq!(providers.summary(), "no providers configured");
    }

    #[test]
    fn openai_key_enables_text_and_image() {
        let config = AppConfig::from_lookup(&|key| {
            (key == "OPENAI_API_KEY").then(|| "sk-test".to_string())
        })
        .unwrap();
        let providers = Providers::from_config(&config, reqwest::Client::new());
        assert!(providers.text().is_some());
        assert!(providers.image().is_some());
        assert!(providers.online_text().is_none());
        assert_eq!(providers.summary(), "openai");
    }
}
