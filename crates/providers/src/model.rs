use async_trait::async_trait;

use postpilot_common::Result;

/// Which model a provider should reach for. `Light` maps to the cheap
/// high-volume model, `Heavy` to the stronger model used for summaries.
/// Providers with a single model ignore the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Light,
    Heavy,
}

/// A single-shot chat completion request.
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Ask the provider for strict JSON output where it supports that.
    pub json: bool,
    pub tier: ModelTier,
}

impl<'a> CompletionRequest<'a> {
    pub fn json(system: &'a str, user: &'a str) -> Self {
        Self {
            system,
            user,
            temperature: 0.7,
            max_tokens: None,
            json: true,
            tier: ModelTier::Light,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn tier(mut self, tier: ModelTier) -> Self {
        self.tier = tier;
        self
    }
}

/// Text-generation provider seam.
#[async_trait]
pub trait TextProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Run a completion and return the raw assistant text. Callers own
    /// parsing; an unusable shape is their fallback trigger, not ours.
    async fn complete(&self, req: CompletionRequest<'_>) -> Result<String>;
}

/// Image-generation provider seam.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Generate one image; returns base64-encoded bytes.
    async fn generate_image(&self, prompt: &str, size: &str) -> Result<String>;
}
