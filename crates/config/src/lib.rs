use std::time::Duration;

use {anyhow::bail, secrecy::SecretString, tracing::debug};

const DEFAULT_APP_URL: &str = "http://localhost:3000";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_CHAT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OPENAI_SUMMARY_MODEL: &str = "gpt-4o";
const DEFAULT_OPENAI_IMAGE_MODEL: &str = "dall-e-3";

const DEFAULT_PERPLEXITY_BASE_URL: &str = "https://api.perplexity.ai";
const DEFAULT_PERPLEXITY_MODEL: &str = "llama-3.1-sonar-small-128k-online";

const DEFAULT_SERPER_BASE_URL: &str = "https://google.serper.dev";

const DEFAULT_TWITTER_AUTH_URL: &str = "https://twitter.com/i/oauth2/authorize";
const DEFAULT_TWITTER_TOKEN_URL: &str = "https://api.twitter.com/2/oauth2/token";
const DEFAULT_TWITTER_API_BASE_URL: &str = "https://api.twitter.com";

/// Application configuration, constructed once at startup and passed by
/// reference to every component. A partially-configured provider section is
/// a construction-time error, not a per-request surprise.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Public base URL of the application, used for post-OAuth redirects.
    pub app_url: String,
    /// Production mode suppresses upstream diagnostic detail in error bodies.
    pub production: bool,
    /// Timeout applied to every outbound HTTP call.
    pub http_timeout: Duration,
    pub openai: Option<OpenAiConfig>,
    pub perplexity: Option<PerplexityConfig>,
    pub serper: Option<SerperConfig>,
    pub twitter: Option<TwitterConfig>,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub chat_model: String,
    pub summary_model: String,
    pub image_model: String,
}

#[derive(Debug, Clone)]
pub struct PerplexityConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct SerperConfig {
    pub api_key: SecretString,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct TwitterConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Tests inject a map here instead
    /// of mutating process-wide environment variables.
    pub fn from_lookup(get: &dyn Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let app_url = get("APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.into());
        let production = get("POSTPILOT_ENV").as_deref() == Some("production");

        let timeout_secs = match get("POSTPILOT_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("POSTPILOT_HTTP_TIMEOUT_SECS must be an integer"))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let openai = get("OPENAI_API_KEY").map(|key| OpenAiConfig {
            api_key: SecretString::new(key),
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.into()),
            chat_model: get("OPENAI_CHAT_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_CHAT_MODEL.into()),
            summary_model: get("OPENAI_SUMMARY_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_SUMMARY_MODEL.into()),
            image_model: get("OPENAI_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_IMAGE_MODEL.into()),
        });

        let perplexity = get("PERPLEXITY_API_KEY").map(|key| PerplexityConfig {
            api_key: SecretString::new(key),
            base_url: get("PERPLEXITY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PERPLEXITY_BASE_URL.into()),
            model: get("PERPLEXITY_MODEL").unwrap_or_else(|| DEFAULT_PERPLEXITY_MODEL.into()),
        });

        let serper = get("SERPER_API_KEY").map(|key| SerperConfig {
            api_key: SecretString::new(key),
            base_url: get("SERPER_BASE_URL").unwrap_or_else(|| DEFAULT_SERPER_BASE_URL.into()),
        });

        let twitter = Self::twitter_from_lookup(get)?;

        debug!(
            openai = openai.is_some(),
            perplexity = perplexity.is_some(),
            serper = serper.is_some(),
            twitter = twitter.is_some(),
            "configuration loaded"
        );

        Ok(Self {
            app_url,
            production,
            http_timeout: Duration::from_secs(timeout_secs),
            openai,
            perplexity,
            serper,
            twitter,
        })
    }

    /// The Twitter section requires client id, client secret, and redirect
    /// URI together. Setting only some of them is a misconfiguration worth
    /// failing on at startup instead of at callback time.
    fn twitter_from_lookup(
        get: &dyn Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Option<TwitterConfig>> {
        let client_id = get("TWITTER_CLIENT_ID");
        let client_secret = get("TWITTER_CLIENT_SECRET");
        let redirect_uri = get("TWITTER_REDIRECT_URI");

        match (client_id, client_secret, redirect_uri) {
            (None, None, None) => Ok(None),
            (Some(client_id), Some(client_secret), Some(redirect_uri)) => Ok(Some(TwitterConfig {
                client_id,
                client_secret: SecretString::new(client_secret),
                redirect_uri,
                auth_url: get("TWITTER_AUTH_URL")
                    .unwrap_or_else(|| DEFAULT_TWITTER_AUTH_URL.into()),
                token_url: get("TWITTER_TOKEN_URL")
                    .unwrap_or_else(|| DEFAULT_TWITTER_TOKEN_URL.into()),
                api_base_url: get("TWITTER_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_TWITTER_API_BASE_URL.into()),
            })),
            _ => bail!(
                "incomplete Twitter OAuth configuration: TWITTER_CLIENT_ID, \
                 TWITTER_CLIENT_SECRET and TWITTER_REDIRECT_URI must all be set"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_env_yields_no_providers() {
        let cfg = AppConfig::from_lookup(&lookup(&[])).unwrap();
        assert!(cfg.openai.is_none());
        assert!(cfg.perplexity.is_none());
        assert!(cfg.serper.is_none());
        assert!(cfg.twitter.is_none());
        assert_eq!(cfg.app_url, DEFAULT_APP_URL);
        assert!(!cfg.production);
    }

    #[test]
    fn complete_twitter_section() {
        let cfg = AppConfig::from_lookup(&lookup(&[
            ("TWITTER_CLIENT_ID", "cid"),
            ("TWITTER_CLIENT_SECRET", "shh"),
            ("TWITTER_REDIRECT_URI", "http://localhost:3000/api/twitter/callback"),
        ]))
        .unwrap();
        let tw = cfg.twitter.unwrap();
        assert_eq!(tw.client_id, "cid");
        assert_eq!(tw.auth_url, DEFAULT_TWITTER_AUTH_URL);
    }

    #[test]
    fn partial_twitter_section_is_an_error() {
        let result = AppConfig::from_lookup(&lookup(&[("TWITTER_CLIENT_ID", "cid")]));
        assert!(result.is_err());
    }

    #[test]
    fn openai_defaults_and_overrides() {
        let cfg = AppConfig::from_lookup(&lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://127.0.0.1:9999/v1"),
        ]))
        .unwrap();
        let oa = cfg.openai.unwrap();
        assert_eq!(oa.base_url, "http://127.0.0.1:9999/v1");
        assert_eq!(oa.chat_model, DEFAULT_OPENAI_CHAT_MODEL);
    }

    #[test]
    fn bad_timeout_rejected() {
        let result = AppConfig::from_lookup(&lookup(&[("POSTPILOT_HTTP_TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn production_flag() {
        let cfg = AppConfig::from_lookup(&lookup(&[("POSTPILOT_ENV", "production")])).unwrap();
        assert!(cfg.production);
    }
}
