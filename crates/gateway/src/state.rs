use std::sync::Arc;

use {
    postpilot_common::{Error, Result},
    postpilot_config::AppConfig,
    postpilot_extract::Extractor,
    postpilot_generate::Orchestrator,
    postpilot_oauth::{MemorySessionStore, OAuthConfig, OAuthFlow, SessionStore},
    postpilot_providers::Providers,
    postpilot_twitter::TwitterClient,
};

use crate::error::ApiError;

const TWITTER_SCOPES: [&str; 4] = [
    "tweet.read",
    "tweet.write",
    "users.read",
    "offline.access",
];

/// Shared per-process state handed to every handler.
pub struct GatewayState {
    pub config: AppConfig,
    pub store: Arc<dyn SessionStore>,
    pub orchestrator: Orchestrator,
    pub twitter: TwitterClient,
    oauth: Option<OAuthFlow>,
}

impl GatewayState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let providers = Arc::new(Providers::from_config(&config, client.clone()));
        let extractor = Arc::new(Extractor::new(client.clone(), providers.serper()));
        let orchestrator = Orchestrator::new(Arc::clone(&providers), extractor);

        let twitter_base = config
            .twitter
            .as_ref()
            .map(|t| t.api_base_url.clone())
            .unwrap_or_else(|| "https://api.twitter.com".into());

        let oauth = config.twitter.as_ref().map(|t| {
            OAuthFlow::new(
                OAuthConfig {
                    client_id: t.client_id.clone(),
                    client_secret: t.client_secret.clone(),
                    auth_url: t.auth_url.clone(),
                    token_url: t.token_url.clone(),
                    redirect_uri: t.redirect_uri.clone(),
                    scopes: TWITTER_SCOPES.iter().map(|s| s.to_string()).collect(),
                },
                client.clone(),
            )
        });

        Ok(Self {
            store: Arc::new(MemorySessionStore::new()),
            orchestrator,
            twitter: TwitterClient::new(twitter_base, client),
            oauth,
            config,
        })
    }

    /// The OAuth flow, or a configuration error when the Twitter section
    /// is absent. Checked before any secret is generated.
    pub fn oauth_flow(&self) -> Result<&OAuthFlow> {
        self.oauth
            .as_ref()
            .ok_or_else(|| Error::config("Twitter OAuth is not configured"))
    }

    /// Wrap a taxonomy error for the HTTP boundary, honoring the
    /// production-mode detail gate.
    pub fn err(&self, error: Error) -> ApiError {
        ApiError::new(error, !self.config.production)
    }
}
