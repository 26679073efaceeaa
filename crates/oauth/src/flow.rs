use {secrecy::ExposeSecret, tracing::warn, url::Url};

use postpilot_common::{Error, Result, time::unix_now};

use crate::{
    pkce,
    store::LOGIN_TTL_SECS,
    types::{OAuthConfig, OAuthSession, OAuthTokens, PkceChallenge},
};

/// Entropy of the `state` correlation token, before encoding.
const STATE_BYTES: usize = 16;

/// A freshly started authorization attempt: the URL to redirect the user
/// agent to, plus the secrets that must be stored until the callback.
pub struct AuthRequest {
    pub url: String,
    pub state: String,
    pub pkce: PkceChallenge,
}

impl AuthRequest {
    /// The store entry matching this request, expiring in ten minutes.
    pub fn login_session(&self) -> OAuthSession {
        OAuthSession {
            state: self.state.clone(),
            code_verifier: self.pkce.verifier.clone(),
            expires_at: unix_now() + LOGIN_TTL_SECS,
        }
    }
}

/// OAuth 2.0 authorization-code flow with PKCE (S256).
pub struct OAuthFlow {
    config: OAuthConfig,
    client: reqwest::Client,
}

impl OAuthFlow {
    pub fn new(config: OAuthConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Begin an authorization attempt: generate state + PKCE pair and build
    /// the provider authorization URL.
    pub fn start(&self) -> Result<AuthRequest> {
        let state = pkce::random_urlsafe(STATE_BYTES);
        let pkce = pkce::generate();

        let mut url = Url::parse(&self.config.auth_url)
            .map_err(|e| Error::config(format!("invalid auth URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("state", &state)
            .append_pair("code_challenge", &pkce.challenge)
            .append_pair("code_challenge_method", "S256");

        Ok(AuthRequest {
            url: url.into(),
            state,
            pkce,
        })
    }

    /// Exchange an authorization code for tokens.
    ///
    /// Submits the code and verifier with HTTP Basic client credentials.
    /// A non-success response aborts the flow; the upstream body is kept
    /// for diagnostics only.
    pub async fn exchange(&self, code: &str, code_verifier: &str) -> Result<OAuthTokens> {
        let resp = self
            .client
            .post(&self.config.token_url)
            .basic_auth(
                &self.config.client_id,
                Some(self.config.client_secret.expose_secret()),
            )
            .form(&[
                ("code", code),
                ("grant_type", "authorization_code"),
                ("client_id", &self.config.client_id),
                ("redirect_uri", &self.config.redirect_uri),
                ("code_verifier", code_verifier),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, "token exchange rejected");
            return Err(Error::upstream(
                "token exchange failed",
                Some(format!("HTTP {status}: {body}")),
            ));
        }

        let body: serde_json::Value = resp.json().await?;
        let access_token = body["access_token"]
            .as_str()
            .ok_or_else(|| Error::Parse("token response missing access_token".into()))?
            .to_string();
        let refresh_token = body["refresh_token"].as_str().map(|s| s.to_string());
        let expires_at = body["expires_in"].as_u64().map(|secs| unix_now() + secs);

        Ok(OAuthTokens {
            access_token,
            refresh_token,
            expires_at,
        })
    }
}
