use {
    secrecy::SecretString,
    serde::{Deserialize, Serialize},
};

/// OAuth 2.0 provider configuration.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    pub auth_url: String,
    pub token_url: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

/// Stored OAuth tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix timestamp when the access token expires.
    pub expires_at: Option<u64>,
}

/// PKCE challenge pair.
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    pub verifier: String,
    pub challenge: String,
}

/// One-time login attempt: the `state` token and PKCE verifier written at
/// flow start, consumed exactly once by the callback.
#[derive(Debug, Clone)]
pub struct OAuthSession {
    pub state: String,
    pub code_verifier: String,
    /// Unix timestamp after which the entry is no longer consumable.
    pub expires_at: u64,
}

/// Terminal failure of the callback state machine. Carried back to the
/// application as a redirect query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The provider reported an error (user declined the grant).
    Denied,
    /// `code` or `state` missing from the callback query.
    InvalidRequest,
    /// Received state does not match the stored one, or no login attempt
    /// is pending for this session.
    InvalidState,
    /// Token endpoint returned a non-success response.
    ExchangeFailed,
    /// Tokens were issued but the profile fetch failed; commit is blocked.
    ProfileFailed,
}

impl AbortReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Denied => "denied",
            Self::InvalidRequest => "invalid_request",
            Self::InvalidState => "invalid_state",
            Self::ExchangeFailed => "exchange_failed",
            Self::ProfileFailed => "profile_failed",
        }
    }
}
