use {async_trait::async_trait, dashmap::DashMap, tracing::debug};

use postpilot_common::{time::unix_now, types::ProviderUser};

use crate::types::{OAuthSession, OAuthTokens};

/// Lifetime of a pending login attempt (state + verifier).
pub const LOGIN_TTL_SECS: u64 = 600;

/// Hard cap on how long a committed token set is kept, matching the
/// provider's 30-day refresh-token lifetime. There is no in-place refresh;
/// re-running the flow replaces the set.
pub const TOKEN_SET_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Per-session credential storage behind a swappable interface.
///
/// Keyed by an opaque session id; the backing store can move to Redis or a
/// database without touching flow logic. Expired entries are dropped lazily
/// on read.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Record a pending login attempt, replacing any previous one.
    async fn put_login(&self, session_id: &str, login: OAuthSession);

    /// Consume the pending login attempt. Single-use: a second call for the
    /// same session returns `None`, as does a call after expiry.
    async fn take_login(&self, session_id: &str) -> Option<OAuthSession>;

    async fn put_tokens(&self, session_id: &str, tokens: OAuthTokens);

    /// Current access tokens, if present and unexpired.
    async fn tokens(&self, session_id: &str) -> Option<OAuthTokens>;

    async fn put_user(&self, session_id: &str, user: ProviderUser);

    async fn user(&self, session_id: &str) -> Option<ProviderUser>;

    /// Drop everything stored for the session.
    async fn clear(&self, session_id: &str);
}

#[derive(Default)]
struct SessionEntry {
    login: Option<OAuthSession>,
    tokens: Option<StoredTokens>,
    user: Option<ProviderUser>,
}

struct StoredTokens {
    tokens: OAuthTokens,
    stored_at: u64,
}

/// In-memory `SessionStore` used by the gateway.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: DashMap<String, SessionEntry>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put_login(&self, session_id: &str, login: OAuthSession) {
        self.entries
            .entry(session_id.to_string())
            .or_default()
            .login = Some(login);
    }

    async fn take_login(&self, session_id: &str) -> Option<OAuthSession> {
        let mut entry = self.entries.get_mut(session_id)?;
        let login = entry.login.take()?;
        if login.expires_at <= unix_now() {
            debug!(session_id, "discarding expired login attempt");
            return None;
        }
        Some(login)
    }

    async fn put_tokens(&self, session_id: &str, tokens: OAuthTokens) {
        self.entries
            .entry(session_id.to_string())
            .or_default()
            .tokens = Some(StoredTokens {
            tokens,
            stored_at: unix_now(),
        });
    }

    async fn tokens(&self, session_id: &str) -> Option<OAuthTokens> {
        let mut entry = self.entries.get_mut(session_id)?;
        let now = unix_now();

        let expired = {
            let stored = entry.tokens.as_ref()?;
            stored.tokens.expires_at.is_some_and(|at| at <= now)
                || stored.stored_at + TOKEN_SET_TTL_SECS <= now
        };
        if expired {
            entry.tokens = None;
            entry.user = None;
            return None;
        }
        entry.tokens.as_ref().map(|stored| stored.tokens.clone())
    }

    async fn put_user(&self, session_id: &str, user: ProviderUser) {
        self.entries.entry(session_id.to_string()).or_default().user = Some(user);
    }

    async fn user(&self, session_id: &str) -> Option<ProviderUser> {
        self.entries.get(session_id)?.user.clone()
    }

    async fn clear(&self, session_id: &str) {
        self.entries.remove(session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(state: &str, expires_at: u64) -> OAuthSession {
        OAuthSession {
            state: state.into(),
            code_verifier: "verifier".into(),
            expires_at,
        }
    }

    #[tokio::test]
    async fn login_is_single_use() {
        let store = MemorySessionStore::new();
        store
            .put_login("sid", login("abc", unix_now() + LOGIN_TTL_SECS))
            .await;

        let first = store.take_login("sid").await;
        assert_eq!(first.map(|l| l.state), Some("abc".to_string()));

        // Replay: the entry was consumed.
        assert!(store.take_login("sid").await.is_none());
    }

    #[tokio::test]
    async fn expired_login_is_not_returned() {
        let store = MemorySessionStore::new();
        store.put_login("sid", login("abc", unix_now() - 1)).await;
        assert!(store.take_login("sid").await.is_none());
    }

    #[tokio::test]
    async fn expired_access_token_reads_as_absent() {
        let store = MemorySessionStore::new();
        store
            .put_tokens(
                "sid",
                OAuthTokens {
                    access_token: "tok".into(),
                    refresh_token: None,
                    expires_at: Some(unix_now() - 10),
                },
            )
            .await;
        assert!(store.tokens("sid").await.is_none());
    }

    #[tokio::test]
    async fn live_tokens_round_trip() {
        let store = MemorySessionStore::new();
        store
            .put_tokens(
                "sid",
                OAuthTokens {
                    access_token: "tok".into(),
                    refresh_token: Some("refresh".into()),
                    expires_at: Some(unix_now() + 7200),
                },
            )
            .await;
        let tokens = store.tokens("sid").await.unwrap();
        assert_eq!(tokens.access_token, "tok");
        assert_eq!(tokens.refresh_token.as_deref(), Some("refresh"));
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let store = MemorySessionStore::new();
        store
            .put_login("sid", login("abc", unix_now() + LOGIN_TTL_SECS))
            .await;
        store
            .put_user(
                "sid",
                ProviderUser {
                    id: "1".into(),
                    username: "u".into(),
                    name: "U".into(),
                    profile_image_url: None,
                },
            )
            .await;
        store.clear("sid").await;
        assert!(store.take_login("sid").await.is_none());
        assert!(store.user("sid").await.is_none());
    }
}
