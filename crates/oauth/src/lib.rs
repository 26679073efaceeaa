pub mod flow;
pub mod pkce;
pub mod store;
pub mod types;

pub use flow::{AuthRequest, OAuthFlow};
pub use store::{MemorySessionStore, SessionStore};
pub use types::{AbortReason, OAuthConfig, OAuthSession, OAuthTokens, PkceChallenge};
