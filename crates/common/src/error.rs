use thiserror::Error;

/// Error taxonomy shared across all crates.
///
/// Variants map one-to-one onto HTTP status codes at the gateway boundary:
/// `Validation` → 400, `Auth` → 401, `Config` → 500, `Upstream`/`Parse` → 502.
#[derive(Debug, Error)]
pub enum Error {
    /// A required secret or setting is absent. Surfaced before any
    /// external call is made.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed or missing request field. User-correctable.
    #[error("{0}")]
    Validation(String),

    /// No usable credentials for the requested operation.
    #[error("{0}")]
    Auth(String),

    /// A third-party API returned a non-success response or the network
    /// call itself failed. `detail` holds the upstream's own message and
    /// is only shown outside production mode.
    #[error("{message}")]
    Upstream {
        message: String,
        detail: Option<String>,
    },

    /// An upstream response had an unexpected shape and no fallback path
    /// existed at the call site.
    #[error("unexpected upstream response: {0}")]
    Parse(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn upstream(message: impl Into<String>, detail: Option<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            detail,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Upstream {
            message: "upstream request failed".into(),
            detail: Some(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
