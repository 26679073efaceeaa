use {serde::Serialize, tracing::info};

use postpilot_common::{Error, Result, types::ProviderUser};

/// Hard provider limit for a single post.
pub const MAX_TWEET_CHARS: usize = 280;

/// A successfully created post.
#[derive(Debug, Clone, Serialize)]
pub struct PostedTweet {
    pub id: String,
    pub text: String,
    pub url: String,
}

/// Thin proxy over the Twitter v2 API. Attaches the caller's bearer token;
/// one attempt per call, no retry, refresh, or queueing.
pub struct TwitterClient {
    base_url: String,
    client: reqwest::Client,
}

impl TwitterClient {
    pub fn new(base_url: String, client: reqwest::Client) -> Self {
        Self { base_url, client }
    }

    /// Create a post. Length is validated locally against the provider
    /// limit before any network request is issued.
    pub async fn post_tweet(&self, access_token: &str, text: &str) -> Result<PostedTweet> {
        let chars = text.chars().count();
        if chars == 0 {
            return Err(Error::validation("tweet text is required"));
        }
        if chars > MAX_TWEET_CHARS {
            return Err(Error::validation(format!(
                "tweet is too long ({chars} characters, max {MAX_TWEET_CHARS})"
            )));
        }

        let resp = self
            .client
            .post(format!("{}/2/tweets", self.base_url))
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body: serde_json::Value = resp.json().await.unwrap_or_default();
            let detail = body["detail"]
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(Error::upstream("could not post tweet", Some(detail)));
        }

        let body: serde_json::Value = resp.json().await?;
        let id = body["data"]["id"]
            .as_str()
            .ok_or_else(|| Error::Parse("post response missing data.id".into()))?
            .to_string();
        let text = body["data"]["text"].as_str().unwrap_or(text).to_string();

        info!(tweet_id = %id, "tweet posted");
        Ok(PostedTweet {
            url: format!("https://twitter.com/i/status/{id}"),
            id,
            text,
        })
    }

    /// Fetch the authenticated account's profile.
    pub async fn me(&self, access_token: &str) -> Result<ProviderUser> {
        let resp = self
            .client
            .get(format!(
                "{}/2/users/me?user.fields=profile_image_url",
                self.base_url
            ))
            .bearer_auth(access_token)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(Error::upstream(
                "could not fetch profile",
                Some(format!("HTTP {status}")),
            ));
        }

        let body: serde_json::Value = resp.json().await?;
        let data = &body["data"];
        Ok(ProviderUser {
            id: data["id"]
                .as_str()
                .ok_or_else(|| Error::Parse("profile response missing data.id".into()))?
                .to_string(),
            username: data["username"].as_str().unwrap_or_default().to_string(),
            name: data["name"].as_str().unwrap_or_default().to_string(),
            profile_image_url: data["profile_image_url"].as_str().map(|s| s.to_string()),
        })
    }
}
