use {
    secrecy::{ExposeSecret, SecretString},
    tracing::debug,
};

use postpilot_common::{Error, Result};
use postpilot_config::SerperConfig;

/// One search or news result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub link: Option<String>,
}

/// Keyed Serper.dev client for search and news lookups.
pub struct SerperClient {
    api_key: SecretString,
    base_url: String,
    client: reqwest::Client,
}

impl SerperClient {
    pub fn new(config: &SerperConfig, client: reqwest::Client) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            client,
        }
    }

    /// Web search; returns the organic results.
    pub async fn search(&self, query: &str, num: u8) -> Result<Vec<SearchHit>> {
        let hits = self
            .request("/search", serde_json::json!({
                "q": query,
                "gl": "us",
                "hl": "en",
                "num": num,
            }))
            .await
            .map(|body| Self::collect_hits(&body["organic"]))?;
        debug!(query, count = hits.len(), "serper search");
        Ok(hits)
    }

    /// News search scoped to a country code.
    pub async fn news(&self, query: &str, country: &str, num: u8) -> Result<Vec<SearchHit>> {
        let hits = self
            .request("/news", serde_json::json!({
                "q": query,
                "gl": country,
                "hl": "en",
                "num": num,
            }))
            .await
            .map(|body| Self::collect_hits(&body["news"]))?;
        debug!(query, country, count = hits.len(), "serper news");
        Ok(hits)
    }

    async fn request(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .header("X-API-KEY", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp.text().await.unwrap_or_default();
            return Err(Error::upstream(
                "search lookup failed",
                Some(format!("HTTP {status}: {body_text}")),
            ));
        }

        Ok(resp.json().await?)
    }

    fn collect_hits(items: &serde_json::Value) -> Vec<SearchHit> {
        items
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|item| {
                        let title = item["title"].as_str()?.to_string();
                        let snippet = item["snippet"]
                            .as_str()
                            .or_else(|| item["description"].as_str())
                            .unwrap_or_default()
                            .to_string();
                        Some(SearchHit {
                            title,
                            snippet,
                            link: item["link"].as_str().map(|s| s.to_string()),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> SerperClient {
        SerperClient::new(
            &SerperConfig {
                api_key: SecretString::new("serper-test".into()),
                base_url: base_url.into(),
            },
            reqwest::Client::new(),
        )
    }

    #[tokio::test]
    async fn search_collects_organic_results() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search")
            .match_header("x-api-key", "serper-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"organic":[
                    {"title":"EV adoption accelerates","snippet":"Sales doubled.","link":"https://example.com/a"},
                    {"title":"No snippet here"}
                ]}"#,
            )
            .create_async()
            .await;

        let hits = client(&server.url()).search("evs", 5).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "EV adoption accelerates");
        assert_eq!(hits[0].snippet, "Sales doubled.");
        assert!(hits[1].snippet.is_empty());
    }

    #[tokio::test]
    async fn news_uses_description_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/news")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"news":[{"title":"Tech story","description":"From description."}]}"#)
            .create_async()
            .await;

        let hits = client(&server.url()).news("tech", "us", 10).await.unwrap();
        assert_eq!(hits[0].snippet, "From description.");
    }

    #[tokio::test]
    async fn non_success_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search")
            .with_status(403)
            .create_async()
            .await;

        let err = client(&server.url()).search("evs", 5).await.unwrap_err();
        assert!(matches!(err, Error::Upstream { .. }));
    }
}
