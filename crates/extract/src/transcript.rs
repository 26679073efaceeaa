use std::sync::LazyLock;

use regex::Regex;

use postpilot_common::{Error, Result};

/// Transcripts shorter than this are treated as a miss; the caption
/// endpoint returns an empty document for videos without captions.
const MIN_TRANSCRIPT_CHARS: usize = 50;

#[allow(clippy::unwrap_used)] // static pattern
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Fetch the caption track for a video from the timedtext endpoint and
/// flatten it to plain text.
pub async fn fetch(
    client: &reqwest::Client,
    base_url: &str,
    video_id: &str,
) -> Result<String> {
    let resp = client
        .get(format!("{base_url}/api/timedtext"))
        .query(&[("lang", "en"), ("v", video_id)])
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(Error::upstream(
            "transcript fetch failed",
            Some(format!("HTTP {}", resp.status())),
        ));
    }

    let body = resp.text().await?;
    let text = flatten_caption_xml(&body);
    if text.chars().count() < MIN_TRANSCRIPT_CHARS {
        return Err(Error::Parse("no usable transcript for video".into()));
    }
    Ok(text)
}

/// Strip caption markup down to whitespace-normalized text.
fn flatten_caption_xml(xml: &str) -> String {
    let stripped = TAG.replace_all(xml, " ");
    let decoded = stripped
        .replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_xml_flattens_to_text() {
        let xml = r#"<?xml version="1.0"?><transcript>
            <text start="0.0" dur="2.1">Hello &amp; welcome</text>
            <text start="2.1" dur="3.0">to the show &#39;today&#39;</text>
        </transcript>"#;
        assert_eq!(
            flatten_caption_xml(xml),
            "Hello & welcome to the show 'today'"
        );
    }

    #[tokio::test]
    async fn short_body_is_a_miss() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/timedtext")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("<transcript></transcript>")
            .create_async()
            .await;

        let err = fetch(&reqwest::Client::new(), &server.url(), "abc123")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn long_caption_round_trips() {
        let mut server = mockito::Server::new_async().await;
        let line = "<text>this transcript line is long enough to count as usable content</text>";
        server
            .mock("GET", "/api/timedtext")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(format!("<transcript>{line}</transcript>"))
            .create_async()
            .await;

        let text = fetch(&reqwest::Client::new(), &server.url(), "abc123")
            .await
            .unwrap();
        assert!(text.contains("usable content"));
    }
}
