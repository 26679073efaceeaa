use std::sync::{Arc, LazyLock};

use {regex::Regex, tracing::warn};

use {
    postpilot_common::{Error, Result},
    postpilot_providers::SerperClient,
};

use crate::{
    strategy::{self, ExtractStrategy, PartialMetadata},
    transcript, video,
};

pub const VIDEO_TITLE_PLACEHOLDER: &str = "Video Title";
pub const VIDEO_DESCRIPTION_PLACEHOLDER: &str = "Video description not available";
pub const VIDEO_CHANNEL_PLACEHOLDER: &str = "Channel";
pub const TRANSCRIPT_PLACEHOLDER: &str = "Transcript not available";

pub const ARTICLE_TITLE_PLACEHOLDER: &str = "Article Title";
pub const ARTICLE_DESCRIPTION_PLACEHOLDER: &str = "Article description not available";
pub const ARTICLE_AUTHOR_PLACEHOLDER: &str = "Author";
pub const BODY_PLACEHOLDER: &str = "Article body not available";

const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

/// A desktop browser user agent; the watch page serves a stripped-down
/// document to unknown clients.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Cap on how much scraped body text is carried into prompts.
const MAX_BODY_CHARS: usize = 4000;

/// Best-effort context for a piece of external content. Every field is
/// guaranteed non-empty: unresolved fields hold their placeholder, so
/// downstream prompt assembly never deals with absence.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedContent {
    pub title: String,
    pub description: String,
    pub channel_or_author: String,
    pub transcript_or_body: String,
}

impl ExtractedContent {
    pub fn has_placeholder_title(&self) -> bool {
        self.title == VIDEO_TITLE_PLACEHOLDER || self.title == ARTICLE_TITLE_PLACEHOLDER
    }

    pub fn has_placeholder_description(&self) -> bool {
        self.description == VIDEO_DESCRIPTION_PLACEHOLDER
            || self.description == ARTICLE_DESCRIPTION_PLACEHOLDER
    }
}

/// Multi-source metadata extraction with layered fallbacks.
///
/// Source order per content kind: dedicated transcript endpoint (video
/// only), direct page scrape through the strategy chain, then a keyed
/// search lookup for fields still at their placeholder. Individual source
/// failures are logged and swallowed; the pipeline itself only fails when
/// the input URL is unusable.
pub struct Extractor {
    client: reqwest::Client,
    serper: Option<Arc<SerperClient>>,
    strategies: Vec<Box<dyn ExtractStrategy>>,
    youtube_base_url: String,
}

impl Extractor {
    pub fn new(client: reqwest::Client, serper: Option<Arc<SerperClient>>) -> Self {
        Self {
            client,
            serper,
            strategies: strategy::default_strategies(),
            youtube_base_url: DEFAULT_YOUTUBE_BASE_URL.into(),
        }
    }

    /// Point the video endpoints somewhere else. Test seam.
    pub fn with_youtube_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.youtube_base_url = base_url.into();
        self
    }

    /// Extract what we can about a video. The only error path is an
    /// unrecognizable URL; every downstream miss degrades to placeholders.
    pub async fn video(&self, url: &str) -> Result<ExtractedContent> {
        let video_id = video::parse_video_id(url)
            .ok_or_else(|| Error::validation("could not extract a video id from the URL"))?;

        let (transcript, metadata) = tokio::join!(
            transcript::fetch(&self.client, &self.youtube_base_url, &video_id),
            self.fetch_video_page(&video_id),
        );

        let transcript = transcript.unwrap_or_else(|e| {
            warn!(video_id, error = %e, "transcript source failed");
            TRANSCRIPT_PLACEHOLDER.into()
        });
        let metadata = metadata.unwrap_or_else(|e| {
            warn!(video_id, error = %e, "page scrape failed");
            PartialMetadata::default()
        });

        let mut content = ExtractedContent {
            title: metadata
                .title
                .unwrap_or_else(|| VIDEO_TITLE_PLACEHOLDER.into()),
            description: metadata
                .description
                .unwrap_or_else(|| VIDEO_DESCRIPTION_PLACEHOLDER.into()),
            channel_or_author: metadata
                .channel
                .unwrap_or_else(|| VIDEO_CHANNEL_PLACEHOLDER.into()),
            transcript_or_body: transcript,
        };

        self.search_fill(&mut content, &format!("site:youtube.com {video_id}"))
            .await;
        Ok(content)
    }

    /// Extract what we can about an article page.
    pub async fn article(&self, url: &str) -> Result<ExtractedContent> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::validation("a valid http(s) URL is required"));
        }

        let page = self.fetch_page(url).await;
        let (metadata, body) = match page {
            Ok(html) => {
                let metadata = strategy::run_strategies(&html, &self.strategies);
                (metadata, strip_tags(&html))
            },
            Err(e) => {
                warn!(url, error = %e, "article fetch failed");
                (PartialMetadata::default(), String::new())
            },
        };

        let mut content = ExtractedContent {
            title: metadata
                .title
                .unwrap_or_else(|| ARTICLE_TITLE_PLACEHOLDER.into()),
            description: metadata
                .description
                .unwrap_or_else(|| ARTICLE_DESCRIPTION_PLACEHOLDER.into()),
            channel_or_author: metadata
                .channel
                .unwrap_or_else(|| ARTICLE_AUTHOR_PLACEHOLDER.into()),
            transcript_or_body: if body.is_empty() {
                BODY_PLACEHOLDER.into()
            } else {
                body
            },
        };

        self.search_fill(&mut content, url).await;
        Ok(content)
    }

    async fn fetch_video_page(&self, video_id: &str) -> Result<PartialMetadata> {
        let html = self
            .fetch_page(&format!(
                "{}/watch?v={video_id}",
                self.youtube_base_url
            ))
            .await?;
        Ok(strategy::run_strategies(&html, &self.strategies))
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .header("User-Agent", BROWSER_USER_AGENT)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Error::upstream(
                "page fetch failed",
                Some(format!("HTTP {}", resp.status())),
            ));
        }
        Ok(resp.text().await?)
    }

    /// Last-resort fill from the search API, only for fields that are
    /// still placeholders and only when a key is configured.
    async fn search_fill(&self, content: &mut ExtractedContent, query: &str) {
        if !content.has_placeholder_title() && !content.has_placeholder_description() {
            return;
        }
        let Some(serper) = &self.serper else {
            return;
        };

        match serper.search(query, 1).await {
            Ok(hits) => {
                if let Some(hit) = hits.first() {
                    if content.has_placeholder_title() && !hit.title.is_empty() {
                        content.title = hit.title.clone();
                    }
                    if content.has_placeholder_description() && !hit.snippet.is_empty() {
                        content.description = hit.snippet.clone();
                    }
                }
            },
            Err(e) => warn!(query, error = %e, "search fallback failed"),
        }
    }
}

#[allow(clippy::unwrap_used)] // static patterns
static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<(script|style)[^>]*>.*?</(script|style)>").unwrap());
#[allow(clippy::unwrap_used)]
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Crude visible-text slice of a page, capped for prompt embedding.
fn strip_tags(html: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(html, " ");
    let without_tags = TAG.replace_all(&without_scripts, " ");
    let text = without_tags.split_whitespace().collect::<Vec<_>>().join(" ");
    text.chars().take(MAX_BODY_CHARS).collect()
}
