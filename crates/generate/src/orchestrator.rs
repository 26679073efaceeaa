use std::sync::Arc;

use tracing::{debug, warn};

use {
    postpilot_common::{Error, Result},
    postpilot_extract::{ExtractedContent, Extractor, pipeline::TRANSCRIPT_PLACEHOLDER},
    postpilot_providers::{CompletionRequest, ModelTier, Providers, TextProvider},
};

use crate::{
    fallback, image, parse,
    trending::{TrendingCategory, normalize_country},
    types::{ContentMode, ContentSet, Mood, Summary, TrendingTopic, VariantCount},
};

const TRENDING_COUNT: usize = 10;

const CONTENT_SYSTEM: &str = "You're a skilled social media writer who creates authentic, \
    engaging content. Write like a real person sharing genuine insights, not an AI. Use natural \
    language, personal opinions, and conversational tone. Avoid corporate speak, excessive \
    emojis, or obvious AI patterns. Write as if you're genuinely excited about the topic and \
    sharing your thoughts with friends or colleagues. Return JSON with \"tweets\" and \
    \"linkedinPosts\" arrays.";

const THREADS_SYSTEM: &str = "You write engaging Twitter threads that sound like they come from \
    a knowledgeable person sharing insights. Write naturally, use real examples, and make it \
    conversational. Each thread should be 4-6 tweets that flow together. Return JSON \
    {\"threads\": string[][]}.";

const INSTAGRAM_SYSTEM: &str = "Write Instagram captions that sound like they come from a real \
    person sharing their thoughts. Use natural language, appropriate emojis, and relevant \
    hashtags. Make it conversational and authentic. Return JSON {\"instagramPosts\": string[]}.";

const VIDEO_SUMMARY_SYSTEM: &str = "You are a video content analyst. You will be given specific \
    video information and need to create authentic, human-like summaries and social media \
    content based on that information. Return JSON with this exact structure: {\"title\": \
    \"Video title\", \"summary\": \"Detailed summary based on the provided video information\", \
    \"linkedinPost\": \"Professional LinkedIn post based on video content\", \"twitterThread\": \
    [\"Tweet 1\", \"Tweet 2\", \"Tweet 3\", \"Tweet 4\", \"Tweet 5\"]}";

const ARTICLE_SUMMARY_SYSTEM: &str = "You're a skilled content analyst who reads articles and \
    creates natural, human-like summaries and social media content. Write as if you're a \
    knowledgeable person sharing insights, not an AI. Use conversational tone and authentic \
    language. Return JSON with this exact structure: {\"title\": \"Article title\", \"summary\": \
    \"Natural, conversational summary\", \"linkedinPost\": \"Professional but human LinkedIn \
    post\", \"twitterThread\": [\"Tweet 1\", \"Tweet 2\", \"Tweet 3\", \"Tweet 4\", \"Tweet 5\"]}";

const TRENDING_SYSTEM: &str = "You're a knowledgeable analyst who identifies current trending \
    topics, keywords, and hashtags. Write trending topics that people are actually searching \
    for and talking about. Each topic should be a specific, actionable trending topic that \
    users can create content about. Return JSON {\"topics\": [{\"title\": string, \"summary\": \
    string}]} with exactly 10 trending topics, each having a title and summary.";

/// Assembles prompts from extracted context, calls the configured
/// providers, and guarantees a usable result: every parse failure on a
/// primary path degrades to deterministic fallback content, and optional
/// modes are dropped rather than failing the response.
pub struct Orchestrator {
    providers: Arc<Providers>,
    extractor: Arc<Extractor>,
}

impl Orchestrator {
    pub fn new(providers: Arc<Providers>, extractor: Arc<Extractor>) -> Self {
        Self {
            providers,
            extractor,
        }
    }

    // ── Topic content ───────────────────────────────────────────────────────

    pub async fn generate_content(
        &self,
        topic: &str,
        mode: ContentMode,
        mood: Mood,
        variants: VariantCount,
    ) -> Result<ContentSet> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(Error::validation("topic is required"));
        }

        let count = variants.resolve();
        let search_results = self.gather_context(topic).await;
        let (tweets, linkedin_posts) = self
            .primary_content(topic, mood, count, &search_results)
            .await;

        let mut threads = None;
        let mut instagram_posts = None;
        match mode {
            ContentMode::Default => {},
            ContentMode::TwitterThreads => {
                threads = self.thread_content(topic, &search_results).await;
            },
            ContentMode::Instagram => {
                instagram_posts = self.instagram_content(topic, &search_results).await;
            },
        }

        Ok(ContentSet {
            topic: topic.to_string(),
            tweets,
            linkedin_posts,
            threads,
            instagram_posts,
            search_results,
        })
    }

    /// Up to five context lines: live search when a key is configured,
    /// deterministic stand-ins otherwise.
    async fn gather_context(&self, topic: &str) -> Vec<String> {
        if let Some(serper) = self.providers.serper() {
            match serper.search(topic, 5).await {
                Ok(hits) if !hits.is_empty() => {
                    return hits
                        .iter()
                        .map(|h| {
                            if h.snippet.is_empty() {
                                h.title.clone()
                            } else {
                                format!("{}: {}", h.title, h.snippet)
                            }
                        })
                        .collect();
                },
                Ok(_) => {},
                Err(e) => warn!(topic, error = %e, "context search failed"),
            }
        }
        fallback::context_lines(topic)
    }

    async fn primary_content(
        &self,
        topic: &str,
        mood: Mood,
        count: usize,
        context: &[String],
    ) -> (Vec<String>, Vec<String>) {
        let Some(provider) = self.providers.text() else {
            debug!("no text provider configured, serving fallback content");
            return (
                fallback::tweets(topic, count),
                fallback::linkedin_posts(topic, count),
            );
        };

        let system = format!("{CONTENT_SYSTEM} {}", mood.persona_clause());
        let user = format!(
            "Write about: {topic}\n\nContext: {}\n\nCreate {count} different Twitter posts and \
             {count} different LinkedIn posts. Make each one sound like it's written by a real \
             person with genuine interest in the topic.",
            context.iter().take(5).cloned().collect::<Vec<_>>().join(" | ")
        );

        let parsed = match provider
            .complete(CompletionRequest::json(&system, &user).temperature(0.8))
            .await
        {
            Ok(raw) => parse::extract_json(&raw).unwrap_or(serde_json::Value::Null),
            Err(e) => {
                warn!(topic, error = %e, "content generation failed, serving fallback");
                serde_json::Value::Null
            },
        };

        let mut tweets = parse::string_array(&parsed, "tweets");
        let mut linkedin_posts = parse::string_array(&parsed, "linkedinPosts");
        tweets.truncate(count);
        linkedin_posts.truncate(count);

        if tweets.is_empty() {
            tweets = fallback::tweets(topic, count);
        }
        if linkedin_posts.is_empty() {
            linkedin_posts = fallback::linkedin_posts(topic, count);
        }
        (tweets, linkedin_posts)
    }

    /// Optional mode: two threads of 4-6 tweets. Any failure drops the
    /// section instead of failing the response.
    async fn thread_content(&self, topic: &str, context: &[String]) -> Option<Vec<Vec<String>>> {
        let provider = self.providers.text()?;

        let mut examples = String::new();
        if let Some(serper) = self.providers.serper() {
            match serper.search(&format!("{topic} examples news 2024"), 5).await {
                Ok(hits) => {
                    examples = hits
                        .iter()
                        .take(3)
                        .map(|h| format!("{}: {}", h.title, h.snippet))
                        .collect::<Vec<_>>()
                        .join("\n");
                },
                Err(e) => warn!(topic, error = %e, "thread example search failed"),
            }
        }
        if examples.is_empty() {
            examples = "Use your knowledge of recent trends".into();
        }

        let user = format!(
            "Write 2 different Twitter threads about: {topic}.\nContext: {}\nExamples: \
             {examples}\nMake each thread sound like a real expert sharing genuine insights, not \
             AI-generated content.",
            context.iter().take(5).cloned().collect::<Vec<_>>().join(" | ")
        );

        match provider
            .complete(CompletionRequest::json(THREADS_SYSTEM, &user).temperature(0.8))
            .await
        {
            Ok(raw) => {
                let parsed = parse::extract_json(&raw)?;
                let threads = parse::string_matrix(&parsed, "threads");
                (!threads.is_empty()).then_some(threads)
            },
            Err(e) => {
                warn!(topic, error = %e, "thread generation failed, omitting threads");
                None
            },
        }
    }

    async fn instagram_content(&self, topic: &str, context: &[String]) -> Option<Vec<String>> {
        let provider = self.providers.text()?;
        let user = format!(
            "Write 3 different Instagram captions about: {topic}.\nContext: {}\nMake each \
             caption sound like a genuine person sharing their perspective, not AI-generated \
             content.",
            context.iter().take(5).cloned().collect::<Vec<_>>().join(" | ")
        );

        match provider
            .complete(CompletionRequest::json(INSTAGRAM_SYSTEM, &user).temperature(0.8))
            .await
        {
            Ok(raw) => {
                let parsed = parse::extract_json(&raw)?;
                let posts = parse::string_array(&parsed, "instagramPosts");
                (!posts.is_empty()).then_some(posts)
            },
            Err(e) => {
                warn!(topic, error = %e, "caption generation failed, omitting captions");
                None
            },
        }
    }

    // ── Summaries ───────────────────────────────────────────────────────────

    pub async fn summarize_article(&self, url: &str) -> Result<Summary> {
        let provider = self.text_provider_required()?;
        let content = self.extractor.article(url).await?;
        let user = format!(
            "Read and analyze this article:\n\nTitle: {}\nAuthor: {}\nDescription: {}\nBody: \
             {}\nURL: {url}\n\nCreate a natural summary and social media content that sounds \
             like it's written by a real person who actually read and understood the article.",
            content.title, content.channel_or_author, content.description,
            content.transcript_or_body
        );
        self.summarize(&provider, ARTICLE_SUMMARY_SYSTEM, &user, url)
            .await
    }

    pub async fn summarize_video(&self, url: &str) -> Result<Summary> {
        let provider = self.text_provider_required()?;
        let content = self.extractor.video(url).await?;
        let user = video_summary_prompt(&content, url);

        let mut summary = self
            .summarize(&provider, VIDEO_SUMMARY_SYSTEM, &user, url)
            .await?;
        // Scraped title beats whatever the model produced.
        if !content.has_placeholder_title() {
            summary.title = content.title;
        }
        Ok(summary)
    }

    async fn summarize(
        &self,
        provider: &Arc<dyn TextProvider>,
        system: &str,
        user: &str,
        url: &str,
    ) -> Result<Summary> {
        let raw = provider
            .complete(
                CompletionRequest::json(system, user)
                    .tier(ModelTier::Heavy)
                    .max_tokens(4000),
            )
            .await?;

        let parsed = parse::extract_json(&raw)
            .ok_or_else(|| Error::Parse("summary response was not JSON".into()))?;
        let title = parsed["title"].as_str().unwrap_or_default().to_string();
        let summary = parsed["summary"].as_str().unwrap_or_default().to_string();
        let linkedin_post = parsed["linkedinPost"].as_str().unwrap_or_default().to_string();
        let twitter_thread = parse::string_array(&parsed, "twitterThread");

        if title.is_empty() || summary.is_empty() || linkedin_post.is_empty()
            || twitter_thread.is_empty()
        {
            return Err(Error::Parse("summary response missing required fields".into()));
        }

        Ok(Summary {
            title,
            summary,
            linkedin_post,
            twitter_thread,
            original_url: url.to_string(),
        })
    }

    fn text_provider_required(&self) -> Result<Arc<dyn TextProvider>> {
        self.providers
            .text()
            .ok_or_else(|| Error::config("no text generation provider configured"))
    }

    // ── Images ──────────────────────────────────────────────────────────────

    pub async fn generate_image(&self, content: &str, size: Option<&str>) -> Result<String> {
        if content.trim().is_empty() {
            return Err(Error::validation("prompt is required"));
        }
        let provider = self
            .providers
            .image()
            .ok_or_else(|| Error::config("no image generation provider configured"))?;
        let size = size.filter(|s| !s.is_empty()).unwrap_or("1024x1024");
        provider
            .generate_image(&image::build_prompt(content.trim()), size)
            .await
    }

    // ── Trending topics ─────────────────────────────────────────────────────

    /// Always returns exactly ten topics; holes left by the sources are
    /// filled with deterministic fallbacks.
    pub async fn trending(
        &self,
        category: TrendingCategory,
        country: Option<&str>,
    ) -> Vec<TrendingTopic> {
        let country = normalize_country(country);

        let mut topics = self.trending_from_news(category, &country).await;
        if topics.is_empty() {
            topics = self.trending_from_llm(category).await;
        }

        let label = category.label();
        (0..TRENDING_COUNT)
            .map(|i| match topics.get(i) {
                Some(t) if !t.title.is_empty() && !t.summary.is_empty() => t.clone(),
                _ => {
                    let (title, summary) = fallback::trending_topic(label, i + 1);
                    TrendingTopic { title, summary }
                },
            })
            .collect()
    }

    async fn trending_from_news(
        &self,
        category: TrendingCategory,
        country: &str,
    ) -> Vec<TrendingTopic> {
        let Some(serper) = self.providers.serper() else {
            return Vec::new();
        };
        match serper.news(category.news_query(), country, 10).await {
            Ok(hits) => {
                let lower = category.label().to_lowercase();
                hits.iter()
                    .take(TRENDING_COUNT)
                    .map(|hit| {
                        let base = if hit.snippet.is_empty() {
                            format!(
                                "This {lower} topic is currently trending and generating \
                                 significant interest among users and media outlets."
                            )
                        } else {
                            hit.snippet.clone()
                        };
                        let read_more = hit
                            .link
                            .as_ref()
                            .map(|l| format!("\n\nRead more: {l}"))
                            .unwrap_or_default();
                        TrendingTopic {
                            title: hit.title.clone(),
                            summary: format!(
                                "{base} This topic is gaining momentum due to recent \
                                 developments, user engagement, and media coverage. It \
                                 represents current trends and discussions in the {lower} \
                                 space.{read_more}"
                            ),
                        }
                    })
                    .collect()
            },
            Err(e) => {
                warn!(category = category.label(), error = %e, "trending news lookup failed");
                Vec::new()
            },
        }
    }

    async fn trending_from_llm(&self, category: TrendingCategory) -> Vec<TrendingTopic> {
        let Some(provider) = self.providers.online_text().or_else(|| self.providers.text())
        else {
            return Vec::new();
        };

        let user = format!(
            "Find 10 current trending {} topics, keywords, and hashtags. Include {} people are \
             searching for. For each topic, provide a title (under 90 characters) and a brief \
             summary (1-2 sentences explaining why it's trending). Return exactly 10 topics.",
            category.label(),
            category.llm_focus()
        );

        let raw = match provider
            .complete(CompletionRequest::json(TRENDING_SYSTEM, &user).max_tokens(2000))
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(category = category.label(), error = %e, "trending generation failed");
                return Vec::new();
            },
        };

        let Some(parsed) = parse::extract_json(&raw) else {
            return Vec::new();
        };
        // Accept {"topics": [...]} or a bare array.
        let items = if parsed.is_array() {
            parsed
        } else {
            parsed["topics"].clone()
        };
        items
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|item| {
                        let title = item["title"].as_str()?.trim().to_string();
                        let summary = item["summary"].as_str()?.trim().to_string();
                        (!title.is_empty() && !summary.is_empty())
                            .then_some(TrendingTopic { title, summary })
                    })
                    .take(TRENDING_COUNT)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn video_summary_prompt(content: &ExtractedContent, url: &str) -> String {
    let has_transcript = content.transcript_or_body != TRANSCRIPT_PLACEHOLDER;
    let mut prompt = format!(
        "Analyze this YouTube video based on the following information:\n\nVideo Title: \
         {}\nChannel: {}\nDescription: {}\n",
        content.title, content.channel_or_author, content.description
    );
    if has_transcript {
        prompt.push_str(&format!("Transcript: {}\n", content.transcript_or_body));
    }
    prompt.push_str(&format!(
        "URL: {url}\n\nCreate a detailed summary and social media content that accurately \
         reflects what this specific video is about. Base your content on the actual video \
         information provided above."
    ));
    prompt
}
