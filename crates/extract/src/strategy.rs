use std::sync::LazyLock;

use regex::Regex;

/// Fields one extractor managed to pull out of a page. Any subset may be
/// present; later strategies fill what earlier ones missed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PartialMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub channel: Option<String>,
}

impl PartialMetadata {
    /// Per-field first-match-wins union.
    pub fn fill_missing_from(&mut self, other: PartialMetadata) {
        if self.title.is_none() {
            self.title = other.title;
        }
        if self.description.is_none() {
            self.description = other.description;
        }
        if self.channel.is_none() {
            self.channel = other.channel;
        }
    }
}

/// One way of reading metadata out of raw page markup. Strategies are
/// tried in priority order and merged field-by-field, which tolerates the
/// multiple historical markup formats the platforms have shipped.
pub trait ExtractStrategy: Send + Sync {
    fn name(&self) -> &str;
    fn try_extract(&self, html: &str) -> PartialMetadata;
}

fn first_capture(pattern: &Regex, html: &str) -> Option<String> {
    pattern.captures(html).map(|caps| caps[1].trim().to_string())
}

// ── Document head ───────────────────────────────────────────────────────────

#[allow(clippy::unwrap_used)] // static patterns
static TITLE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<title>([^<]+)</title>").unwrap());
#[allow(clippy::unwrap_used)]
static META_DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta name="description" content="([^"]+)""#).unwrap());

/// `<title>` and `<meta name="description">`.
pub struct HtmlHeadStrategy;

impl ExtractStrategy for HtmlHeadStrategy {
    fn name(&self) -> &str {
        "html-head"
    }

    fn try_extract(&self, html: &str) -> PartialMetadata {
        PartialMetadata {
            title: first_capture(&TITLE_TAG, html)
                .map(|t| t.trim_end_matches(" - YouTube").trim().to_string())
                .filter(|t| !t.is_empty()),
            description: first_capture(&META_DESCRIPTION, html),
            channel: None,
        }
    }
}

// ── Embedded player JSON ────────────────────────────────────────────────────

#[allow(clippy::unwrap_used)] // static patterns
static JSON_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""title":"([^"]+)""#).unwrap());
#[allow(clippy::unwrap_used)]
static OWNER_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""ownerText":\{"runs":\[\{"text":"([^"]+)""#).unwrap());
#[allow(clippy::unwrap_used)]
static CHANNEL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""channelName":"([^"]+)""#).unwrap());

/// Values inlined in the player's JSON blob.
pub struct PlayerJsonStrategy;

impl ExtractStrategy for PlayerJsonStrategy {
    fn name(&self) -> &str {
        "player-json"
    }

    fn try_extract(&self, html: &str) -> PartialMetadata {
        PartialMetadata {
            title: first_capture(&JSON_TITLE, html),
            description: None,
            channel: first_capture(&OWNER_RUNS, html)
                .or_else(|| first_capture(&CHANNEL_NAME, html)),
        }
    }
}

// ── Open Graph tags ─────────────────────────────────────────────────────────

#[allow(clippy::unwrap_used)] // static patterns
static OG_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta property="og:title" content="([^"]+)""#).unwrap());
#[allow(clippy::unwrap_used)]
static OG_DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta property="og:description" content="([^"]+)""#).unwrap());
#[allow(clippy::unwrap_used)]
static OG_AUTHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta property="og:video:author" content="([^"]+)""#).unwrap());

pub struct OpenGraphStrategy;

impl ExtractStrategy for OpenGraphStrategy {
    fn name(&self) -> &str {
        "open-graph"
    }

    fn try_extract(&self, html: &str) -> PartialMetadata {
        PartialMetadata {
            title: first_capture(&OG_TITLE, html),
            description: first_capture(&OG_DESCRIPTION, html),
            channel: first_capture(&OG_AUTHOR, html),
        }
    }
}

/// The strategy chain in priority order.
pub fn default_strategies() -> Vec<Box<dyn ExtractStrategy>> {
    vec![
        Box::new(HtmlHeadStrategy),
        Box::new(PlayerJsonStrategy),
        Box::new(OpenGraphStrategy),
    ]
}

/// Run the chain over a page and union the results.
pub fn run_strategies(html: &str, strategies: &[Box<dyn ExtractStrategy>]) -> PartialMetadata {
    let mut merged = PartialMetadata::default();
    for strategy in strategies {
        let partial = strategy.try_extract(html);
        tracing::debug!(
            strategy = strategy.name(),
            title = partial.title.is_some(),
            description = partial.description.is_some(),
            channel = partial.channel.is_some(),
            "extractor strategy ran"
        );
        merged.fill_missing_from(partial);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATCH_PAGE: &str = r#"
        <html><head>
        <title>Rust in 100 Seconds - YouTube</title>
        <meta name="description" content="A whirlwind tour of Rust.">
        <meta property="og:title" content="Rust in 100 Seconds (og)">
        </head><body>
        var ytInitialData = {"ownerText":{"runs":[{"text":"Fireship"}]}};
        </body></html>"#;

    #[test]
    fn head_strategy_strips_platform_suffix() {
        let partial = HtmlHeadStrategy.try_extract(WATCH_PAGE);
        assert_eq!(partial.title.as_deref(), Some("Rust in 100 Seconds"));
        assert_eq!(partial.description.as_deref(), Some("A whirlwind tour of Rust."));
        assert!(partial.channel.is_none());
    }

    #[test]
    fn player_json_finds_channel() {
        let partial = PlayerJsonStrategy.try_extract(WATCH_PAGE);
        assert_eq!(partial.channel.as_deref(), Some("Fireship"));
    }

    #[test]
    fn channel_name_fallback_pattern() {
        let html = r#"{"channelName":"Acme Clips"}"#;
        let partial = PlayerJsonStrategy.try_extract(html);
        assert_eq!(partial.channel.as_deref(), Some("Acme Clips"));
    }

    #[test]
    fn merge_prefers_earlier_strategies_per_field() {
        let merged = run_strategies(WATCH_PAGE, &default_strategies());
        // Head title wins over the og: variant; channel comes from the
        // player JSON because the head has none.
        assert_eq!(merged.title.as_deref(), Some("Rust in 100 Seconds"));
        assert_eq!(merged.channel.as_deref(), Some("Fireship"));
    }

    #[test]
    fn open_graph_fills_when_head_is_missing() {
        let html = r#"<meta property="og:title" content="Og Only Title">
                      <meta property="og:description" content="Og description.">"#;
        let merged = run_strategies(html, &default_strategies());
        assert_eq!(merged.title.as_deref(), Some("Og Only Title"));
        assert_eq!(merged.description.as_deref(), Some("Og description."));
    }

    #[test]
    fn nothing_matches_nothing_extracted() {
        let merged = run_strategies("<html><body>plain</body></html>", &default_strategies());
        assert_eq!(merged, PartialMetadata::default());
    }
}
