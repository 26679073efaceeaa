use serde::{Deserialize, Serialize};

/// What the caller wants generated beyond the primary tweet/LinkedIn pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentMode {
    #[default]
    Default,
    TwitterThreads,
    Instagram,
}

/// Writing-voice preset, folded into the system persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    #[default]
    Professional,
    Casual,
    Humorous,
    Inspirational,
}

impl Mood {
    /// Extra persona instruction appended to the system prompt.
    pub fn persona_clause(&self) -> &'static str {
        match self {
            Self::Professional => {
                "Keep the voice credible and professional without sounding corporate."
            },
            Self::Casual => "Keep the voice relaxed and conversational, like chatting with friends.",
            Self::Humorous => "Keep the voice playful; light humor is welcome where it fits.",
            Self::Inspirational => {
                "Keep the voice upbeat and encouraging without sliding into cliches."
            },
        }
    }
}

/// How many variants of each primary format to produce. The provider is
/// asked for this many and the response is sliced to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariantCount {
    Three,
    Four,
    /// Pick 3 or 4 at request time.
    #[default]
    Random,
}

impl VariantCount {
    pub fn from_requested(n: Option<u8>) -> Option<Self> {
        match n {
            None => Some(Self::Random),
            Some(3) => Some(Self::Three),
            Some(4) => Some(Self::Four),
            Some(_) => None,
        }
    }

    pub fn resolve(self) -> usize {
        match self {
            Self::Three => 3,
            Self::Four => 4,
            Self::Random => rand::random_range(3..=4),
        }
    }
}

/// Primary generation result for a topic.
#[derive(Debug, Clone, Serialize)]
pub struct ContentSet {
    pub topic: String,
    pub tweets: Vec<String>,
    pub linkedin_posts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<Vec<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_posts: Option<Vec<String>>,
    pub search_results: Vec<String>,
}

/// Result of summarizing an article or video.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub title: String,
    pub summary: String,
    pub linkedin_post: String,
    pub twitter_thread: Vec<String>,
    pub original_url: String,
}

/// One trending topic suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct TrendingTopic {
    pub title: String,
    pub summary: String,
}
