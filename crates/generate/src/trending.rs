use serde::Deserialize;

/// Supported trending-topic categories. The set is closed; anything else
/// is rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TrendingCategory {
    Business,
    Tech,
    Sports,
    Entertainment,
    Movies,
    Politics,
    Science,
    Health,
    Products,
}

impl TrendingCategory {
    pub const ALL: [Self; 9] = [
        Self::Business,
        Self::Tech,
        Self::Sports,
        Self::Entertainment,
        Self::Movies,
        Self::Politics,
        Self::Science,
        Self::Health,
        Self::Products,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Business => "Business",
            Self::Tech => "Tech",
            Self::Sports => "Sports",
            Self::Entertainment => "Entertainment",
            Self::Movies => "Movies",
            Self::Politics => "Politics",
            Self::Science => "Science",
            Self::Health => "Health",
            Self::Products => "Products",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == raw.trim())
    }

    /// News-search query used against the search API.
    pub fn news_query(&self) -> &'static str {
        match self {
            Self::Business => "trending business keywords hashtags startups investments",
            Self::Tech => "trending tech keywords hashtags AI software apps startups",
            Self::Sports => "trending sports keywords hashtags athletes teams games",
            Self::Entertainment => "trending entertainment keywords hashtags celebrities shows",
            Self::Movies => "trending movie keywords hashtags actors directors franchises",
            Self::Politics => "trending political keywords hashtags politicians elections",
            Self::Science => "trending science keywords hashtags research discoveries",
            Self::Health => "trending health keywords hashtags medical wellness",
            Self::Products => "trending tech products keywords hashtags gadgets devices",
        }
    }

    /// Category-specific phrasing for the LLM prompt.
    pub fn llm_focus(&self) -> &'static str {
        match self {
            Self::Business => {
                "companies, startups, investments, markets, and trending business terms"
            },
            Self::Tech => "AI, software, apps, startups, tech companies, and trending tech terms",
            Self::Sports => "athletes, teams, leagues, games, and trending sports terms",
            Self::Entertainment => {
                "celebrities, shows, music, events, and trending entertainment terms"
            },
            Self::Movies => {
                "movie titles, actors, directors, franchises, and trending entertainment terms"
            },
            Self::Politics => {
                "politicians, policies, elections, and trending political terms"
            },
            Self::Science => "research, discoveries, scientists, and trending science terms",
            Self::Health => {
                "medical breakthroughs, health trends, wellness, and trending health terms"
            },
            Self::Products => {
                "new product launches, innovative devices, and trending tech products"
            },
        }
    }
}

/// Normalize a country code: two ASCII letters, lowercased; anything else
/// falls back to `us`.
pub fn normalize_country(raw: Option<&str>) -> String {
    match raw {
        Some(code) if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) => {
            code.to_ascii_lowercase()
        },
        _ => "us".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_labels() {
        assert_eq!(TrendingCategory::parse("Tech"), Some(TrendingCategory::Tech));
        assert_eq!(TrendingCategory::parse(" Movies "), Some(TrendingCategory::Movies));
        assert_eq!(TrendingCategory::parse("Gardening"), None);
        assert_eq!(TrendingCategory::parse("tech"), None);
    }

    #[test]
    fn country_normalization() {
        assert_eq!(normalize_country(Some("US")), "us");
        assert_eq!(normalize_country(Some("de")), "de");
        assert_eq!(normalize_country(Some("USA")), "us");
        assert_eq!(normalize_country(Some("4x")), "us");
        assert_eq!(normalize_country(None), "us");
    }
}
