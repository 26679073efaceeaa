//! Deterministic templated content used whenever a provider is missing,
//! fails, or returns an unusable shape. Parameterized only by the topic so
//! identical requests produce identical fallbacks.

/// Hashtag-safe form of a topic.
fn hashtag(topic: &str) -> String {
    topic.split_whitespace().collect::<String>()
}

pub fn tweets(topic: &str, count: usize) -> Vec<String> {
    (1..=count)
        .map(|i| {
            format!(
                "🚀 {i}/ {topic} insights:\n\n✨ Innovation at its finest\n📈 Rapid adoption\n🌟 Big potential ahead\n\nYour take on {topic}? #Innovation #{} #TechTrends",
                hashtag(topic)
            )
        })
        .collect()
}

pub fn linkedin_posts(topic: &str, count: usize) -> Vec<String> {
    (1..=count)
        .map(|i| {
            format!(
                "🌟 ({i}/{count}) The Future of {topic}\n\n🔍 Key Observations:\n• Rapid innovation\n• Meaningful investments\n• Early wins emerging\n• Cross-sector potential\n\n💡 Why it matters:\n{topic} is reshaping efficiency and decision-making. Early adopters build durable advantages.\n\n📈 Looking ahead:\nExpect {topic} to become core to strategy and operations. How are you approaching it?\n\n#{} #Innovation #FutureOfWork #Technology",
                hashtag(topic)
            )
        })
        .collect()
}

/// Stand-in context lines when no search provider is configured.
pub fn context_lines(topic: &str) -> Vec<String> {
    vec![
        format!("{topic} is gaining significant attention in recent industry reports and discussions."),
        format!("Latest trends and developments in {topic} show promising growth and innovation."),
        format!("Experts predict that {topic} will continue to evolve and impact various sectors."),
        format!("Recent studies highlight the importance and benefits of {topic} in modern applications."),
        format!("Industry leaders are increasingly investing in {topic} related technologies and solutions."),
    ]
}

pub fn trending_topic(category_label: &str, index: usize) -> (String, String) {
    let lower = category_label.to_lowercase();
    (
        format!("{category_label} trending topic {index}"),
        format!(
            "This {lower} topic is currently trending and generating significant interest among \
             users and media outlets. It represents current market trends and discussions in the \
             {lower} space."
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tweets_are_deterministic_and_sized() {
        let a = tweets("electric vehicles", 3);
        let b = tweets("electric vehicles", 3);
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert!(a.iter().all(|t| !t.is_empty()));
        assert!(a[0].contains("#electricvehicles"));
    }

    #[test]
    fn linkedin_posts_count_matches() {
        let posts = linkedin_posts("rust", 4);
        assert_eq!(posts.len(), 4);
        assert!(posts[3].starts_with("🌟 (4/4)"));
    }

    #[test]
    fn context_lines_mention_topic() {
        let lines = context_lines("solar power");
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.contains("solar power")));
    }

    #[test]
    fn trending_fallback_nonempty() {
        let (title, summary) = trending_topic("Tech", 7);
        assert_eq!(title, "Tech trending topic 7");
        assert!(summary.contains("tech"));
    }
}
