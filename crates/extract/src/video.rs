use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::unwrap_used)] // static patterns
static VIDEO_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([A-Za-z0-9_-]+)").unwrap(),
        Regex::new(r"youtube\.com/embed/([A-Za-z0-9_-]+)").unwrap(),
        Regex::new(r"youtube\.com/v/([A-Za-z0-9_-]+)").unwrap(),
    ]
});

/// Pull the video id out of a YouTube URL, trying the known URL shapes in
/// order. `None` means the input is not recognizably a video URL.
pub fn parse_video_id(url: &str) -> Option<String> {
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_url() {
        assert_eq!(
            parse_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn short_url() {
        assert_eq!(
            parse_video_id("https://youtu.be/abc123").as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn embed_and_v_urls() {
        assert_eq!(
            parse_video_id("https://www.youtube.com/embed/xyz789").as_deref(),
            Some("xyz789")
        );
        assert_eq!(
            parse_video_id("https://www.youtube.com/v/xyz789").as_deref(),
            Some("xyz789")
        );
    }

    #[test]
    fn query_suffix_is_not_part_of_the_id() {
        assert_eq!(
            parse_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn non_video_urls_rejected() {
        assert!(parse_video_id("https://example.com/article").is_none());
        assert!(parse_video_id("not a url").is_none());
    }
}
