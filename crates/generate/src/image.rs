/// Descriptors embedded in the image prompt for a classified topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualTheme {
    pub name: &'static str,
    pub theme: &'static str,
    pub colors: &'static str,
    pub elements: &'static str,
}

const THEMES: &[(&[&str], VisualTheme)] = &[
    (
        &["ai", "artificial intelligence", "machine learning"],
        VisualTheme {
            name: "ai",
            theme: "futuristic AI technology, neural networks, digital brain, circuit patterns",
            colors: "blue, purple, and silver tones",
            elements: "holographic displays, data visualizations, tech interfaces",
        },
    ),
    (
        &["business", "startup", "entrepreneur"],
        VisualTheme {
            name: "business",
            theme: "professional business environment, growth charts, handshakes, office settings",
            colors: "professional blues, grays, and accent colors",
            elements: "charts, graphs, business icons, professional settings",
        },
    ),
    (
        &["health", "medical", "healthcare"],
        VisualTheme {
            name: "health",
            theme: "medical technology, healthcare professionals, wellness symbols",
            colors: "clean whites, medical blues, and health greens",
            elements: "medical equipment, health icons, professional healthcare settings",
        },
    ),
    (
        &["tech", "software", "digital"],
        VisualTheme {
            name: "tech",
            theme: "modern technology, digital interfaces, coding elements",
            colors: "tech blues, digital greens, and modern grays",
            elements: "code snippets, digital interfaces, tech gadgets",
        },
    ),
    (
        &["finance", "money", "investment"],
        VisualTheme {
            name: "finance",
            theme: "financial charts, currency symbols, professional finance",
            colors: "professional greens, golds, and business colors",
            elements: "charts, graphs, financial symbols, professional settings",
        },
    ),
];

const GENERIC_THEME: VisualTheme = VisualTheme {
    name: "generic",
    theme: "professional, modern, clean design",
    colors: "professional and modern color palette",
    elements: "relevant icons and visual elements",
};

/// Match the content against the theme table, first keyword hit wins.
pub fn classify(content: &str) -> VisualTheme {
    let lower = content.to_lowercase();
    THEMES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(_, theme)| *theme)
        .unwrap_or(GENERIC_THEME)
}

/// Full image-generation prompt for a piece of content.
pub fn build_prompt(content: &str) -> String {
    let theme = classify(content);
    format!(
        "Create a professional social media post image for this content: \"{content}\".\n\n\
         Visual Requirements:\n\
         - Theme: {}\n\
         - Color Scheme: {}\n\
         - Key Elements: {}\n\
         - Style: Professional, modern, clean, social media optimized\n\
         - Composition: Balanced, visually appealing, supports the written content\n\
         - Quality: High-resolution, professional photography/illustration style\n\n\
         Make the image directly relevant to the specific topic and content mentioned. \
         Avoid generic stock photos - create something that specifically represents the \
         subject matter.",
        theme.theme, theme.colors, theme.elements
    )
}
