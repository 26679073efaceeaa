pub mod fallback;
pub mod image;
pub mod orchestrator;
pub mod parse;
pub mod trending;
pub mod types;

pub use {
    orchestrator::Orchestrator,
    trending::{TrendingCategory, normalize_country},
    types::{ContentMode, ContentSet, Mood, Summary, TrendingTopic, VariantCount},
};
