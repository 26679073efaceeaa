pub mod pipeline;
pub mod strategy;
pub mod transcript;
pub mod video;

pub use {
    pipeline::{ExtractedContent, Extractor},
    strategy::{ExtractStrategy, PartialMetadata, default_strategies, run_strategies},
    video::parse_video_id,
};
