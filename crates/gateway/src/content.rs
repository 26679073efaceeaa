use std::sync::Arc;

use {
    axum::{Json, extract::State},
    serde::Deserialize,
};

use {
    postpilot_common::Error,
    postpilot_generate::{
        ContentMode, ContentSet, Mood, Summary, TrendingCategory, TrendingTopic, VariantCount,
    },
};

use crate::{error::ApiError, state::GatewayState};

#[derive(Debug, Deserialize)]
pub struct GenerateContentRequest {
    pub topic: String,
    #[serde(default)]
    pub mode: ContentMode,
    #[serde(default)]
    pub mood: Mood,
    pub variants: Option<u8>,
}

/// POST /api/generate/content
pub async fn generate_content(
    State(state): State<Arc<GatewayState>>,
    Json(req): Json<GenerateContentRequest>,
) -> Result<Json<ContentSet>, ApiError> {
    let variants = VariantCount::from_requested(req.variants)
        .ok_or_else(|| state.err(Error::validation("variants must be 3 or 4")))?;
    let set = state
        .orchestrator
        .generate_content(&req.topic, req.mode, req.mood, variants)
        .await
        .map_err(|e| state.err(e))?;
    Ok(Json(set))
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub size: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct ImageResponse {
    pub image_base64: String,
}

/// POST /api/generate/image
pub async fn generate_image(
    State(state): State<Arc<GatewayState>>,
    Json(req): Json<ImageRequest>,
) -> Result<Json<ImageResponse>, ApiError> {
    let image_base64 = state
        .orchestrator
        .generate_image(&req.prompt, req.size.as_deref())
        .await
        .map_err(|e| state.err(e))?;
    Ok(Json(ImageResponse { image_base64 }))
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub url: String,
}

/// POST /api/summarize/article
pub async fn summarize_article(
    State(state): State<Arc<GatewayState>>,
    Json(req): Json<SummarizeRequest>,
) -> Result<Json<Summary>, ApiError> {
    let summary = state
        .orchestrator
        .summarize_article(req.url.trim())
        .await
        .map_err(|e| state.err(e))?;
    Ok(Json(summary))
}

/// POST /api/summarize/video
pub async fn summarize_video(
    State(state): State<Arc<GatewayState>>,
    Json(req): Json<SummarizeRequest>,
) -> Result<Json<Summary>, ApiError> {
    let summary = state
        .orchestrator
        .summarize_video(req.url.trim())
        .await
        .map_err(|e| state.err(e))?;
    Ok(Json(summary))
}

#[derive(Debug, Deserialize)]
pub struct TrendingRequest {
    pub category: String,
    pub country: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct TrendingResponse {
    pub topics: Vec<TrendingTopic>,
}

/// POST /api/trending
pub async fn trending(
    State(state): State<Arc<GatewayState>>,
    Json(req): Json<TrendingRequest>,
) -> Result<Json<TrendingResponse>, ApiError> {
    let category = TrendingCategory::parse(&req.category)
        .ok_or_else(|| state.err(Error::validation("unsupported category")))?;
    let topics = state
        .orchestrator
        .trending(category, req.country.as_deref())
        .await;
    Ok(Json(TrendingResponse { topics }))
}
