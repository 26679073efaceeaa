use std::sync::Arc;

use {
    axum::{
        Json, Router,
        routing::{get, post},
    },
    tower_http::cors::CorsLayer,
    tracing::info,
};

use postpilot_config::AppConfig;

use crate::{auth, content, state::GatewayState, twitter_api};

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/twitter/auth", get(auth::twitter_auth))
        .route("/api/twitter/callback", get(auth::twitter_callback))
        .route("/api/twitter/post", post(twitter_api::post_tweet))
        .route("/api/twitter/user", get(twitter_api::get_user))
        .route("/api/generate/content", post(content::generate_content))
        .route("/api/generate/image", post(content::generate_image))
        .route("/api/summarize/article", post(content::summarize_article))
        .route("/api/summarize/video", post(content::summarize_video))
        .route("/api/trending", post(content::trending))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Build state from the configuration and serve until shutdown.
pub async fn start_gateway(bind: &str, port: u16, config: AppConfig) -> anyhow::Result<()> {
    let state = Arc::new(GatewayState::new(config)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((bind, port)).await?;
    info!("gateway listening on http://{bind}:{port}");
    axum::serve(listener, app).await?;
    Ok(())
}
