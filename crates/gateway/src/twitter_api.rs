use std::sync::Arc;

use {
    axum::{Json, extract::State},
    axum_extra::extract::cookie::CookieJar,
    serde::Deserialize,
};

use postpilot_common::{Error, types::ProviderUser};
use postpilot_twitter::PostedTweet;

use crate::{auth::session_id, error::ApiError, state::GatewayState};

#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub text: String,
}

async fn access_token(state: &GatewayState, jar: &CookieJar) -> Result<String, Error> {
    let sid = session_id(jar).ok_or_else(|| Error::auth("not connected to Twitter"))?;
    state
        .store
        .tokens(&sid)
        .await
        .map(|t| t.access_token)
        .ok_or_else(|| Error::auth("not connected to Twitter"))
}

/// POST /api/twitter/post — publish a single post with the session's
/// bearer token. Length is validated before any network call.
pub async fn post_tweet(
    State(state): State<Arc<GatewayState>>,
    jar: CookieJar,
    Json(req): Json<PostRequest>,
) -> Result<Json<PostedTweet>, ApiError> {
    let token = access_token(&state, &jar).await.map_err(|e| state.err(e))?;
    let posted = state
        .twitter
        .post_tweet(&token, &req.text)
        .await
        .map_err(|e| state.err(e))?;
    Ok(Json(posted))
}

/// GET /api/twitter/user — re-fetch the connected account's profile and
/// refresh the cached copy.
pub async fn get_user(
    State(state): State<Arc<GatewayState>>,
    jar: CookieJar,
) -> Result<Json<ProviderUser>, ApiError> {
    let sid = session_id(&jar)
        .ok_or_else(|| state.err(Error::auth("not connected to Twitter")))?;
    let token = access_token(&state, &jar).await.map_err(|e| state.err(e))?;

    let user = state.twitter.me(&token).await.map_err(|e| state.err(e))?;
    state.store.put_user(&sid, user.clone()).await;
    Ok(Json(user))
}
