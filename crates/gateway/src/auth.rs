use std::sync::Arc;

use {
    axum::{
        extract::{Query, State},
        response::Redirect,
    },
    axum_extra::extract::cookie::{Cookie, CookieJar},
    serde::Deserialize,
    tracing::{info, warn},
};

use {
    postpilot_common::types::ProviderUser,
    postpilot_oauth::AbortReason,
};

use crate::{error::ApiError, state::GatewayState};

/// Opaque session id, http-only. All secret material lives server-side.
pub const SESSION_COOKIE: &str = "sid";

/// Display profile for client script. Non-sensitive fields only.
pub const PROFILE_COOKIE: &str = "cached_profile";

pub fn session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /api/twitter/auth — start the authorization flow and redirect the
/// user agent to the provider.
pub async fn twitter_auth(
    State(state): State<Arc<GatewayState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiError> {
    // Configuration is checked before any secret is generated.
    let flow = state.oauth_flow().map_err(|e| state.err(e))?;
    let request = flow.start().map_err(|e| state.err(e))?;

    let sid = session_id(&jar).unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    state.store.put_login(&sid, request.login_session()).await;

    info!(session = %sid, "oauth flow started");
    let jar = jar.add(
        Cookie::build((SESSION_COOKIE, sid))
            .path("/")
            .http_only(true)
            .build(),
    );
    Ok((jar, Redirect::temporary(&request.url)))
}

/// GET /api/twitter/callback — validate, exchange, fetch profile, commit.
///
/// Every terminal state redirects back to the application with a status
/// query parameter; no token material ever appears in a redirect URL.
pub async fn twitter_callback(
    State(state): State<Arc<GatewayState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> (CookieJar, Redirect) {
    let sid = session_id(&jar);
    match run_callback(&state, sid.as_deref(), &params).await {
        Ok(user) => {
            info!(username = %user.username, "twitter account connected");
            let profile_json = serde_json::to_string(&user).unwrap_or_default();
            let encoded: String =
                url::form_urlencoded::byte_serialize(profile_json.as_bytes()).collect();
            let jar = jar.add(Cookie::build((PROFILE_COOKIE, encoded)).path("/").build());
            (jar, app_redirect(&state, "success"))
        },
        Err(reason) => {
            warn!(reason = reason.as_str(), "oauth callback aborted");
            (jar, app_redirect(&state, reason.as_str()))
        },
    }
}

fn app_redirect(state: &GatewayState, status: &str) -> Redirect {
    let base = state.config.app_url.trim_end_matches('/');
    Redirect::temporary(&format!("{base}/?twitter_auth={status}"))
}

/// The callback state machine: Validating → Exchanging → FetchingProfile →
/// Committed, with `AbortReason` as the terminal failure from any step.
pub(crate) async fn run_callback(
    state: &GatewayState,
    session_id: Option<&str>,
    params: &CallbackParams,
) -> Result<ProviderUser, AbortReason> {
    if params.error.is_some() {
        return Err(AbortReason::Denied);
    }
    let (Some(code), Some(callback_state)) = (params.code.as_deref(), params.state.as_deref())
    else {
        return Err(AbortReason::InvalidRequest);
    };

    // The stored login entry is consumed here, before validation: a replay
    // of the same callback finds nothing and fails closed.
    let sid = session_id.ok_or(AbortReason::InvalidState)?;
    let login = state
        .store
        .take_login(sid)
        .await
        .ok_or(AbortReason::InvalidState)?;
    if login.state != callback_state {
        return Err(AbortReason::InvalidState);
    }

    let flow = state.oauth_flow().map_err(|_| AbortReason::ExchangeFailed)?;
    let tokens = flow
        .exchange(code, &login.code_verifier)
        .await
        .map_err(|e| {
            warn!(error = %e, "token exchange failed");
            AbortReason::ExchangeFailed
        })?;

    // An unusable profile blocks the commit; we never store a token set we
    // cannot attribute to an account.
    let user = state.twitter.me(&tokens.access_token).await.map_err(|e| {
        warn!(error = %e, "profile fetch failed");
        AbortReason::ProfileFailed
    })?;

    state.store.put_tokens(sid, tokens).await;
    state.store.put_user(sid, user.clone()).await;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use postpilot_config::AppConfig;

    use super::*;

    async fn test_state(token_url: String, api_base_url: String) -> GatewayState {
        let config = AppConfig::from_lookup(&move |key| match key {
            "TWITTER_CLIENT_ID" => Some("cid".into()),
            "TWITTER_CLIENT_SECRET" => Some("shh".into()),
            "TWITTER_REDIRECT_URI" => {
                Some("http://localhost:3000/api/twitter/callback".into())
            },
            "TWITTER_TOKEN_URL" => Some(token_url.clone()),
            "TWITTER_API_BASE_URL" => Some(api_base_url.clone()),
            _ => None,
        })
        .unwrap();
        GatewayState::new(config).unwrap()
    }

    fn params(code: Option<&str>, state: Option<&str>, error: Option<&str>) -> CallbackParams {
        CallbackParams {
            code: code.map(Into::into),
            state: state.map(Into::into),
            error: error.map(Into::into),
        }
    }

    async fn start_login(state: &GatewayState, sid: &str) -> String {
        let request = state.oauth_flow().unwrap().start().unwrap();
        state.store.put_login(sid, request.login_session()).await;
        request.state
    }

    fn mock_token_endpoint(server: &mut mockito::Server) -> mockito::Mock {
        server
            .mock("POST", "/2/oauth2/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"at","refresh_token":"rt","expires_in":7200}"#)
    }

    fn mock_profile_endpoint(server: &mut mockito::Server) -> mockito::Mock {
        server
            .mock("GET", "/2/users/me?user.fields=profile_image_url")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"id":"7","username":"jo","name":"Jo"}}"#)
    }

    #[tokio::test]
    async fn successful_callback_commits_and_consumes() {
        let mut server = mockito::Server::new_async().await;
        mock_token_endpoint(&mut server).create_async().await;
        mock_profile_endpoint(&mut server).create_async().await;

        let url = server.url();
        let state = test_state(format!("{url}/2/oauth2/token"), url.clone()).await;
        let oauth_state = start_login(&state, "sid-1").await;

        let cb = params(Some("the-code"), Some(&oauth_state), None);
        let user = run_callback(&state, Some("sid-1"), &cb).await.unwrap();
        assert_eq!(user.username, "jo");
        assert!(state.store.tokens("sid-1").await.is_some());
        assert!(state.store.user("sid-1").await.is_some());

        // Replaying the same callback must fail closed: the one-time login
        // entry was consumed by the first pass.
        let replay = run_callback(&state, Some("sid-1"), &cb).await;
        assert_eq!(replay.unwrap_err(), AbortReason::InvalidState);
    }

    #[tokio::test]
    async fn state_mismatch_aborts_without_persisting() {
        let server = mockito::Server::new_async().await;
        let url = server.url();
        let state = test_state(format!("{url}/2/oauth2/token"), url.clone()).await;
        start_login(&state, "sid-1").await;

        let cb = params(Some("the-code"), Some("forged-state"), None);
        let result = run_callback(&state, Some("sid-1"), &cb).await;
        assert_eq!(result.unwrap_err(), AbortReason::InvalidState);
        assert!(state.store.tokens("sid-1").await.is_none());
    }

    #[tokio::test]
    async fn provider_error_param_means_denied() {
        let server = mockito::Server::new_async().await;
        let url = server.url();
        let state = test_state(format!("{url}/2/oauth2/token"), url.clone()).await;
        let result = run_callback(
            &state,
            Some("sid-1"),
            &params(None, None, Some("access_denied")),
        )
        .await;
        assert_eq!(result.unwrap_err(), AbortReason::Denied);
    }

    #[tokio::test]
    async fn missing_code_or_state_is_invalid_request() {
        let server = mockito::Server::new_async().await;
        let url = server.url();
        let state = test_state(format!("{url}/2/oauth2/token"), url.clone()).await;
        let result = run_callback(&state, Some("sid-1"), &params(Some("c"), None, None)).await;
        assert_eq!(result.unwrap_err(), AbortReason::InvalidRequest);
    }

    #[tokio::test]
    async fn exchange_rejection_aborts_flow() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/2/oauth2/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant"}"#)
            .create_async()
            .await;

        let url = server.url();
        let state = test_state(format!("{url}/2/oauth2/token"), url.clone()).await;
        let oauth_state = start_login(&state, "sid-1").await;

        let cb = params(Some("bad-code"), Some(&oauth_state), None);
        let result = run_callback(&state, Some("sid-1"), &cb).await;
        assert_eq!(result.unwrap_err(), AbortReason::ExchangeFailed);
        assert!(state.store.tokens("sid-1").await.is_none());
    }

    #[tokio::test]
    async fn failed_profile_fetch_blocks_commit() {
        let mut server = mockito::Server::new_async().await;
        mock_token_endpoint(&mut server).create_async().await;
        server
            .mock("GET", "/2/users/me?user.fields=profile_image_url")
            .with_status(500)
            .create_async()
            .await;

        let url = server.url();
        let state = test_state(format!("{url}/2/oauth2/token"), url.clone()).await;
        let oauth_state = start_login(&state, "sid-1").await;

        let cb = params(Some("the-code"), Some(&oauth_state), None);
        let result = run_callback(&state, Some("sid-1"), &cb).await;
        assert_eq!(result.unwrap_err(), AbortReason::ProfileFailed);
        assert!(state.store.tokens("sid-1").await.is_none());
    }
}
