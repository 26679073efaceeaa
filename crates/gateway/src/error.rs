use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use postpilot_common::Error;

/// HTTP-facing wrapper around the shared error taxonomy.
///
/// The body carries a short human-readable message; upstream diagnostic
/// detail rides along only when the server is not in production mode.
pub struct ApiError {
    error: Error,
    include_detail: bool,
}

impl ApiError {
    pub fn new(error: Error, include_detail: bool) -> Self {
        Self {
            error,
            include_detail,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.error {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Upstream { .. } | Error::Parse(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = serde_json::json!({ "error": self.error.to_string() });
        if self.include_detail {
            if let Error::Upstream {
                detail: Some(detail),
                ..
            } = &self.error
            {
                body["details"] = serde_json::json!(detail);
            }
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        let cases = [
            (Error::validation("bad"), StatusCode::BAD_REQUEST),
            (Error::auth("no token"), StatusCode::UNAUTHORIZED),
            (Error::config("missing key"), StatusCode::INTERNAL_SERVER_ERROR),
            (Error::upstream("fail", None), StatusCode::BAD_GATEWAY),
            (Error::Parse("shape".into()), StatusCode::BAD_GATEWAY),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError::new(error, false).status(), expected);
        }
    }
}
