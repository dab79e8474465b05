use lambda_http::http::{header::CONTENT_TYPE, HeaderValue};
use serde_json::{json, Value};
use thiserror::Error;
use vercel_runtime::{Body, Response, StatusCode};

pub mod videos;


#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Missing VIMEO_TOKEN and VIMEO_USER_ID or VIMEO_ALBUM_ID.")]
    MissingConfig,
    #[error("VIMEO_API_BASE cannot be used as a base URL")]
    InvalidApiBase,
    #[error("Vimeo API error")]
    Upstream { status: u16, detail: String },
    #[error("Failed to reach Vimeo: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Invalid response from Vimeo: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RouteError {
    pub fn status(&self) -> StatusCode {
        match self {
            RouteError::MissingConfig | RouteError::InvalidApiBase => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            // Vimeo's status is passed through as-is
            RouteError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RouteError::Transport(_) | RouteError::Decode(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn into_response(self) -> Response<Body> {
        let body = match &self {
            RouteError::MissingConfig | RouteError::InvalidApiBase => {
                json!({ "error": self.to_string() })
            }
            RouteError::Upstream { detail, .. } => {
                json!({ "error": self.to_string(), "detail": detail })
            }
            RouteError::Transport(err) => {
                json!({ "error": "Failed to reach Vimeo", "detail": err.to_string() })
            }
            RouteError::Decode(err) => {
                json!({ "error": "Invalid response from Vimeo", "detail": err.to_string() })
            }
        };
        json_response(self.status(), &body)
    }
}

pub(crate) fn json_response(status: StatusCode, body: &Value) -> Response<Body> {
    let mut resp = Response::new(Body::Text(body.to_string()));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    resp
}
