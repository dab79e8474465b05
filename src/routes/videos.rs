use lambda_http::http::{header::CACHE_CONTROL, HeaderValue};
use serde_json::json;
use vercel_runtime::{Body, Request, Response, StatusCode};

use crate::{
    cors,
    routes::{json_response, RouteError},
    vimeo::{Target, VideoItem, VimeoClient},
    Config,
};

const CACHE_POLICY: &str = "s-maxage=300, stale-while-revalidate";

/// Lists the videos of a Vimeo album or user as `{"items": [...]}`.
pub struct VideoListProxy {
    config: Config,
    http: reqwest::Client,
}

impl VideoListProxy {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Failures are rendered as JSON error responses, so this never fails.
    pub async fn handle(&self, req: Request) -> Response<Body> {
        let origin = cors::allowed_origin(&self.config, req.headers());

        let mut resp = match self.list_videos(&req).await {
            Ok(items) => {
                tracing::info!(count = items.len(), "Listed videos");
                let mut resp = json_response(StatusCode::OK, &json!({ "items": items }));
                resp.headers_mut()
                    .insert(CACHE_CONTROL, HeaderValue::from_static(CACHE_POLICY));
                resp
            }
            Err(err) => {
                match &err {
                    RouteError::Transport(_) | RouteError::Decode(_) => {
                        tracing::error!("{err}")
                    }
                    RouteError::Upstream { status, detail } => {
                        tracing::warn!(status, detail = %detail, "{err}")
                    }
                    _ => tracing::warn!("{err}"),
                }
                err.into_response()
            }
        };

        if let Some(origin) = origin {
            cors::apply(resp.headers_mut(), origin);
        }
        resp
    }

    async fn list_videos(&self, req: &Request) -> Result<Vec<VideoItem>, RouteError> {
        let album = album_param(req);
        let album = album.as_deref().or(self.config.album_id.as_deref());

        let token = self.config.token.as_deref().ok_or(RouteError::MissingConfig)?;
        let target = Target::resolve(album, self.config.user_id.as_deref())
            .ok_or(RouteError::MissingConfig)?;
        tracing::debug!(upstream = ?target, "Resolved listing");

        VimeoClient::new(self.http.clone(), &self.config.api_base, token)
            .list_videos(&target)
            .await
    }
}

/// The `album` query parameter, if present and non-empty.
fn album_param(req: &Request) -> Option<String> {
    let query = req.uri().query()?;
    form_urlencoded::parse(query.as_bytes())
        .find_map(|(k, v)| if k == "album" { Some(v) } else { None })
        .filter(|v| !v.is_empty())
        .map(|v| v.into_owned())
}
