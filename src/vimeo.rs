use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use url::Url;

use crate::routes::RouteError;

/// Largest page the API hands out; nothing past the first page is fetched.
const PER_PAGE: u32 = 100;
const FIELDS: &str = "uri,name,pictures.sizes,duration,privacy";

/// Which listing endpoint to call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<'a> {
    Album(&'a str),
    User(&'a str),
}

impl<'a> Target<'a> {
    /// An album always wins over the user fallback.
    pub fn resolve(album: Option<&'a str>, user_id: Option<&'a str>) -> Option<Self> {
        album.map(Target::Album).or(user_id.map(Target::User))
    }

    pub fn url(&self, base: &Url) -> Result<Url, RouteError> {
        let (kind, id) = match self {
            Target::Album(id) => ("albums", *id),
            Target::User(id) => ("users", *id),
        };

        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| RouteError::InvalidApiBase)?
            .pop_if_empty()
            .extend([kind, id, "videos"]);
        url.set_query(Some(&format!("per_page={PER_PAGE}&fields={FIELDS}")));
        Ok(url)
    }
}

pub struct VimeoClient<'a> {
    http: reqwest::Client,
    base: &'a Url,
    token: &'a str,
}

impl<'a> VimeoClient<'a> {
    pub fn new(http: reqwest::Client, base: &'a Url, token: &'a str) -> Self {
        Self { http, base, token }
    }

    pub async fn list_videos(&self, target: &Target<'_>) -> Result<Vec<VideoItem>, RouteError> {
        let url = target.url(self.base)?;

        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("bearer {}", self.token))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        tracing::info!(upstream = ?target, status = status.as_u16(), "Vimeo responded");

        if !status.is_success() {
            return Err(RouteError::Upstream {
                status: status.as_u16(),
                detail: body,
            });
        }

        let page: Value = serde_json::from_str(&body)?;
        Ok(page_items(&page))
    }
}

/// Normalizes one page of `/albums/{id}/videos` or `/users/{id}/videos`.
///
/// A page without a `data` array lists nothing. Every element of `data`
/// yields exactly one item, whatever its shape.
pub fn page_items(page: &Value) -> Vec<VideoItem> {
    page.get("data")
        .and_then(Value::as_array)
        .map(|videos| videos.iter().map(VideoItem::from_record).collect())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoItem {
    pub id: String,
    pub name: String,
    pub duration: Number,
    pub thumbnail: Option<String>,
    pub privacy: Value,
}

impl VideoItem {
    /// Fields that are missing or of the wrong type fall back to defaults.
    pub fn from_record(video: &Value) -> Self {
        let id = video
            .get("uri")
            .and_then(Value::as_str)
            .and_then(|uri| uri.rsplit('/').next())
            .unwrap_or_default()
            .to_string();

        // Sizes are ordered smallest to largest
        let thumbnail = video
            .pointer("/pictures/sizes")
            .and_then(Value::as_array)
            .and_then(|sizes| sizes.last())
            .and_then(|largest| largest.get("link"))
            .and_then(Value::as_str)
            .map(str::to_owned);

        VideoItem {
            id,
            name: video
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            duration: video
                .get("duration")
                .and_then(|d| match d {
                    Value::Number(n) => Some(n.clone()),
                    _ => None,
                })
                .unwrap_or_else(|| Number::from(0)),
            thumbnail,
            privacy: video
                .get("privacy")
                .and_then(Value::as_object)
                .cloned()
                .map(Value::Object)
                .unwrap_or_else(|| Value::Object(Map::new())),
        }
    }
}
