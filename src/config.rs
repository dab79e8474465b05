use std::{env, fmt};

use url::Url;

use crate::cors::OriginMatch;

pub const DEFAULT_API_BASE: &str = "https://api.vimeo.com";

/// Settings for one invocation, sourced from the environment.
///
/// Unset and empty variables are both treated as absent.
#[derive(Clone)]
pub struct Config {
    /// Bearer token for the Vimeo API (`VIMEO_TOKEN`)
    pub token: Option<String>,
    /// Album listed when the request has no `album` parameter (`VIMEO_ALBUM_ID`)
    pub album_id: Option<String>,
    /// User whose uploads are listed when no album resolves (`VIMEO_USER_ID`)
    pub user_id: Option<String>,
    /// Value an `Origin` header must match to be echoed (`ALLOW_ORIGIN`)
    pub allow_origin: Option<String>,
    /// How `allow_origin` is compared (`ALLOW_ORIGIN_MATCH`)
    pub origin_match: OriginMatch,
    /// Root of the Vimeo API (`VIMEO_API_BASE`)
    pub api_base: Url,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let origin_match = match var("ALLOW_ORIGIN_MATCH") {
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!("{err}, using substring");
                OriginMatch::default()
            }),
            None => OriginMatch::default(),
        };

        let api_base = match var("VIMEO_API_BASE") {
            Some(raw) => match Url::parse(&raw) {
                Ok(url) if !url.cannot_be_a_base() => url,
                Ok(_) => {
                    tracing::warn!(value = %raw, "VIMEO_API_BASE cannot be a base URL, using default");
                    default_api_base()
                }
                Err(e) => {
                    tracing::warn!(value = %raw, "Invalid VIMEO_API_BASE ({e}), using default");
                    default_api_base()
                }
            },
            None => default_api_base(),
        };

        Self {
            token: var("VIMEO_TOKEN"),
            album_id: var("VIMEO_ALBUM_ID"),
            user_id: var("VIMEO_USER_ID"),
            allow_origin: var("ALLOW_ORIGIN"),
            origin_match,
            api_base,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            album_id: None,
            user_id: None,
            allow_origin: None,
            origin_match: OriginMatch::default(),
            api_base: default_api_base(),
        }
    }
}

// Keeps the token out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("album_id", &self.album_id)
            .field("user_id", &self.user_id)
            .field("allow_origin", &self.allow_origin)
            .field("origin_match", &self.origin_match)
            .field("api_base", &self.api_base.as_str())
            .finish()
    }
}

fn default_api_base() -> Url {
    Url::parse(DEFAULT_API_BASE).expect("default API base to be valid")
}
