use std::str::FromStr;

use lambda_http::http::{
    header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY},
    HeaderMap, HeaderValue,
};
use thiserror::Error;
use url::Url;

use crate::Config;

/// How a request's `Origin` is compared against `ALLOW_ORIGIN`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OriginMatch {
    /// The origin contains the allowed value anywhere. Lookalike hosts such as
    /// `https://example.com.attacker.net` pass.
    #[default]
    Substring,
    /// The origin's host is the allowed value or one of its subdomains.
    Host,
    /// The origin is exactly the allowed value.
    Exact,
}

impl OriginMatch {
    pub fn matches(self, allowed: &str, origin: &str) -> bool {
        match self {
            OriginMatch::Substring => origin.contains(allowed),
            OriginMatch::Exact => origin == allowed,
            OriginMatch::Host => Url::parse(origin)
                .ok()
                .and_then(|url| url.host_str().map(str::to_owned))
                .is_some_and(|host| {
                    host == allowed
                        || host
                            .strip_suffix(allowed)
                            .is_some_and(|rest| rest.ends_with('.'))
                }),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
#[error("Unknown ALLOW_ORIGIN_MATCH value {0:?}")]
pub struct UnknownOriginMatch(String);

impl FromStr for OriginMatch {
    type Err = UnknownOriginMatch;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(OriginMatch::Substring),
            "host" => Ok(OriginMatch::Host),
            "exact" => Ok(OriginMatch::Exact),
            _ => Err(UnknownOriginMatch(s.to_string())),
        }
    }
}

/// Returns the request's `Origin` if it should be echoed back.
pub fn allowed_origin(config: &Config, headers: &HeaderMap) -> Option<HeaderValue> {
    let allowed = config.allow_origin.as_deref()?;
    let origin = headers.get(ORIGIN)?;
    let matched = origin
        .to_str()
        .is_ok_and(|o| config.origin_match.matches(allowed, o));

    matched.then(|| origin.clone())
}

pub fn apply(headers: &mut HeaderMap, origin: HeaderValue) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(VARY, HeaderValue::from_static("Origin"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(allow: &str, origin_match: OriginMatch) -> Config {
        Config {
            allow_origin: Some(allow.to_string()),
            origin_match,
            ..Config::default()
        }
    }

    fn origin(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ORIGIN, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn substring_echoes_matching_origin() {
        let config = config("example.com", OriginMatch::Substring);

        assert_eq!(
            allowed_origin(&config, &origin("https://sub.example.com")),
            Some(HeaderValue::from_static("https://sub.example.com"))
        );
        assert_eq!(allowed_origin(&config, &origin("https://other.test")), None);
        // Lookalikes still pass in this mode
        assert!(allowed_origin(&config, &origin("https://evil-example.com.attacker.net")).is_some());
    }

    #[test]
    fn host_requires_label_boundary() {
        let config = config("example.com", OriginMatch::Host);

        assert!(allowed_origin(&config, &origin("https://example.com")).is_some());
        assert!(allowed_origin(&config, &origin("https://sub.example.com:8443")).is_some());
        assert!(allowed_origin(&config, &origin("https://evil-example.com")).is_none());
        assert!(allowed_origin(&config, &origin("https://example.com.attacker.net")).is_none());
        assert!(allowed_origin(&config, &origin("null")).is_none());
    }

    #[test]
    fn exact_requires_full_origin() {
        let config = config("https://example.com", OriginMatch::Exact);

        assert!(allowed_origin(&config, &origin("https://example.com")).is_some());
        assert!(allowed_origin(&config, &origin("https://sub.example.com")).is_none());
    }

    #[test]
    fn nothing_echoed_without_allow_origin_or_header() {
        let open = Config::default();
        assert!(allowed_origin(&open, &origin("https://example.com")).is_none());

        let config = config("example.com", OriginMatch::Substring);
        assert!(allowed_origin(&config, &HeaderMap::new()).is_none());
    }

    #[test]
    fn apply_sets_vary() {
        let mut headers = HeaderMap::new();
        apply(&mut headers, HeaderValue::from_static("https://sub.example.com"));

        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "https://sub.example.com");
        assert_eq!(headers[VARY], "Origin");
    }

    #[test]
    fn parses_match_modes() {
        assert_eq!("substring".parse::<OriginMatch>(), Ok(OriginMatch::Substring));
        assert_eq!(" Host ".parse::<OriginMatch>(), Ok(OriginMatch::Host));
        assert_eq!("EXACT".parse::<OriginMatch>(), Ok(OriginMatch::Exact));
        assert_eq!(
            "suffix".parse::<OriginMatch>().unwrap_err().to_string(),
            "Unknown ALLOW_ORIGIN_MATCH value \"suffix\""
        );
    }
}
