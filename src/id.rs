use regex::Regex;
use url::Url;

use crate::error::{Error, Result};

static NUMERIC_ID: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

/// Partial paths such as `status/123` or `user/article/123`.
static PATH_ID: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?:status|article)/(\d+)").unwrap());

const POST_HOSTS: &[&str] = &[
    "twitter.com",
    "www.twitter.com",
    "mobile.twitter.com",
    "x.com",
    "www.x.com",
    "mobile.x.com",
];

/// Extract a post ID from a bare ID, a status/article URL, or a partial path.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when no post ID can be found.
pub fn extract_post_id(id_or_url: &str) -> Result<String> {
    let input = id_or_url.trim();

    if is_valid_post_id(input) {
        return Ok(input.to_string());
    }

    if let Ok(url) = Url::parse(input) {
        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.collect())
            .unwrap_or_default();
        for marker in ["status", "article"] {
            if let Some(pos) = segments.iter().position(|s| *s == marker) {
                if let Some(id) = segments.get(pos + 1).filter(|s| is_valid_post_id(s)) {
                    return Ok((*id).to_string());
                }
            }
        }
        return Err(Error::invalid_input(id_or_url));
    }

    PATH_ID
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::invalid_input(id_or_url))
}

/// Whether `id` is a numeric post ID.
#[must_use]
pub fn is_valid_post_id(id: &str) -> bool {
    NUMERIC_ID.is_match(id)
}

/// Whether `url` is a twitter.com / x.com status or article URL.
#[must_use]
pub fn is_valid_post_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let host_ok = parsed
        .host_str()
        .is_some_and(|host| POST_HOSTS.contains(&host.to_lowercase().as_str()));
    let path = parsed.path();
    host_ok && (path.contains("/status/") || path.contains("/article/"))
}
