use std::fmt;

use thiserror::Error;

/// Which part of the upstream exchange failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamKind {
    /// Connection, timeout or unexpected HTTP status.
    Transport,
    /// Guest activation failed or the token was rejected.
    Auth,
    /// The API reported the post as missing.
    NotFound,
    /// HTTP 429.
    RateLimited,
}

impl fmt::Display for UpstreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Transport => "transport",
            Self::Auth => "auth",
            Self::NotFound => "not found",
            Self::RateLimited => "rate limited",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid post ID or URL: {input}")]
    InvalidInput { input: String },
    #[error("upstream unavailable ({kind}): {message}")]
    UpstreamUnavailable {
        kind: UpstreamKind,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl Error {
    pub(crate) fn invalid_input(input: &str) -> Self {
        Self::InvalidInput {
            input: input.to_string(),
        }
    }

    pub(crate) fn upstream(kind: UpstreamKind, message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn transport(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::UpstreamUnavailable {
            kind: UpstreamKind::Transport,
            message: message.into(),
            source: Some(source),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload(message.into())
    }

    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { .. })
    }

    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedPayload(_))
    }

    /// The upstream failure kind, if this is an upstream error.
    #[must_use]
    pub fn upstream_kind(&self) -> Option<UpstreamKind> {
        match self {
            Self::UpstreamUnavailable { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_distinct() {
        let invalid = Error::invalid_input("nope");
        assert!(invalid.is_invalid_input());
        assert!(!invalid.is_upstream());
        assert_eq!(invalid.to_string(), "invalid post ID or URL: nope");

        let upstream = Error::upstream(UpstreamKind::NotFound, "post 1 missing");
        assert!(upstream.is_upstream());
        assert_eq!(upstream.upstream_kind(), Some(UpstreamKind::NotFound));
        assert_eq!(
            upstream.to_string(),
            "upstream unavailable (not found): post 1 missing"
        );

        let malformed = Error::malformed("missing author");
        assert!(malformed.is_malformed());
        assert_eq!(malformed.upstream_kind(), None);
    }
}
