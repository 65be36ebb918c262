//! Upstream header set
//!
//! Outbound requests carry exactly this fixed header collection. Caller
//! headers, including any Authorization, are never forwarded.

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

/// Headers the default upstream expects from its web client
pub const DEEPINFRA_WEB_HEADERS: &[(&str, &str)] = &[
    (
        "user-agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
    ),
    ("accept", "text/event-stream"),
    ("content-type", "application/json"),
    ("x-deepinfra-source", "web-page"),
    ("origin", "https://deepinfra.com"),
    ("referer", "https://deepinfra.com/"),
];

/// Constant headers attached to every forwarded request
#[derive(Debug, Clone)]
pub struct UpstreamHeaderSet {
    headers: HeaderMap,
}

impl UpstreamHeaderSet {
    /// Build from name/value pairs, validating each one
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Result<Self> {
        let mut headers = HeaderMap::with_capacity(pairs.len());
        for (name, value) in pairs {
            let name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("Invalid upstream header name '{}'", name))?;
            let value = HeaderValue::from_str(value)
                .with_context(|| format!("Invalid value for upstream header '{}'", name))?;
            headers.insert(name, value);
        }
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        Ok(Self { headers })
    }

    /// The header set used against the default upstream
    pub fn deepinfra_web() -> Result<Self> {
        Self::from_pairs(DEEPINFRA_WEB_HEADERS)
    }

    pub fn as_header_map(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}
