//! Configuration types for kqlassist.

use crate::kvp::KeyCase;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Advanced Hunting console the payload is submitted to.
pub const DEFAULT_ROOT_URL: &str = "https://security.microsoft.com/v2/advanced-hunting";

/// Time range the console opens the query with.
pub const DEFAULT_TIME_RANGE_ID: &str = "month";

/// Default timeout for fetching a remote template library.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration, loaded from `~/.kqlassist/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    /// Destination console URL.
    pub root_url: String,
    /// Value for the `timeRangeId` parameter.
    pub time_range_id: String,
    /// Key comparison mode for KVP input.
    pub key_case: KeyCase,
    /// Fall back to a `tid=` KVP line when the page URL carries no tenant.
    pub tenant_from_kvp: bool,
    /// Template library: omitted for the bundled set, an `http(s)://` URL, or a file path.
    pub library: Option<String>,
    /// Timeout for fetching a remote library.
    pub fetch_timeout_secs: u64,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            time_range_id: DEFAULT_TIME_RANGE_ID.to_string(),
            key_case: KeyCase::default(),
            tenant_from_kvp: true,
            library: None,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl AssistConfig {
    pub fn library_source(&self) -> LibrarySource {
        match self.library.as_deref() {
            Some(s) => LibrarySource::parse(s),
            None => LibrarySource::Bundled,
        }
    }
}

/// Where the template library comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibrarySource {
    Bundled,
    File(PathBuf),
    Url(String),
}

impl LibrarySource {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("bundled") {
            Self::Bundled
        } else if s.starts_with("http://") || s.starts_with("https://") {
            Self::Url(s.to_string())
        } else {
            Self::File(PathBuf::from(s))
        }
    }
}

impl std::fmt::Display for LibrarySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bundled => write!(f, "bundled"),
            Self::File(p) => write!(f, "{}", p.display()),
            Self::Url(u) => write!(f, "{u}"),
        }
    }
}
