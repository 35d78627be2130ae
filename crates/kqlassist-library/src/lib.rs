//! Template library sources for kqlassist.
//!
//! A library is loaded once per session from one of:
//! - the bundled set compiled into the binary,
//! - a local JSON file,
//! - a JSON document fetched over HTTP.
//!
//! [`load`] never fails: a source that cannot be read degrades to an empty
//! library with [`LibraryStatus::Unavailable`], so the caller can show a
//! "no templates available" state instead of crashing.

pub mod bundled;
pub mod loader;

use kqlassist_types::{LibrarySource, TemplateLibrary};
use std::time::Duration;
use tracing::warn;

// ─── Error types ─────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(String),
    #[error("HTTP error: {0}")]
    Http(String),
}

pub type LibraryResult<T> = Result<T, LibraryError>;

// ─── Load outcome ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryStatus {
    Available,
    Unavailable { reason: String },
}

impl LibraryStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// A library plus whether its source could actually be read.
#[derive(Debug, Clone)]
pub struct LoadedLibrary {
    pub library: TemplateLibrary,
    pub source: LibrarySource,
    pub status: LibraryStatus,
}

impl LoadedLibrary {
    fn available(library: TemplateLibrary, source: LibrarySource) -> Self {
        Self {
            library,
            source,
            status: LibraryStatus::Available,
        }
    }

    fn unavailable(source: LibrarySource, err: LibraryError) -> Self {
        warn!(source = %source, error = %err, "Template library unavailable");
        Self {
            library: TemplateLibrary::empty(),
            source,
            status: LibraryStatus::Unavailable {
                reason: err.to_string(),
            },
        }
    }
}

/// Load the library from `source`, degrading to empty on any failure.
pub async fn load(source: LibrarySource, fetch_timeout: Duration) -> LoadedLibrary {
    let result = match &source {
        LibrarySource::Bundled => Ok(bundled::bundled_library()),
        LibrarySource::File(path) => loader::load_file(path),
        LibrarySource::Url(url) => loader::fetch(url, fetch_timeout).await,
    };
    match result {
        Ok(library) => LoadedLibrary::available(library, source),
        Err(e) => LoadedLibrary::unavailable(source, e),
    }
}
