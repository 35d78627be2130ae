//! Compile-time embedded default template library.

use crate::loader;
use kqlassist_types::TemplateLibrary;
use tracing::warn;

/// Raw JSON of the bundled library.
pub const BUNDLED_LIBRARY_JSON: &str = include_str!("../bundled/library.json");

/// The bundled templates: device, network and file event lookups.
pub fn bundled_library() -> TemplateLibrary {
    match loader::from_json_str(BUNDLED_LIBRARY_JSON) {
        Ok(lib) => lib,
        Err(e) => {
            warn!("Failed to parse bundled template library: {e}");
            TemplateLibrary::empty()
        }
    }
}
