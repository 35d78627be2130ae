//! JSON normalization and loading of template libraries.
//!
//! Accepted record shape (all fields optional, extra fields ignored):
//!
//! ```json
//! { "id": "...", "name": "...", "requiredKeys": ["..."], "template": "..." }
//! ```
//!
//! `requiredKvps` and `required_keys` are accepted for `requiredKeys`, and
//! `body` for `template`.

use crate::{LibraryError, LibraryResult};
use kqlassist_types::{Template, TemplateLibrary};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

const REQUIRED_KEY_FIELDS: &[&str] = &["requiredKeys", "requiredKvps", "required_keys"];
const BODY_FIELDS: &[&str] = &["template", "body"];

fn field_str(obj: &serde_json::Map<String, Value>, name: &str) -> Option<String> {
    let s = match obj.get(name)? {
        Value::String(s) => s.clone(),
        Value::Null => return None,
        other => other.to_string(),
    };
    (!s.is_empty()).then_some(s)
}

fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

fn normalize_record(value: &Value) -> Option<Template> {
    let obj = value.as_object()?;

    let name = field_str(obj, "name");
    let id = field_str(obj, "id").or_else(|| name.as_deref().map(slug))?;
    if id.is_empty() {
        return None;
    }
    let body = BODY_FIELDS.iter().find_map(|f| field_str(obj, f))?;

    let required_keys = REQUIRED_KEY_FIELDS
        .iter()
        .find_map(|f| obj.get(*f).and_then(Value::as_array))
        .map(|arr| {
            arr.iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    Some(Template {
        name: name.unwrap_or_else(|| id.clone()),
        id,
        required_keys,
        body,
    })
}

/// Normalize a parsed JSON document. Anything other than an array yields an
/// empty library; records with no usable id or an empty body are dropped.
pub fn normalize(doc: &Value) -> TemplateLibrary {
    let Some(items) = doc.as_array() else {
        debug!("Library document is not an array");
        return TemplateLibrary::empty();
    };
    let templates: Vec<Template> = items.iter().filter_map(normalize_record).collect();
    if templates.len() != items.len() {
        debug!(
            dropped = items.len() - templates.len(),
            "Dropped library records without id or body"
        );
    }
    TemplateLibrary::new(templates)
}

pub fn from_json_str(json: &str) -> LibraryResult<TemplateLibrary> {
    let doc: Value = serde_json::from_str(json).map_err(|e| LibraryError::Json(e.to_string()))?;
    Ok(normalize(&doc))
}

pub fn load_file(path: &Path) -> LibraryResult<TemplateLibrary> {
    let contents = std::fs::read_to_string(path)?;
    let library = from_json_str(&contents)?;
    info!(path = %path.display(), count = library.len(), "Loaded template library");
    Ok(library)
}

/// Fetch a library document once. No retries.
pub async fn fetch(url: &str, timeout: Duration) -> LibraryResult<TemplateLibrary> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("kqlassist/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| LibraryError::Http(format!("build client: {e}")))?;

    let resp = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| LibraryError::Http(format!("fetch {url}: {e}")))?;

    if !resp.status().is_success() {
        return Err(LibraryError::Http(format!(
            "fetch {url} returned status {}",
            resp.status()
        )));
    }

    let doc: Value = resp
        .json()
        .await
        .map_err(|e| LibraryError::Json(format!("parse {url}: {e}")))?;
    let library = normalize(&doc);
    info!(url, count = library.len(), "Fetched template library");
    Ok(library)
}
