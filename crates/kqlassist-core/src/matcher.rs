//! Template matching: which templates the current KVPs satisfy.

use kqlassist_types::{KvpMap, Template};

/// Required keys that are absent or mapped to an empty string, in declared order.
pub fn missing_keys(template: &Template, kvp: &KvpMap) -> Vec<String> {
    template
        .required_keys
        .iter()
        .filter(|k| kvp.get(k).map_or(true, str::is_empty))
        .cloned()
        .collect()
}

pub fn is_satisfiable(template: &Template, kvp: &KvpMap) -> bool {
    missing_keys(template, kvp).is_empty()
}

/// Case-insensitive substring match on name or id. Empty search keeps everything.
pub fn filter_library<'a>(library: &'a [Template], search: &str) -> Vec<&'a Template> {
    if search.is_empty() {
        return library.iter().collect();
    }
    let q = search.to_lowercase();
    library
        .iter()
        .filter(|t| t.name.to_lowercase().contains(&q) || t.id.to_lowercase().contains(&q))
        .collect()
}

/// A filtered template paired with the keys it still needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateStatus<'a> {
    pub template: &'a Template,
    pub missing: Vec<String>,
}

impl TemplateStatus<'_> {
    pub fn is_satisfiable(&self) -> bool {
        self.missing.is_empty()
    }

    /// List label: the name, plus `(missing: ...)` when not satisfiable.
    pub fn label(&self) -> String {
        if self.missing.is_empty() {
            self.template.name.clone()
        } else {
            format!("{}  (missing: {})", self.template.name, self.missing.join(", "))
        }
    }
}

pub fn annotate<'a>(library: &'a [Template], search: &str, kvp: &KvpMap) -> Vec<TemplateStatus<'a>> {
    filter_library(library, search)
        .into_iter()
        .map(|template| TemplateStatus {
            template,
            missing: missing_keys(template, kvp),
        })
        .collect()
}

/// One-line description of a template's requirements against the current KVPs.
pub fn requirement_summary(template: &Template, kvp: &KvpMap) -> String {
    if template.required_keys.is_empty() {
        return "required: (none)".to_string();
    }
    let required = template.required_keys.join(", ");
    let missing = missing_keys(template, kvp);
    if missing.is_empty() {
        format!("required: {required}")
    } else {
        format!("required: {required} (missing: {})", missing.join(", "))
    }
}
