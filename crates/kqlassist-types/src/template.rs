//! Query templates and the ordered library that holds them.

use serde::{Deserialize, Serialize};

/// A named KQL body with declared required keys and `{{key}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Unique identifier within a library.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Keys that must be present with a non-empty value before submission.
    #[serde(default)]
    pub required_keys: Vec<String>,
    /// Query text containing zero or more placeholders.
    pub body: String,
}

impl Template {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        required_keys: impl IntoIterator<Item = impl Into<String>>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            required_keys: required_keys.into_iter().map(Into::into).collect(),
            body: body.into(),
        }
    }
}

/// Ordered, id-unique sequence of templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TemplateLibrary {
    templates: Vec<Template>,
}

impl TemplateLibrary {
    /// Build a library, dropping later templates whose id repeats an earlier one.
    pub fn new(templates: impl IntoIterator<Item = Template>) -> Self {
        let mut out: Vec<Template> = Vec::new();
        for t in templates {
            if !out.iter().any(|existing| existing.id == t.id) {
                out.push(t);
            }
        }
        Self { templates: out }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl<'a> IntoIterator for &'a TemplateLibrary {
    type Item = &'a Template;
    type IntoIter = std::slice::Iter<'a, Template>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_keep_first() {
        let lib = TemplateLibrary::new(vec![
            Template::new("a", "First", ["x"], "A"),
            Template::new("b", "Second", Vec::<String>::new(), "B"),
            Template::new("a", "Shadow", ["y"], "C"),
        ]);
        assert_eq!(lib.len(), 2);
        assert_eq!(lib.get("a").unwrap().name, "First");
        let ids: Vec<_> = lib.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn empty_library() {
        let lib = TemplateLibrary::empty();
        assert!(lib.is_empty());
        assert!(!lib.contains("anything"));
    }
}
