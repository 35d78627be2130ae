//! Explicit session state owned by the presentation layer.
//!
//! The session holds the template library, the KVP map parsed from the
//! current text, the filter text and the selection. Every input change goes
//! through a method here, which recomputes the selection:
//!
//! - an explicit selection is kept while it is still in the filtered list;
//! - otherwise the first satisfiable template of the filtered list is chosen.
//!
//! While the text has a parse error the map is empty and nothing is selected.

use crate::kvp::{parse_with, ParseOptions};
use crate::matcher::{self, TemplateStatus};
use crate::render::render;
use kqlassist_types::{AssistError, AssistResult, KvpMap, ParseError, Template, TemplateLibrary};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    None,
    Auto(String),
    Explicit(String),
}

impl Selection {
    fn id(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Auto(id) | Self::Explicit(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    library: TemplateLibrary,
    options: ParseOptions,
    kvp_text: String,
    kvp: KvpMap,
    parse_error: Option<ParseError>,
    filter: String,
    selection: Selection,
}

impl Session {
    pub fn new(library: TemplateLibrary, options: ParseOptions) -> Self {
        let mut session = Self {
            library,
            options,
            kvp_text: String::new(),
            kvp: KvpMap::with_key_case(options.key_case),
            parse_error: None,
            filter: String::new(),
            selection: Selection::None,
        };
        session.recompute();
        session
    }

    pub fn library(&self) -> &TemplateLibrary {
        &self.library
    }

    /// Replace the library. A selection whose id is gone is dropped.
    pub fn set_library(&mut self, library: TemplateLibrary) {
        self.library = library;
        if let Some(id) = self.selection.id() {
            if !self.library.contains(id) {
                debug!(template = id, "Selected template no longer in library");
                self.selection = Selection::None;
            }
        }
        self.recompute();
    }

    /// Re-parse the KVP text. On a parse error the map is emptied and nothing
    /// is selected until the next successful parse.
    pub fn set_kvp_text(&mut self, text: &str) -> Result<(), ParseError> {
        self.kvp_text = text.to_string();
        let result = match parse_with(text, self.options) {
            Ok(kvp) => {
                self.kvp = kvp;
                self.parse_error = None;
                Ok(())
            }
            Err(e) => {
                debug!(line = e.line, "KVP text rejected, clearing map");
                self.kvp = KvpMap::with_key_case(self.options.key_case);
                self.parse_error = Some(e);
                Err(e)
            }
        };
        self.recompute();
        result
    }

    pub fn set_filter(&mut self, filter: &str) {
        self.filter = filter.to_string();
        self.recompute();
    }

    /// Explicitly select a template from the filtered list.
    pub fn select(&mut self, id: &str) -> AssistResult<()> {
        let visible = matcher::filter_library(self.library.templates(), &self.filter);
        if !visible.iter().any(|t| t.id == id) {
            return Err(AssistError::UnknownTemplate(id.to_string()));
        }
        self.selection = Selection::Explicit(id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
        self.recompute();
    }

    pub fn kvp_text(&self) -> &str {
        &self.kvp_text
    }

    pub fn kvp(&self) -> &KvpMap {
        &self.kvp
    }

    pub fn parse_error(&self) -> Option<&ParseError> {
        self.parse_error.as_ref()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// The active template; `None` while the KVP text has a parse error.
    pub fn selected(&self) -> Option<&Template> {
        if self.parse_error.is_some() {
            return None;
        }
        self.selection.id().and_then(|id| self.library.get(id))
    }

    pub fn is_explicit_selection(&self) -> bool {
        matches!(self.selection, Selection::Explicit(_))
    }

    /// Filtered templates with their missing keys.
    pub fn statuses(&self) -> Vec<TemplateStatus<'_>> {
        matcher::annotate(self.library.templates(), &self.filter, &self.kvp)
    }

    /// Rendered, unencoded text of the selected template.
    pub fn preview(&self) -> Option<String> {
        self.selected().map(|t| render(&t.body, &self.kvp))
    }

    fn recompute(&mut self) {
        let visible = matcher::filter_library(self.library.templates(), &self.filter);

        if let Selection::Explicit(id) = &self.selection {
            if visible.iter().any(|t| &t.id == id) {
                return;
            }
        }

        self.selection = visible
            .iter()
            .find(|t| matcher::is_satisfiable(t, &self.kvp))
            .map(|t| Selection::Auto(t.id.clone()))
            .unwrap_or(Selection::None);
    }
}
