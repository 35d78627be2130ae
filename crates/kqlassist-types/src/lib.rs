//! Core types for the kqlassist KQL query assistant.
//!
//! This crate defines the shared data structures used by the parser, the
//! template engine, the payload encoder and the CLI. It contains no business
//! logic.

pub mod config;
pub mod error;
pub mod kvp;
pub mod template;

pub use config::{AssistConfig, LibrarySource};
pub use error::{AssistError, AssistResult, ErrorKind, ParseError, ParseErrorReason};
pub use kvp::{KeyCase, KvpMap};
pub use template::{Template, TemplateLibrary};
