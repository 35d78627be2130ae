//! Template substitution and Advanced Hunting payload encoding.
//!
//! Pipeline: [`kvp::parse`] builds the key/value map, [`matcher`] decides which
//! templates it satisfies, [`render::render`] fills placeholders,
//! [`payload::PayloadEncoder`] produces the `query` parameter and
//! [`destination::build`] assembles the console URL. [`session::Session`]
//! and [`submit::Submitter`] tie these together for a presentation layer.

pub mod config;
pub mod destination;
pub mod kvp;
pub mod matcher;
pub mod payload;
pub mod render;
pub mod session;
pub mod submit;

pub use kvp::{parse, parse_with, ParseOptions};
pub use matcher::{filter_library, is_satisfiable, missing_keys, TemplateStatus};
pub use payload::{decode_payload, PayloadEncoder};
pub use render::render;
pub use session::Session;
pub use submit::{PreparedSubmission, Submission, Submitter};
