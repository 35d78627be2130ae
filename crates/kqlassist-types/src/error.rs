//! Shared error types for kqlassist.

use std::fmt;
use thiserror::Error;

/// Why a KVP line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorReason {
    /// The line has no `=` separator.
    MissingSeparator,
    /// The text left of the first `=` is blank.
    EmptyKey,
}

impl fmt::Display for ParseErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => write!(f, "missing '=' (expected key=value)"),
            Self::EmptyKey => write!(f, "empty key"),
        }
    }
}

/// A malformed KVP line. `line` is 1-based.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Line {line}: {reason}")]
pub struct ParseError {
    pub line: usize,
    pub reason: ParseErrorReason,
}

impl ParseError {
    pub fn new(line: usize, reason: ParseErrorReason) -> Self {
        Self { line, reason }
    }
}

/// Coarse classification of an [`AssistError`], for presentation layers that
/// branch on the kind rather than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    NoTemplateSelected,
    UnknownTemplate,
    MissingRequiredKeys,
    MissingTenant,
    EncodingUnavailable,
    Encoding,
    InvalidUrl,
    Superseded,
    Config,
    Io,
}

/// Top-level error type for the assistant core.
#[derive(Error, Debug)]
pub enum AssistError {
    /// A KVP line could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Submission attempted with no template chosen.
    #[error("Select a template first")]
    NoTemplateSelected,

    /// The requested template id is not in the (filtered) library.
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// The selected template is not satisfiable by the current KVPs.
    #[error("Missing required keys: {}", .0.join(", "))]
    MissingRequiredKeys(Vec<String>),

    /// No tenant id could be resolved.
    #[error("Missing tenant id. Provide tid in the page URL (?tid=...) or as a KVP line (tid=...)")]
    MissingTenant,

    /// No compression backend is available in this build.
    #[error("gzip compression is not available in this environment")]
    EncodingUnavailable,

    /// Compression or payload decoding failed.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A base or page URL did not parse.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A newer submission started while this one was encoding.
    #[error("Submission superseded by a newer one")]
    Superseded,

    /// A configuration error occurred.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssistError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::Parse,
            Self::NoTemplateSelected => ErrorKind::NoTemplateSelected,
            Self::UnknownTemplate(_) => ErrorKind::UnknownTemplate,
            Self::MissingRequiredKeys(_) => ErrorKind::MissingRequiredKeys,
            Self::MissingTenant => ErrorKind::MissingTenant,
            Self::EncodingUnavailable => ErrorKind::EncodingUnavailable,
            Self::Encoding(_) => ErrorKind::Encoding,
            Self::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Self::Superseded => ErrorKind::Superseded,
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether the user can fix this by editing input, as opposed to changing
    /// the environment the tool runs in.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::EncodingUnavailable | Self::Encoding(_) | Self::Io(_)
        )
    }
}

/// Alias for Result with AssistError.
pub type AssistResult<T> = Result<T, AssistError>;
