//! Command implementations by domain.

pub mod config;
pub mod kvp;
pub mod payload;
pub mod query;
pub mod templates;

use crate::cli::KvpArgs;
use crate::ui;
use kqlassist_core::{ParseOptions, Session};
use kqlassist_library::{LibraryStatus, LoadedLibrary};
use kqlassist_types::{AssistConfig, AssistError};
use std::io::{IsTerminal, Read};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Configuration and template library resolved from the global flags.
pub struct Context {
    pub config: AssistConfig,
    pub loaded: LoadedLibrary,
}

impl Context {
    pub fn load(config_path: Option<&Path>, library: Option<String>) -> Self {
        let mut config = kqlassist_core::config::load_config(config_path);
        if library.is_some() {
            config.library = library;
        }

        let timeout = Duration::from_secs(config.fetch_timeout_secs);
        debug!(source = %config.library_source(), ?timeout, "Loading template library");
        let loaded = runtime().block_on(kqlassist_library::load(config.library_source(), timeout));
        if let LibraryStatus::Unavailable { reason } = &loaded.status {
            ui::check_warn(&format!(
                "Template library unavailable ({}): {reason}",
                loaded.source
            ));
        }

        Self { config, loaded }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new(self.config.key_case)
    }

    /// A session over the loaded library with KVP input and filter applied.
    pub fn session(&self, kvp: &KvpArgs, filter: Option<&str>) -> Session {
        let mut session = Session::new(self.loaded.library.clone(), self.parse_options());
        if let Err(e) = session.set_kvp_text(&read_kvp_text(kvp)) {
            fail(&AssistError::from(e));
        }
        if let Some(filter) = filter {
            session.set_filter(filter);
        }
        session
    }
}

pub fn runtime() -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            ui::error(&format!("Failed to start async runtime: {e}"));
            std::process::exit(1);
        }
    }
}

fn read_stdin() -> String {
    let mut text = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut text) {
        fail(&AssistError::Io(e));
    }
    text
}

/// KVP text from `--kvp-file`, piped stdin, then `--set` lines.
pub fn read_kvp_text(args: &KvpArgs) -> String {
    let mut text = match &args.kvp_file {
        Some(path) if path.as_os_str() == "-" => read_stdin(),
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                ui::error(&format!("Cannot read {}: {e}", path.display()));
                std::process::exit(1);
            }
        },
        None if args.set.is_empty() && !std::io::stdin().is_terminal() => read_stdin(),
        None => String::new(),
    };
    append_set_lines(&mut text, &args.set);
    text
}

fn append_set_lines(text: &mut String, lines: &[String]) {
    for line in lines {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(line);
    }
}

/// Report an error with a fix suggestion where there is one, then exit 1.
pub fn fail(err: &AssistError) -> ! {
    let msg = err.to_string();
    match err {
        AssistError::MissingTenant => ui::error_with_fix(
            &msg,
            "pass --tenant <tid>, --page-url '<url with ?tid=...>', or set KQLASSIST_TENANT",
        ),
        AssistError::MissingRequiredKeys(keys) => ui::error_with_fix(
            &msg,
            &format!("add {} with --set key=value", keys.join(", ")),
        ),
        AssistError::NoTemplateSelected => ui::error_with_fix(
            &msg,
            "name a template id, or run `kqlassist templates` to see which are satisfiable",
        ),
        AssistError::UnknownTemplate(_) => {
            ui::error_with_fix(&msg, "run `kqlassist templates` to list template ids")
        }
        AssistError::EncodingUnavailable => {
            ui::error_with_fix(&msg, "build kqlassist-core with the `gzip` feature")
        }
        _ => ui::error(&msg),
    }
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_lines_appended_after_file_text() {
        let mut text = "tid=abc".to_string();
        append_set_lines(&mut text, &["ip=1.2.3.4".into(), "device=H".into()]);
        assert_eq!(text, "tid=abc\nip=1.2.3.4\ndevice=H");

        let mut text = "tid=abc\n".to_string();
        append_set_lines(&mut text, &["ip=1".into()]);
        assert_eq!(text, "tid=abc\nip=1");

        let mut text = String::new();
        append_set_lines(&mut text, &["ip=1".into()]);
        assert_eq!(text, "ip=1");
    }

    #[test]
    fn kvp_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inputs.txt");
        std::fs::write(&path, "device=HOST\n").unwrap();
        let args = KvpArgs {
            kvp_file: Some(path),
            set: vec!["ip=1.2.3.4".into()],
        };
        assert_eq!(read_kvp_text(&args), "device=HOST\nip=1.2.3.4");
    }
}
