//! Clap CLI definitions for kqlassist.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const AFTER_HELP: &str = "\
\x1b[1;36mExamples:\x1b[0m
  kqlassist templates --set ip=1.2.3.4          List templates, marking the satisfiable ones
  kqlassist render network_events_by_ip --set ip=1.2.3.4
                                                Preview the filled-in query
  kqlassist submit --kvp-file inputs.txt --tenant <tid> --open
                                                Open the query in Advanced Hunting
  kqlassist decode '<payload or console URL>'   Show the query inside a payload
  kqlassist kvp from-url '<console URL>'        Turn URL parameters into KVP lines

\x1b[1;36mInputs:\x1b[0m
  KVP lines come from --kvp-file (use - for stdin), --set key=value, or piped stdin.";

/// kqlassist: fill KQL templates from key=value input and open them in
/// Microsoft 365 Defender Advanced Hunting.
#[derive(Parser)]
#[command(name = "kqlassist", version, after_help = AFTER_HELP)]
pub struct Cli {
    /// Path to config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Template library: "bundled", a JSON file path, or an http(s) URL.
    #[arg(long, global = true)]
    pub library: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where KVP text comes from.
#[derive(Args, Debug, Default, Clone)]
pub struct KvpArgs {
    /// Read key=value lines from a file ("-" for stdin).
    #[arg(long, value_name = "PATH")]
    pub kvp_file: Option<PathBuf>,

    /// Add a key=value line (repeatable; applied after --kvp-file).
    #[arg(long = "set", short = 's', value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List templates with their missing keys.
    Templates {
        /// Case-insensitive filter on name or id.
        #[arg(long, short)]
        filter: Option<String>,
        #[command(flatten)]
        kvp: KvpArgs,
        /// Output as JSON for scripting.
        #[arg(long)]
        json: bool,
    },
    /// Render a template with the given KVPs (no encoding).
    Render {
        /// Template id; defaults to the first satisfiable template.
        id: Option<String>,
        /// Case-insensitive filter on name or id.
        #[arg(long, short)]
        filter: Option<String>,
        #[command(flatten)]
        kvp: KvpArgs,
    },
    /// Render, encode and print the Advanced Hunting URL.
    Submit {
        /// Template id; defaults to the first satisfiable template.
        id: Option<String>,
        /// Case-insensitive filter on name or id.
        #[arg(long, short)]
        filter: Option<String>,
        #[command(flatten)]
        kvp: KvpArgs,
        /// Page URL to take the tenant id (?tid=...) from.
        #[arg(long)]
        page_url: Option<String>,
        /// Tenant id (overrides KQLASSIST_TENANT and --page-url).
        #[arg(long)]
        tenant: Option<String>,
        /// Open the URL in the default browser.
        #[arg(long)]
        open: bool,
        /// Output as JSON for scripting.
        #[arg(long)]
        json: bool,
    },
    /// Decode a query payload (or a console URL carrying one).
    Decode {
        /// Base64 payload or full Advanced Hunting URL.
        payload: String,
    },
    /// KVP helpers [*].
    #[command(subcommand)]
    Kvp(KvpCommands),
    /// Show configuration [*].
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum KvpCommands {
    /// Print a URL's query parameters as key=value lines.
    FromUrl {
        /// Page URL.
        url: String,
    },
    /// Parse KVP input and print the normalized lines.
    Check {
        #[command(flatten)]
        kvp: KvpArgs,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration.
    Show,
    /// Print the config file path.
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_submit_flags() {
        let cli = Cli::try_parse_from([
            "kqlassist",
            "submit",
            "network_events_by_ip",
            "--set",
            "ip=1.2.3.4",
            "-s",
            "device=HOST",
            "--tenant",
            "t-1",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Submit {
                id,
                kvp,
                tenant,
                json,
                open,
                ..
            } => {
                assert_eq!(id.as_deref(), Some("network_events_by_ip"));
                assert_eq!(kvp.set, vec!["ip=1.2.3.4", "device=HOST"]);
                assert_eq!(tenant.as_deref(), Some("t-1"));
                assert!(json);
                assert!(!open);
            }
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn global_library_flag() {
        let cli = Cli::try_parse_from(["kqlassist", "templates", "--library", "./lib.json"]).unwrap();
        assert_eq!(cli.library.as_deref(), Some("./lib.json"));
    }
}
