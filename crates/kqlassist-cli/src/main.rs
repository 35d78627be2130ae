//! kqlassist CLI: fill KQL templates from key=value input and open them in
//! Microsoft 365 Defender Advanced Hunting.

mod cli;
mod cmd;
mod ui;

use clap::Parser;
use cli::{Cli, Commands, ConfigCommands, KvpCommands};
use cmd::Context;

/// Trace to stderr so stdout stays clean for queries and URLs.
fn init_tracing_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing_stderr();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Templates { filter, kvp, json } => {
            let ctx = Context::load(config_path, cli.library);
            cmd::templates::cmd_templates(&ctx, filter.as_deref(), &kvp, json);
        }
        Commands::Render { id, filter, kvp } => {
            let ctx = Context::load(config_path, cli.library);
            cmd::query::cmd_render(&ctx, id.as_deref(), filter.as_deref(), &kvp);
        }
        Commands::Submit {
            id,
            filter,
            kvp,
            page_url,
            tenant,
            open,
            json,
        } => {
            let ctx = Context::load(config_path, cli.library);
            cmd::query::cmd_submit(
                &ctx,
                id.as_deref(),
                filter.as_deref(),
                &kvp,
                page_url.as_deref(),
                tenant.as_deref(),
                open,
                json,
            );
        }
        Commands::Decode { payload } => cmd::payload::cmd_decode(&payload),
        Commands::Kvp(sub) => match sub {
            KvpCommands::FromUrl { url } => cmd::kvp::cmd_kvp_from_url(&url),
            KvpCommands::Check { kvp } => {
                let config = kqlassist_core::config::load_config(config_path);
                let options = kqlassist_core::ParseOptions::new(config.key_case);
                cmd::kvp::cmd_kvp_check(options, &kvp);
            }
        },
        Commands::Config(sub) => match sub {
            ConfigCommands::Show => cmd::config::cmd_config_show(config_path),
            ConfigCommands::Path => cmd::config::cmd_config_path(config_path),
        },
    }
}
