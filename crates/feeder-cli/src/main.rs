use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use feeder_cli::{config, format};
use feeder_core::DeviceClient;

mod cli;
mod commands;

use cli::{Cli, Commands, ScheduleAction};
use commands::{
    CommandContext, cmd_camera, cmd_config, cmd_feed, cmd_log, cmd_schedule, cmd_status,
};
use config::{Config, resolve_timeout, resolve_url};
use format::FormatOptions;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "feeder", &mut io::stdout());
        return Ok(());
    }

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let config = Config::load();
    let url = resolve_url(cli.url.as_deref(), &config);
    let timeout = resolve_timeout(cli.timeout, &config);
    let format = cli.output.resolve_format();

    let command = match cli.command {
        #[cfg(feature = "tui")]
        None | Some(Commands::Tui) => {
            feeder_cli::tui::init_file_logging(filter)?;
            let options = feeder_cli::tui::TuiOptions {
                url,
                timeout,
                panel: config.panel_config(),
            };
            return feeder_cli::tui::run(options).await;
        }
        #[cfg(not(feature = "tui"))]
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
        Some(Commands::Config { action }) => {
            return cmd_config(action, format);
        }
        Some(command) => command,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let client = DeviceClient::with_timeout(&url, timeout)
        .with_context(|| format!("Invalid feeder URL '{}'", url))?;
    tracing::debug!("Using feeder at {}", client.base_url());

    // Colors only make sense on a terminal.
    let no_color = cli.no_color || cli.output.output.is_some() || !io::stdout().is_terminal();
    let ctx = CommandContext {
        client,
        format,
        output: cli.output.output.clone(),
        opts: FormatOptions {
            no_color,
            compact: cli.output.compact,
        },
        quiet: cli.quiet,
    };

    match command {
        Commands::Status => cmd_status(&ctx).await,
        Commands::Feed { size } => {
            let size = size.unwrap_or_else(|| config.panel_config().default_feed_size);
            cmd_feed(&ctx, size).await
        }
        Commands::Schedule { action } => {
            cmd_schedule(&ctx, action.unwrap_or(ScheduleAction::List)).await
        }
        Commands::Log { limit } => cmd_log(&ctx, limit).await,
        Commands::Camera => cmd_camera(&ctx).await,
        // Dispatched above.
        Commands::Config { .. } | Commands::Completions { .. } => Ok(()),
        #[cfg(feature = "tui")]
        Commands::Tui => Ok(()),
    }
}
