use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mdt_cli::commands::timeline;
use mdt_cli::{Cli, Commands, Config};

/// Opens the output sink: append-create the given file, else stdout.
fn open_output(path: Option<&Path>) -> Result<BufWriter<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        Some(path) => Box::new(
            OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .with_context(|| format!("failed to open output file {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    Ok(BufWriter::new(sink))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support; events go to stdout,
    // so diagnostics are kept on stderr.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;

    // Command-line credentials take precedence over config and environment
    if cli.cookie.is_some() {
        config.cookie = cli.cookie.clone();
    }
    if cli.xsrf.is_some() {
        config.xsrf_token = cli.xsrf.clone();
    }
    tracing::debug!(?config, "loaded configuration");

    match &cli.command {
        Some(Commands::Timeline(args)) => {
            let mut writer = open_output(cli.output.as_deref())?;
            // Flush even when the export fails partway; events already
            // streamed stay written.
            let result = timeline::run(&mut writer, args, &config);
            let flushed = writer.flush().context("failed to flush output");
            result.and(flushed)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
