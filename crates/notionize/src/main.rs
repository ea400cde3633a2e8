//! notionize CLI - publish generated documentation sites to Notion.
//!
//! Provides commands for:
//! - `deploy`: Publish the built site under the configured Notion page
//! - `preview`: Show the page tree that `deploy` would publish

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{DeployArgs, PreviewArgs};
use output::{Output, Tone};

/// notionize - publish documentation sites to Notion.
#[derive(Parser)]
#[command(name = "notionize", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish the generated site to Notion.
    Deploy(DeployArgs),
    /// Show the page tree without publishing.
    Preview(PreviewArgs),
}

impl Cli {
    /// Log filter: `--verbose` enables INFO, `--quiet` only errors,
    /// otherwise `RUST_LOG` or WARN.
    fn log_filter(&self) -> EnvFilter {
        match &self.command {
            Commands::Deploy(args) if args.verbose => EnvFilter::new("info"),
            Commands::Deploy(args) if args.quiet => EnvFilter::new("error"),
            _ => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_filter())
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Deploy(args) => args.execute(),
        Commands::Preview(args) => args.execute(),
    };

    if let Err(err) = result {
        output.line(Tone::Error, &format!("Error: {err}"));
        std::process::exit(1);
    }
}
