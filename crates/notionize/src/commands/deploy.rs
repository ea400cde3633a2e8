//! `notionize deploy` command implementation.

use std::path::PathBuf;

use clap::Args;
use notionize_config::{CliSettings, Config};
use notionize_notion::{BuildOutput, NotionPlugin, PublishReport, page_url};
use tracing::info;

use crate::error::CliError;
use crate::output::{Output, Tone};

/// Arguments for the deploy command.
#[derive(Args)]
pub(crate) struct DeployArgs {
    /// Path to configuration file (default: auto-discover mkdocs.yml).
    #[arg(short = 'f', long)]
    config_file: Option<PathBuf>,

    /// Generated site directory (overrides `site_dir`).
    #[arg(long)]
    site_dir: Option<PathBuf>,

    /// Notion integration token (overrides `notion_token`).
    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log progress of every page.
    #[arg(short, long, conflicts_with = "quiet")]
    pub(crate) verbose: bool,

    /// Only print errors.
    #[arg(short, long)]
    pub(crate) quiet: bool,
}

impl DeployArgs {
    /// Execute the deploy command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the site cannot be
    /// walked, or any page failed to publish.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            site_dir: self.site_dir.clone(),
            notion_token: self.token.clone(),
        };
        let config = Config::load(self.config_file.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            info!(path = %path.display(), "Loaded configuration");
        }
        let plugin = NotionPlugin::on_config(config.require_notion()?)?;
        let build = BuildOutput::from_config(&config);

        if !self.quiet {
            let site_dir = build.site_dir.display();
            output.line(Tone::Plain, &format!("Publishing {site_dir} to Notion..."));
        }

        let report = plugin.on_post_build(&build)?;
        if !self.quiet {
            for (tone, line) in report_lines(&report) {
                output.line(tone, &line);
            }
        }

        if report.is_success() {
            Ok(())
        } else {
            Err(CliError::Publish(format!(
                "{} page(s) failed, {} skipped",
                report.failed.len(),
                report.skipped.len()
            )))
        }
    }
}

/// Summary of a publishing run, one styled line each.
fn report_lines(report: &PublishReport) -> Vec<(Tone, String)> {
    let mut lines: Vec<(Tone, String)> = report
        .published
        .iter()
        .map(|page| (Tone::Detail, format!("  {} -> {}", page.path, page_url(&page.id))))
        .collect();

    if let Some(first) = report.published.first() {
        let root = format!("\nDocumentation root: {}", page_url(&first.id));
        lines.push((Tone::Heading, root));
    }
    for failure in &report.failed {
        let line = format!("  Failed: {} ({})", failure.path, failure.error);
        lines.push((Tone::Error, line));
    }
    for skipped in &report.skipped {
        let line = format!(
            "  Skipped: {} (parent {} failed)",
            skipped.path, skipped.failed_ancestor
        );
        lines.push((Tone::Warning, line));
    }
    if report.navigation_failures > 0 {
        let line = format!(
            "Navigation links missing on {} page(s)",
            report.navigation_failures
        );
        lines.push((Tone::Warning, line));
    }

    let summary = format!(
        "\nPublished {} page(s), {} block(s).",
        report.published.len(),
        report.blocks_appended()
    );
    lines.push((Tone::Success, summary));
    lines
}
