//! `notionize preview` command implementation.
//!
//! Walks and converts the generated site exactly as `deploy` would, without
//! contacting Notion.

use std::path::PathBuf;

use clap::Args;
use notionize_config::{CliSettings, Config, DEFAULT_EXCLUDE};
use notionize_site::{NavOrder, PageContent, SiteNode, SiteWalker};

use crate::error::CliError;
use crate::output::{Output, Tone};

/// Arguments for the preview command.
#[derive(Args)]
pub(crate) struct PreviewArgs {
    /// Path to configuration file (default: auto-discover mkdocs.yml).
    #[arg(short = 'f', long)]
    config_file: Option<PathBuf>,

    /// Generated site directory (overrides `site_dir`).
    #[arg(long)]
    site_dir: Option<PathBuf>,
}

impl PreviewArgs {
    /// Execute the preview command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the site cannot
    /// be walked.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            site_dir: self.site_dir,
            ..Default::default()
        };
        let config = Config::load(self.config_file.as_deref(), Some(&cli_settings))?;
        let exclude: Vec<String> = config.notion.as_ref().map_or_else(
            || DEFAULT_EXCLUDE.iter().map(|p| (*p).to_owned()).collect(),
            |n| n.exclude.clone(),
        );

        let roots = SiteWalker::new(&config.site_dir)
            .exclude(exclude)
            .nav_order(NavOrder::from_source_paths(
                &config.nav,
                config.use_directory_urls,
            ))
            .site_name(&config.site_name)
            .walk()?;

        let site_dir = config.site_dir.display();
        output.line(Tone::Heading, &format!("Page tree for {site_dir}:"));
        let mut failures = 0;
        for line in render_tree(&roots) {
            if line.failed {
                failures += 1;
            }
            let tone = if line.failed { Tone::Warning } else { Tone::Plain };
            output.line(tone, &line.text);
        }

        let pages: usize = roots.iter().map(|r| 1 + r.descendant_count()).sum();
        let summary = format!("\n{pages} page(s), {failures} with conversion errors.");
        output.line(Tone::Success, &summary);
        Ok(())
    }
}

/// One rendered line of the page tree.
struct TreeLine {
    text: String,
    failed: bool,
}

fn render_tree(roots: &[SiteNode]) -> Vec<TreeLine> {
    let mut lines = Vec::new();
    for root in roots {
        render_node(root, 0, &mut lines);
    }
    lines
}

fn render_node(node: &SiteNode, depth: usize, lines: &mut Vec<TreeLine>) {
    let indent = "  ".repeat(depth);
    let (detail, failed) = match &node.content {
        PageContent::Blocks(blocks) => (format!("{} blocks", blocks.len()), false),
        PageContent::Virtual => ("virtual".to_owned(), false),
        PageContent::Failed(err) => (format!("error: {err}"), true),
    };
    lines.push(TreeLine {
        text: format!("{indent}{} [{}] ({detail})", node.title, node.path),
        failed,
    });
    for child in &node.children {
        render_node(child, depth + 1, lines);
    }
}
