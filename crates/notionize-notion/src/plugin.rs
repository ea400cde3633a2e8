//! Build-system plugin entry point.
//!
//! [`NotionPlugin`] validates its configuration when the build is configured
//! and publishes the generated site once the build has finished.

use std::path::PathBuf;

use notionize_config::{Config, ConfigError, NotionConfig};
use notionize_site::{NavOrder, SiteNode, SiteWalker, WalkError};
use tracing::info;

use crate::NotionApi;
use crate::client::NotionClient;
use crate::publisher::{PublishConfig, PublishReport, Publisher};

/// What the build hands to the plugin after generating HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    /// Directory holding the generated site.
    pub site_dir: PathBuf,
    /// Configured site name.
    pub site_name: String,
    /// Navigation source paths, flattened in order.
    pub nav: Vec<String>,
    /// Whether pages render to `name/index.html` rather than `name.html`.
    pub use_directory_urls: bool,
}

impl BuildOutput {
    /// Build output described by a loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            site_dir: config.site_dir.clone(),
            site_name: config.site_name.clone(),
            nav: config.nav.clone(),
            use_directory_urls: config.use_directory_urls,
        }
    }
}

/// Plugin error.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// Missing or invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Site directory could not be walked.
    #[error("Site walk failed: {0}")]
    Walk(#[from] WalkError),
}

/// Publishes a generated site to Notion.
pub struct NotionPlugin<A = NotionClient> {
    config: NotionConfig,
    parent_id: String,
    api: A,
}

impl NotionPlugin<NotionClient> {
    /// Validate configuration and build the HTTP client.
    ///
    /// No network call is made.
    pub fn on_config(config: &NotionConfig) -> Result<Self, PluginError> {
        config.validate()?;
        Self::with_api(config.clone(), NotionClient::from_config(config))
    }
}

impl<A: NotionApi> NotionPlugin<A> {
    /// Plugin over any API implementation.
    pub fn with_api(config: NotionConfig, api: A) -> Result<Self, PluginError> {
        config.validate()?;
        let parent_id = config.parent_page_id().ok_or_else(|| {
            ConfigError::Validation(format!(
                "notion.parent_page_id is not a Notion page id: {}",
                config.parent_page_id
            ))
        })?;
        Ok(Self {
            config,
            parent_id,
            api,
        })
    }

    /// Canonical id of the page everything is published under.
    pub fn parent_id(&self) -> &str {
        &self.parent_id
    }

    /// Build the page tree without publishing.
    pub fn walk(&self, build: &BuildOutput) -> Result<Vec<SiteNode>, PluginError> {
        let roots = SiteWalker::new(&build.site_dir)
            .exclude(self.config.exclude.iter().cloned())
            .nav_order(NavOrder::from_source_paths(
                &build.nav,
                build.use_directory_urls,
            ))
            .site_name(&build.site_name)
            .walk()?;
        Ok(roots)
    }

    /// Publish the generated site under the configured parent page.
    ///
    /// Individual page failures are reported, not returned as errors.
    pub fn on_post_build(&self, build: &BuildOutput) -> Result<PublishReport, PluginError> {
        let roots = self.walk(build)?;
        info!(
            site_dir = %build.site_dir.display(),
            parent_id = %self.parent_id,
            "Publishing site to Notion"
        );

        let publisher = Publisher::new(&self.api, PublishConfig::from(&self.config));
        let mut report = publisher.publish(&roots, &self.parent_id);
        if self.config.navigation_links {
            publisher.append_navigation(&mut report);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    use notionize_blocks::{Block, HeadingLevel};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::NotionError;
    use crate::mock::{MockCall, MockNotion};

    const PARENT: &str = "0123456789abcdef0123456789abcdef";
    const PARENT_DASHED: &str = "01234567-89ab-cdef-0123-456789abcdef";

    fn notion_config() -> NotionConfig {
        NotionConfig {
            notion_token: "secret_test".to_owned(),
            parent_page_id: PARENT.to_owned(),
            navigation_links: false,
            retry_initial_delay_ms: 0,
            retry_max_delay_ms: 0,
            ..NotionConfig::default()
        }
    }

    fn write(root: &Path, rel: &str, html: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, html).unwrap();
    }

    fn page_html(title: &str, body: &str) -> String {
        format!(
            r#"<html><head><title>{title} - Docs</title></head><body>
<nav><ul><li>Menu</li></ul></nav>
<div role="main"><h1>{title}</h1>{body}</div>
</body></html>"#
        )
    }

    fn build(site_dir: &Path) -> BuildOutput {
        BuildOutput {
            site_dir: site_dir.to_path_buf(),
            site_name: "Docs".to_owned(),
            nav: Vec::new(),
            use_directory_urls: true,
        }
    }

    #[test]
    fn test_missing_token_fails_before_any_call() {
        let notion = MockNotion::new();
        let config = NotionConfig {
            notion_token: String::new(),
            ..notion_config()
        };
        let err = NotionPlugin::with_api(config, &notion).err().unwrap();
        assert!(matches!(err, PluginError::Config(ConfigError::Validation(_))));
        assert!(notion.calls().is_empty());
    }

    #[test]
    fn test_missing_parent_fails_before_any_call() {
        let notion = MockNotion::new();
        let config = NotionConfig {
            parent_page_id: String::new(),
            ..notion_config()
        };
        assert!(NotionPlugin::with_api(config, &notion).is_err());
        assert!(notion.calls().is_empty());
    }

    #[test]
    fn test_on_config_builds_client() {
        let plugin = NotionPlugin::on_config(&notion_config()).unwrap();
        assert_eq!(plugin.parent_id(), PARENT_DASHED);
        assert!(NotionPlugin::on_config(&NotionConfig::default()).is_err());
    }

    #[test]
    fn test_missing_site_dir() {
        let temp = tempfile::tempdir().unwrap();
        let notion = MockNotion::new();
        let plugin = NotionPlugin::with_api(notion_config(), &notion).unwrap();
        let err = plugin
            .on_post_build(&build(&temp.path().join("site")))
            .unwrap_err();
        assert!(matches!(err, PluginError::Walk(WalkError::SiteDirNotFound(_))));
        assert!(notion.calls().is_empty());
    }

    #[test]
    fn test_utility_pages_never_published() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "404.html", &page_html("Not Found", ""));
        write(temp.path(), "guide.html", &page_html("Guide", "<p>Read me</p>"));
        write(temp.path(), "search/index.html", &page_html("Search", ""));

        let notion = MockNotion::new();
        let plugin = NotionPlugin::with_api(notion_config(), &notion).unwrap();
        let report = plugin.on_post_build(&build(temp.path())).unwrap();

        assert!(report.is_success());
        let pages = notion.pages();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].title, "Guide");
        assert_eq!(pages[0].parent_id, PARENT_DASHED);
        assert_eq!(
            pages[0].blocks,
            vec![
                Block::heading(HeadingLevel::H1, "Guide"),
                Block::paragraph("Read me")
            ]
        );
        assert!(notion.calls().iter().all(|c| !matches!(
            c,
            MockCall::CreatePage { title, .. } if title == "Not Found" || title == "Search"
        )));
    }

    #[test]
    fn test_site_tree_is_mirrored() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "index.html", &page_html("Welcome", "<p>Hi</p>"));
        write(temp.path(), "install/index.html", &page_html("Install", ""));
        write(temp.path(), "usage/index.html", &page_html("Usage", ""));
        write(temp.path(), "usage/advanced/index.html", &page_html("Advanced", ""));

        let notion = MockNotion::new();
        let plugin = NotionPlugin::with_api(notion_config(), &notion).unwrap();
        let mut output = build(temp.path());
        output.nav = vec![
            "index.md".to_owned(),
            "usage.md".to_owned(),
            "install.md".to_owned(),
        ];
        let report = plugin.on_post_build(&output).unwrap();
        assert_eq!(report.published.len(), 4);

        let home = notion.page_by_title("Welcome").unwrap();
        assert_eq!(home.parent_id, PARENT_DASHED);
        let children: Vec<String> = notion
            .children_of(&home.id)
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(children, ["Usage", "Install"]);

        let usage = notion.page_by_title("Usage").unwrap();
        let advanced = notion.page_by_title("Advanced").unwrap();
        assert_eq!(advanced.parent_id, usage.id);
    }

    #[test]
    fn test_rate_limited_append_completes() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "page.html", &page_html("Page", "<p>One</p><p>Two</p>"));

        let notion = MockNotion::new().with_append_error(NotionError::RateLimited {
            retry_after: Some(Duration::ZERO),
        });
        let plugin = NotionPlugin::with_api(notion_config(), &notion).unwrap();
        let report = plugin.on_post_build(&build(temp.path())).unwrap();

        assert!(report.is_success());
        assert_eq!(notion.page_by_title("Page").unwrap().blocks.len(), 3);
    }

    #[test]
    fn test_failed_branch_is_skipped() {
        let temp = tempfile::tempdir().unwrap();
        let cells = "<td>x</td>".repeat(notionize_blocks::MAX_TABLE_WIDTH + 1);
        write(
            temp.path(),
            "broken/index.html",
            &page_html("Broken", &format!("<table><tr>{cells}</tr></table>")),
        );
        write(temp.path(), "broken/child.html", &page_html("Child", ""));
        write(temp.path(), "fine.html", &page_html("Fine", ""));

        let notion = MockNotion::new();
        let plugin = NotionPlugin::with_api(notion_config(), &notion).unwrap();
        let report = plugin.on_post_build(&build(temp.path())).unwrap();

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].path, "broken/index.html");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, "broken/child.html");
        let titles: Vec<String> = notion.pages().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, ["Fine"]);
    }

    #[test]
    fn test_navigation_links_pass() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "a.html", &page_html("A", ""));
        write(temp.path(), "b.html", &page_html("B", ""));

        let notion = MockNotion::new();
        let config = NotionConfig {
            navigation_links: true,
            ..notion_config()
        };
        let plugin = NotionPlugin::with_api(config, &notion).unwrap();
        let report = plugin.on_post_build(&build(temp.path())).unwrap();
        assert_eq!(report.navigation_failures, 0);

        let a = notion.page_by_title("A").unwrap();
        assert_eq!(a.blocks.last(), Some(&Block::Divider));
        assert_eq!(a.blocks.len(), 5);
    }
}
