//! Page tree discovery over a generated site directory.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use notionize_blocks::Document;
use notionize_config::DEFAULT_EXCLUDE;
use tracing::{debug, info, info_span, warn};

use crate::error::WalkError;
use crate::nav::NavOrder;
use crate::node::{PageContent, SiteNode};
use crate::title::title_from_path;

const INDEX_FILE: &str = "index.html";

/// Builds the page tree of a generated site.
///
/// A directory's `index.html` is the page for that directory and the
/// directory's other pages are its children. A directory without one becomes
/// a virtual page when it has anything to publish.
///
/// # Example
///
/// ```no_run
/// use notionize_site::{NavOrder, SiteWalker};
///
/// let roots = SiteWalker::new("site")
///     .site_name("My Docs")
///     .nav_order(NavOrder::from_source_paths(["index.md", "guide.md"], true))
///     .walk()?;
/// for node in roots.iter().flat_map(|r| r.iter()) {
///     println!("{} -> {}", node.path, node.title);
/// }
/// # Ok::<(), notionize_site::WalkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SiteWalker {
    site_dir: PathBuf,
    exclude: Vec<String>,
    nav_order: NavOrder,
    site_name: Option<String>,
}

/// Compiled walk state.
struct Walk<'a> {
    walker: &'a SiteWalker,
    exclude: Vec<Pattern>,
}

impl SiteWalker {
    /// Create a walker with the default exclusions.
    pub fn new(site_dir: impl Into<PathBuf>) -> Self {
        Self {
            site_dir: site_dir.into(),
            exclude: DEFAULT_EXCLUDE.iter().map(|p| (*p).to_owned()).collect(),
            nav_order: NavOrder::default(),
            site_name: None,
        }
    }

    /// Replace the exclusion patterns.
    ///
    /// Patterns are globs matched against `/`-separated paths relative to the
    /// site root. A pattern without `/` also matches an entry's name at any
    /// depth, so `404.html` excludes `guide/404.html` too.
    #[must_use]
    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Order siblings by the configured navigation.
    #[must_use]
    pub fn nav_order(mut self, order: NavOrder) -> Self {
        self.nav_order = order;
        self
    }

    /// Fallback title for the site's home page.
    #[must_use]
    pub fn site_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = Some(name.into());
        self
    }

    /// Walk the site directory and build the page tree.
    ///
    /// Returns a single root when the site has an `index.html`, else the
    /// top-level pages.
    pub fn walk(&self) -> Result<Vec<SiteNode>, WalkError> {
        if !self.site_dir.is_dir() {
            return Err(WalkError::SiteDirNotFound(self.site_dir.clone()));
        }

        let exclude = self
            .exclude
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| WalkError::Pattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let walk = Walk {
            walker: self,
            exclude,
        };

        let (index, children) = walk.read_dir(&self.site_dir, "")?;
        let roots = match index {
            Some(path) => match walk.load_page(&path, INDEX_FILE) {
                Some((title, content)) => vec![SiteNode {
                    path: INDEX_FILE.to_owned(),
                    title,
                    content,
                    children,
                }],
                None => children,
            },
            None => children,
        };

        let pages: usize = roots.iter().map(|r| 1 + r.descendant_count()).sum();
        info!(site_dir = %self.site_dir.display(), pages, "Site walked");
        Ok(roots)
    }
}

impl Walk<'_> {
    fn is_excluded(&self, rel: &str, name: &str) -> bool {
        self.exclude
            .iter()
            .any(|p| p.matches(rel) || (!p.as_str().contains('/') && p.matches(name)))
    }

    /// List a directory: its `index.html` (if any) and its child nodes, ordered.
    fn read_dir(
        &self,
        dir: &Path,
        rel: &str,
    ) -> Result<(Option<PathBuf>, Vec<SiteNode>), WalkError> {
        let entries = fs::read_dir(dir).map_err(|source| WalkError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut entries: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|e| {
                let is_dir = e.file_type().is_ok_and(|t| t.is_dir());
                let name = e.file_name().to_string_lossy().into_owned();
                (e.path(), name, is_dir)
            })
            .collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1));

        let mut index = None;
        let mut children = Vec::new();
        for (path, name, is_dir) in entries {
            if name.starts_with('.') {
                continue;
            }
            let child_rel = if rel.is_empty() {
                name.clone()
            } else {
                format!("{rel}/{name}")
            };
            if self.is_excluded(&child_rel, &name) {
                debug!(path = %child_rel, "Excluded");
                continue;
            }

            if is_dir {
                if let Some(node) = self.dir_node(&path, &child_rel) {
                    children.push(node);
                }
            } else if name == INDEX_FILE {
                index = Some(path);
            } else if Path::new(&name).extension().is_some_and(|e| e == "html")
                && let Some(node) = self.page_node(&path, &child_rel)
            {
                children.push(node);
            }
        }

        self.walker.nav_order.sort(&mut children);
        Ok((index, children))
    }

    /// Node for a subdirectory, or `None` when it has nothing to publish.
    fn dir_node(&self, dir: &Path, rel: &str) -> Option<SiteNode> {
        let (index, children) = match self.read_dir(dir, rel) {
            Ok(listing) => listing,
            Err(err) => {
                warn!(path = rel, error = %err, "Skipping unreadable directory");
                return None;
            }
        };

        if let Some(index) = index {
            let index_rel = format!("{rel}/{INDEX_FILE}");
            return match self.load_page(&index, &index_rel) {
                Some((title, content)) => Some(SiteNode {
                    path: index_rel,
                    title,
                    content,
                    children,
                }),
                None => Some(virtual_node(rel, children)),
            };
        }

        (!children.is_empty()).then(|| virtual_node(rel, children))
    }

    /// Node for an HTML page, or `None` when it cannot be read.
    fn page_node(&self, path: &Path, rel: &str) -> Option<SiteNode> {
        let (title, content) = self.load_page(path, rel)?;
        Some(SiteNode {
            path: rel.to_owned(),
            title,
            content,
            children: Vec::new(),
        })
    }

    /// Read, title and convert one page inside its own span.
    fn load_page(&self, path: &Path, rel: &str) -> Option<(String, PageContent)> {
        let _span = info_span!("page", path = rel).entered();

        let html = match fs::read_to_string(path) {
            Ok(html) => html,
            Err(source) => {
                let err = WalkError::Read {
                    path: path.to_path_buf(),
                    source,
                };
                warn!(error = %err, "Skipping unreadable page");
                return None;
            }
        };

        let doc = Document::parse(&html);
        let title = doc
            .first_heading()
            .or_else(|| doc.title_text())
            .or_else(|| title_from_path(rel))
            .unwrap_or_else(|| self.home_title());

        let content = match doc.to_blocks() {
            Ok(blocks) => PageContent::Blocks(blocks),
            Err(err) => {
                warn!(error = %err, "Page content cannot be converted");
                PageContent::Failed(err)
            }
        };
        Some((title, content))
    }

    fn home_title(&self) -> String {
        self.walker
            .site_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| "Home".to_owned(), str::to_owned)
    }
}

fn virtual_node(rel: &str, children: Vec<SiteNode>) -> SiteNode {
    debug!(path = rel, "Virtual page for directory without index");
    SiteNode {
        path: rel.to_owned(),
        title: title_from_path(rel).unwrap_or_else(|| rel.to_owned()),
        content: PageContent::Virtual,
        children,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use notionize_blocks::{Block, HeadingLevel};
    use pretty_assertions::assert_eq;

    use super::*;

    fn write(root: &Path, rel: &str, html: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, html).unwrap();
    }

    fn paths(nodes: &[SiteNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.path.as_str()).collect()
    }

    #[test]
    fn test_missing_site_dir() {
        let temp = tempfile::tempdir().unwrap();
        let err = SiteWalker::new(temp.path().join("nope")).walk().unwrap_err();
        assert!(matches!(err, WalkError::SiteDirNotFound(_)));
    }

    #[test]
    fn test_root_index_is_single_root() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "index.html", "<h1>Welcome</h1><p>Hi</p>");
        write(temp.path(), "about.html", "<h1>About</h1>");
        write(temp.path(), "guide/index.html", "<h1>Guide</h1>");
        write(temp.path(), "guide/install.html", "<h1>Install</h1>");

        let roots = SiteWalker::new(temp.path()).walk().unwrap();
        assert_eq!(paths(&roots), ["index.html"]);
        let home = &roots[0];
        assert_eq!(home.title, "Welcome");
        assert_eq!(
            home.blocks(),
            [
                Block::heading(HeadingLevel::H1, "Welcome"),
                Block::paragraph("Hi")
            ]
        );
        assert_eq!(paths(&home.children), ["about.html", "guide/index.html"]);
        assert_eq!(paths(&home.children[1].children), ["guide/install.html"]);
    }

    #[test]
    fn test_without_root_index_top_level_are_roots() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "b.html", "<h1>B</h1>");
        write(temp.path(), "a.html", "<h1>A</h1>");

        let roots = SiteWalker::new(temp.path()).walk().unwrap();
        assert_eq!(paths(&roots), ["a.html", "b.html"]);
    }

    #[test]
    fn test_default_exclusions() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "404.html", "<h1>Not found</h1>");
        write(temp.path(), "page.html", "<h1>Page</h1>");
        write(temp.path(), "search/search_index.html", "<p>x</p>");
        write(temp.path(), "search.html", "<p>x</p>");

        let roots = SiteWalker::new(temp.path()).walk().unwrap();
        assert_eq!(paths(&roots), ["page.html"]);
    }

    #[test]
    fn test_default_exclusions_at_any_depth() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "guide/404.html", "<h1>Not found</h1>");
        write(temp.path(), "guide/page.html", "<h1>Page</h1>");
        write(temp.path(), "guide/search.html", "<p>x</p>");
        write(temp.path(), "guide/search/results.html", "<p>kept</p>");

        let roots = SiteWalker::new(temp.path()).walk().unwrap();
        let all: Vec<&str> = roots
            .iter()
            .flat_map(SiteNode::iter)
            .map(|n| n.path.as_str())
            .collect();
        assert_eq!(
            all,
            ["guide", "guide/page.html", "guide/search", "guide/search/results.html"]
        );
    }

    #[test]
    fn test_custom_exclusions_are_recursive() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "drafts/a.html", "<p>a</p>");
        write(temp.path(), "drafts/deep/b.html", "<p>b</p>");
        write(temp.path(), "keep.html", "<p>k</p>");

        let roots = SiteWalker::new(temp.path())
            .exclude(["drafts/*"])
            .walk()
            .unwrap();
        assert_eq!(paths(&roots), ["keep.html"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let temp = tempfile::tempdir().unwrap();
        let err = SiteWalker::new(temp.path())
            .exclude(["[unclosed"])
            .walk()
            .unwrap_err();
        assert!(matches!(err, WalkError::Pattern { .. }));
    }

    #[test]
    fn test_virtual_directory_node() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "user-guide/setup.html", "<h1>Setup</h1>");
        fs::create_dir_all(temp.path().join("assets/css")).unwrap();
        fs::write(temp.path().join("assets/css/theme.css"), "body {}").unwrap();

        let roots = SiteWalker::new(temp.path()).walk().unwrap();
        assert_eq!(paths(&roots), ["user-guide"]);
        assert!(roots[0].is_virtual());
        assert_eq!(roots[0].title, "User Guide");
        assert_eq!(paths(&roots[0].children), ["user-guide/setup.html"]);
    }

    #[test]
    fn test_title_fallbacks() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "index.html", "<p>no heading</p>");
        write(
            temp.path(),
            "titled.html",
            "<head><title>From Title - Docs</title></head><p>x</p>",
        );
        write(temp.path(), "setup-guide.html", "<p>x</p>");

        let roots = SiteWalker::new(temp.path())
            .site_name("My Docs")
            .walk()
            .unwrap();
        assert_eq!(roots[0].title, "My Docs");
        let titles: Vec<&str> = roots[0].children.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["Setup Guide", "From Title"]);

        let roots = SiteWalker::new(temp.path()).walk().unwrap();
        assert_eq!(roots[0].title, "Home");
    }

    #[test]
    fn test_nav_order() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "index.html", "<h1>Home</h1>");
        write(temp.path(), "alpha/index.html", "<h1>Alpha</h1>");
        write(temp.path(), "beta/index.html", "<h1>Beta</h1>");
        write(temp.path(), "gamma/index.html", "<h1>Gamma</h1>");

        let order = NavOrder::from_source_paths(["index.md", "gamma.md", "alpha.md"], true);
        let roots = SiteWalker::new(temp.path()).nav_order(order).walk().unwrap();
        assert_eq!(
            paths(&roots[0].children),
            ["gamma/index.html", "alpha/index.html", "beta/index.html"]
        );
    }

    #[test]
    fn test_conversion_failure_is_kept() {
        let temp = tempfile::tempdir().unwrap();
        let cells = "<td>x</td>".repeat(notionize_blocks::MAX_TABLE_WIDTH + 1);
        write(
            temp.path(),
            "wide.html",
            &format!("<h1>Wide</h1><table><tr>{cells}</tr></table>"),
        );

        let roots = SiteWalker::new(temp.path()).walk().unwrap();
        assert_eq!(roots[0].title, "Wide");
        assert!(matches!(roots[0].content, PageContent::Failed(_)));
        assert!(roots[0].blocks().is_empty());
    }

    #[test]
    fn test_non_html_and_hidden_files_ignored() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), ".hidden.html", "<p>x</p>");
        write(temp.path(), "sitemap.xml", "<urlset/>");
        write(temp.path(), "page.html", "<p>x</p>");

        let roots = SiteWalker::new(temp.path()).walk().unwrap();
        assert_eq!(paths(&roots), ["page.html"]);
    }
}
