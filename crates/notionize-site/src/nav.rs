//! Navigation order from the build system's `nav` configuration.

use std::collections::HashMap;

use crate::node::SiteNode;

/// Sibling ranking taken from the configured navigation.
///
/// Maps output paths (`guide/install/index.html`) to their position in the
/// flattened nav. Nodes missing from the nav sort after ranked ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavOrder {
    ranks: HashMap<String, usize>,
}

impl NavOrder {
    /// Build from nav source paths (`guide/install.md`).
    ///
    /// With `use_directory_urls`, `guide/install.md` renders to
    /// `guide/install/index.html`; otherwise to `guide/install.html`.
    /// `index.md` and `README.md` always render to the directory's `index.html`.
    ///
    /// ```
    /// use notionize_site::NavOrder;
    ///
    /// let order = NavOrder::from_source_paths(["index.md", "guide/install.md"], true);
    /// assert_eq!(order.rank("guide/install/index.html"), Some(1));
    /// assert_eq!(order.rank("guide/install.html"), None);
    /// ```
    pub fn from_source_paths<I, S>(paths: I, use_directory_urls: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ranks = HashMap::new();
        for (rank, source) in paths.into_iter().enumerate() {
            if let Some(output) = output_path(source.as_ref(), use_directory_urls) {
                ranks.entry(output).or_insert(rank);
            }
        }
        Self { ranks }
    }

    /// True when no navigation was configured.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Nav position of an output path.
    pub fn rank(&self, output_path: &str) -> Option<usize> {
        self.ranks.get(output_path).copied()
    }

    /// Rank of a node: its own position, else the best rank among its descendants.
    fn node_rank(&self, node: &SiteNode) -> Option<usize> {
        self.rank(&node.path)
            .into_iter()
            .chain(node.children.iter().filter_map(|c| self.node_rank(c)))
            .min()
    }

    /// Sort siblings: ranked nodes in nav order, then the rest in their current order.
    pub(crate) fn sort(&self, nodes: &mut [SiteNode]) {
        if self.is_empty() {
            return;
        }
        nodes.sort_by_cached_key(|n| self.node_rank(n).map_or((1, 0), |r| (0, r)));
    }
}

/// Output HTML path for a nav source path. `None` for non-markdown entries.
fn output_path(source: &str, use_directory_urls: bool) -> Option<String> {
    let source = source.trim_start_matches("./").trim_start_matches('/');
    let stem = source.strip_suffix(".md")?;
    let (dir, name) = match stem.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, stem),
    };
    let prefix = dir.map(|d| format!("{d}/")).unwrap_or_default();

    let output = if name.eq_ignore_ascii_case("index") || name.eq_ignore_ascii_case("readme") {
        format!("{prefix}index.html")
    } else if use_directory_urls {
        format!("{prefix}{name}/index.html")
    } else {
        format!("{prefix}{name}.html")
    };
    Some(output)
}
