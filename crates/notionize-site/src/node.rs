//! Page tree nodes.

use notionize_blocks::{Block, ConvertError};

/// Content of a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// Converted blocks of an HTML page.
    Blocks(Vec<Block>),
    /// The page exists but its content cannot be represented in Notion.
    Failed(ConvertError),
    /// Directory without an `index.html`. Published as an empty page.
    Virtual,
}

/// One published unit: an HTML page or a virtual directory page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteNode {
    /// `/`-separated path relative to the site root
    /// (`guide/install.html`, `guide/index.html`, or `guide` for a virtual node).
    pub path: String,
    /// Page title.
    pub title: String,
    /// Page content.
    pub content: PageContent,
    /// Child pages, in publication order.
    pub children: Vec<SiteNode>,
}

impl SiteNode {
    /// True for directories without an `index.html`.
    pub fn is_virtual(&self) -> bool {
        matches!(self.content, PageContent::Virtual)
    }

    /// Blocks to append. Empty for virtual and failed pages.
    pub fn blocks(&self) -> &[Block] {
        match &self.content {
            PageContent::Blocks(blocks) => blocks,
            PageContent::Failed(_) | PageContent::Virtual => &[],
        }
    }

    /// Number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    /// Iterate over this node and all descendants, depth-first, pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &SiteNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(path: &str, children: Vec<SiteNode>) -> SiteNode {
        SiteNode {
            path: path.to_owned(),
            title: path.to_owned(),
            content: PageContent::Virtual,
            children,
        }
    }

    #[test]
    fn test_descendant_count() {
        let tree = node("a", vec![node("b", vec![node("c", vec![])]), node("d", vec![])]);
        assert_eq!(tree.descendant_count(), 3);
        assert_eq!(tree.children[1].descendant_count(), 0);
    }

    #[test]
    fn test_iter_pre_order() {
        let tree = node("a", vec![node("b", vec![node("c", vec![])]), node("d", vec![])]);
        let paths: Vec<&str> = tree.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_blocks_empty_for_virtual() {
        assert!(node("a", vec![]).blocks().is_empty());
        assert!(node("a", vec![]).is_virtual());
    }
}
