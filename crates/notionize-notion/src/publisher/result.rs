//! Result types for publishing operations.

use super::error::PublishError;

/// A page created in Notion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPage {
    /// Notion page id.
    pub id: String,
    /// Notion id of the parent page.
    pub parent_id: String,
    /// Source path relative to the site directory.
    pub path: String,
    /// Page title.
    pub title: String,
    /// Number of blocks appended.
    pub blocks_appended: usize,
    /// Number of append calls made.
    pub append_calls: usize,
}

/// A page that could not be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    /// Source path relative to the site directory.
    pub path: String,
    /// Page title.
    pub title: String,
    /// Id of the page if it was created before the failure.
    pub page_id: Option<String>,
    /// What went wrong.
    pub error: PublishError,
}

/// A page not attempted because an ancestor failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPage {
    /// Source path relative to the site directory.
    pub path: String,
    /// Page title.
    pub title: String,
    /// Path of the failed ancestor.
    pub failed_ancestor: String,
}

/// Outcome of publishing a site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Created pages, in publication order (depth-first).
    pub published: Vec<PublishedPage>,
    /// Pages that failed.
    pub failed: Vec<PageFailure>,
    /// Descendants of failed pages.
    pub skipped: Vec<SkippedPage>,
    /// Pages whose navigation links could not be appended.
    pub navigation_failures: usize,
}

impl PublishReport {
    /// True when every page was published.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    /// Total blocks appended across all pages, excluding navigation.
    pub fn blocks_appended(&self) -> usize {
        self.published.iter().map(|p| p.blocks_appended).sum()
    }
}
