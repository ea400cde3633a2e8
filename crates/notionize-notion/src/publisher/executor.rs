//! Publisher implementation.

use notionize_blocks::{Block, MAX_REQUEST_BLOCKS};
use notionize_site::{PageContent, SiteNode};
use tracing::{info, info_span, warn};

use super::PublishConfig;
use super::error::PublishError;
use super::navigation::navigation_blocks;
use super::result::{PageFailure, PublishReport, PublishedPage, SkippedPage};
use crate::NotionApi;

/// Publishes page trees to Notion.
pub struct Publisher<'a> {
    api: &'a dyn NotionApi,
    config: PublishConfig,
}

impl<'a> Publisher<'a> {
    /// Create a new publisher.
    #[must_use]
    pub fn new(api: &'a dyn NotionApi, config: PublishConfig) -> Self {
        Self { api, config }
    }

    /// Create one page under `parent_id` and append its blocks.
    ///
    /// Blocks are appended in order, in batches of at most `batch_size`
    /// blocks and [`MAX_REQUEST_BLOCKS`] block objects counting nested ones.
    /// Virtual pages are created empty. Pages whose content failed to
    /// convert are not created.
    pub fn publish_page(
        &self,
        node: &SiteNode,
        parent_id: &str,
    ) -> Result<PublishedPage, PageFailure> {
        let failure = |page_id: Option<String>, error: PublishError| PageFailure {
            path: node.path.clone(),
            title: node.title.clone(),
            page_id,
            error,
        };

        if let PageContent::Failed(err) = &node.content {
            return Err(failure(None, err.clone().into()));
        }

        let retry = &self.config.retry;
        let page_id = retry
            .run("create_page", || self.api.create_page(parent_id, &node.title))
            .map_err(|err| failure(None, err.into()))?;

        let blocks = node.blocks();
        let mut append_calls = 0;
        for batch in batches(blocks, self.config.batch_size) {
            retry
                .run("append_blocks", || self.api.append_blocks(&page_id, batch))
                .map_err(|err| failure(Some(page_id.clone()), err.into()))?;
            append_calls += 1;
        }

        info!(
            page_id = %page_id,
            blocks = blocks.len(),
            calls = append_calls,
            "Published page"
        );

        Ok(PublishedPage {
            id: page_id,
            parent_id: parent_id.to_owned(),
            path: node.path.clone(),
            title: node.title.clone(),
            blocks_appended: blocks.len(),
            append_calls,
        })
    }

    /// Publish every tree under `parent_id`, depth-first, parents first.
    ///
    /// A failed page is recorded and its descendants are skipped; siblings
    /// and other branches continue.
    pub fn publish(&self, roots: &[SiteNode], parent_id: &str) -> PublishReport {
        let mut report = PublishReport::default();
        for root in roots {
            self.publish_tree(root, parent_id, &mut report);
        }

        info!(
            published = report.published.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            "Publishing finished"
        );
        report
    }

    fn publish_tree(&self, node: &SiteNode, parent_id: &str, report: &mut PublishReport) {
        let span = info_span!("page", path = %node.path);
        let result = span.in_scope(|| self.publish_page(node, parent_id));

        match result {
            Ok(page) => {
                let page_id = page.id.clone();
                report.published.push(page);
                for child in &node.children {
                    self.publish_tree(child, &page_id, report);
                }
            }
            Err(failure) => {
                let skipped = node.descendant_count();
                warn!(
                    path = %failure.path,
                    error = %failure.error,
                    skipped,
                    "Failed to publish page"
                );
                report.skipped.extend(node.iter().skip(1).map(|d| SkippedPage {
                    path: d.path.clone(),
                    title: d.title.clone(),
                    failed_ancestor: node.path.clone(),
                }));
                report.failed.push(failure);
            }
        }
    }

    /// Append previous/next links to every published page.
    ///
    /// Neighbours follow publication order. Failures are logged and counted
    /// in the report; they never fail the run.
    pub fn append_navigation(&self, report: &mut PublishReport) {
        let pages = &report.published;
        let mut failures = 0;

        for (idx, page) in pages.iter().enumerate() {
            let prev = idx.checked_sub(1).and_then(|i| pages.get(i));
            let next = pages.get(idx + 1);
            let blocks = navigation_blocks(prev, next);
            if blocks.is_empty() {
                continue;
            }

            let result = self
                .config
                .retry
                .run("append_navigation", || self.api.append_blocks(&page.id, &blocks));
            if let Err(err) = result {
                warn!(page_id = %page.id, path = %page.path, error = %err, "Failed to append navigation");
                failures += 1;
            }
        }

        report.navigation_failures += failures;
    }
}

/// Split `blocks` into consecutive append requests.
///
/// A block larger than [`MAX_REQUEST_BLOCKS`] on its own is sent alone.
fn batches(blocks: &[Block], batch_size: usize) -> Vec<&[Block]> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::new();
    let mut start = 0;
    let mut elements = 0;

    for (idx, block) in blocks.iter().enumerate() {
        let size = block.element_count();
        if idx > start && (idx - start == batch_size || elements + size > MAX_REQUEST_BLOCKS) {
            batches.push(&blocks[start..idx]);
            start = idx;
            elements = 0;
        }
        elements += size;
    }
    if start < blocks.len() {
        batches.push(&blocks[start..]);
    }
    batches
}
