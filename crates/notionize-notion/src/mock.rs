//! In-memory Notion workspace for testing.
//!
//! Provides [`MockNotion`], a [`NotionApi`] that records every call and can
//! be scripted to fail.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use notionize_blocks::Block;

use crate::NotionApi;
use crate::error::NotionError;

/// A page created in the mock workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockPage {
    pub id: String,
    pub parent_id: String,
    pub title: String,
    pub blocks: Vec<Block>,
}

/// One API call, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    CreatePage { parent_id: String, title: String },
    /// `count` top-level blocks carrying `elements` block objects in total.
    AppendBlocks {
        page_id: String,
        count: usize,
        elements: usize,
    },
}

/// Mock Notion API for testing.
///
/// # Example
///
/// ```ignore
/// use notionize_notion::{MockNotion, NotionApi, NotionError};
///
/// let notion = MockNotion::new()
///     .with_append_error(NotionError::RateLimited { retry_after: None });
///
/// let id = notion.create_page("parent", "Guide").unwrap();
/// assert!(notion.append_blocks(&id, &[]).is_err());
/// assert!(notion.append_blocks(&id, &[]).is_ok());
/// ```
#[derive(Debug, Default)]
pub struct MockNotion {
    pages: RwLock<Vec<MockPage>>,
    calls: RwLock<Vec<MockCall>>,
    create_errors: RwLock<VecDeque<NotionError>>,
    append_errors: RwLock<VecDeque<NotionError>>,
    failing_titles: RwLock<HashMap<String, NotionError>>,
}

impl MockNotion {
    /// Create an empty mock workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next page creation with `error`. Queued errors are used in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_create_error(self, error: NotionError) -> Self {
        self.create_errors.write().unwrap().push_back(error);
        self
    }

    /// Fail the next block append with `error`. Queued errors are used in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_append_error(self, error: NotionError) -> Self {
        self.append_errors.write().unwrap().push_back(error);
        self
    }

    /// Fail every creation of a page titled `title`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failing_title(self, title: impl Into<String>, error: NotionError) -> Self {
        self.failing_titles
            .write()
            .unwrap()
            .insert(title.into(), error);
        self
    }

    /// Pages created so far, in creation order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn pages(&self) -> Vec<MockPage> {
        self.pages.read().unwrap().clone()
    }

    /// All calls received, including failed ones.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.read().unwrap().clone()
    }

    /// Page with the given title.
    pub fn page_by_title(&self, title: &str) -> Option<MockPage> {
        self.pages().into_iter().find(|p| p.title == title)
    }

    /// Pages created directly under `parent_id`, in creation order.
    pub fn children_of(&self, parent_id: &str) -> Vec<MockPage> {
        self.pages()
            .into_iter()
            .filter(|p| p.parent_id == parent_id)
            .collect()
    }
}

impl NotionApi for MockNotion {
    fn create_page(&self, parent_id: &str, title: &str) -> Result<String, NotionError> {
        self.calls.write().unwrap().push(MockCall::CreatePage {
            parent_id: parent_id.to_owned(),
            title: title.to_owned(),
        });

        if let Some(err) = self.failing_titles.read().unwrap().get(title) {
            return Err(err.clone());
        }
        if let Some(err) = self.create_errors.write().unwrap().pop_front() {
            return Err(err);
        }

        let mut pages = self.pages.write().unwrap();
        let id = format!("00000000-0000-4000-8000-{:012x}", pages.len() + 1);
        pages.push(MockPage {
            id: id.clone(),
            parent_id: parent_id.to_owned(),
            title: title.to_owned(),
            blocks: Vec::new(),
        });
        Ok(id)
    }

    fn append_blocks(&self, page_id: &str, blocks: &[Block]) -> Result<(), NotionError> {
        self.calls.write().unwrap().push(MockCall::AppendBlocks {
            page_id: page_id.to_owned(),
            count: blocks.len(),
            elements: blocks.iter().map(Block::element_count).sum(),
        });

        if let Some(err) = self.append_errors.write().unwrap().pop_front() {
            return Err(err);
        }

        let mut pages = self.pages.write().unwrap();
        let page = pages
            .iter_mut()
            .find(|p| p.id == page_id)
            .ok_or_else(|| NotionError::Http {
                status: 404,
                body: format!("Could not find block with ID: {page_id}"),
            })?;
        page.blocks.extend_from_slice(blocks);
        Ok(())
    }
}
