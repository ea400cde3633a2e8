//! Notion integration for notionize.
//!
//! This crate provides:
//! - [`NotionClient`]: sync client for the Notion REST API
//! - [`Publisher`]: mirrors a page tree into Notion with batching and retries
//! - [`NotionPlugin`]: build hook tying configuration, site walking and publishing together
//! - [`MockNotion`]: in-memory API for tests (behind the `mock` feature)
//!
//! Everything that talks to Notion goes through the [`NotionApi`] trait.

mod client;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod plugin;
mod publisher;
mod retry;

pub use client::{NOTION_VERSION, NotionClient};
pub use error::NotionError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCall, MockNotion, MockPage};
pub use plugin::{BuildOutput, NotionPlugin, PluginError};
pub use publisher::{
    PageFailure, PublishConfig, PublishError, PublishReport, PublishedPage, Publisher,
    SkippedPage, navigation_blocks, page_url,
};
pub use retry::RetryPolicy;

use notionize_blocks::Block;

/// Remote operations needed to publish a site.
pub trait NotionApi {
    /// Create an empty page titled `title` under `parent_id`, returning its id.
    fn create_page(&self, parent_id: &str, title: &str) -> Result<String, NotionError>;

    /// Append `blocks` to the end of a page, in order.
    fn append_blocks(&self, page_id: &str, blocks: &[Block]) -> Result<(), NotionError>;
}

impl<T: NotionApi + ?Sized> NotionApi for &T {
    fn create_page(&self, parent_id: &str, title: &str) -> Result<String, NotionError> {
        (**self).create_page(parent_id, title)
    }

    fn append_blocks(&self, page_id: &str, blocks: &[Block]) -> Result<(), NotionError> {
        (**self).append_blocks(page_id, blocks)
    }
}
