//! Site publisher for Notion.
//!
//! This module provides the [`Publisher`] struct that mirrors a page tree into
//! Notion:
//!
//! 1. Create each page under its parent, parents before children
//! 2. Append the page's blocks in ordered batches
//! 3. Record failures and skip the failed page's descendants
//! 4. Optionally link every page to its neighbours in publication order
//!
//! # Example
//!
//! ```ignore
//! use notionize_notion::{NotionClient, PublishConfig, Publisher};
//! use notionize_site::SiteWalker;
//!
//! let client = NotionClient::new("https://api.notion.com/v1", "secret_...");
//! let roots = SiteWalker::new("site").walk()?;
//!
//! let publisher = Publisher::new(&client, PublishConfig::default());
//! let mut report = publisher.publish(&roots, "0123abcd-...");
//! publisher.append_navigation(&mut report);
//! println!("{} pages published", report.published.len());
//! ```

mod error;
mod executor;
mod navigation;
mod result;

pub use error::PublishError;
pub use executor::Publisher;
pub use navigation::{navigation_blocks, page_url};
pub use result::{PageFailure, PublishReport, PublishedPage, SkippedPage};

use notionize_config::{MAX_BATCH_SIZE, NotionConfig};

use crate::retry::RetryPolicy;

/// Configuration for publishing a page tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    /// Blocks per append call (1..=100).
    pub batch_size: usize,
    /// Retry behaviour for every API call.
    pub retry: RetryPolicy,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            batch_size: MAX_BATCH_SIZE,
            retry: RetryPolicy::default(),
        }
    }
}

impl From<&NotionConfig> for PublishConfig {
    fn from(config: &NotionConfig) -> Self {
        Self {
            batch_size: config.batch_size.clamp(1, MAX_BATCH_SIZE),
            retry: RetryPolicy::from_config(config),
        }
    }
}
