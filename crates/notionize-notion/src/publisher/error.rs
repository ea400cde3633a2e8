//! Error types for page publishing.

use notionize_blocks::ConvertError;

use crate::error::NotionError;

/// Reason a single page could not be published.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    /// Page content cannot be represented as Notion blocks.
    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    /// Notion API error, after retries.
    #[error("Notion API error: {0}")]
    Notion(#[from] NotionError),
}
