//! Block operations for Notion API.

use notionize_blocks::Block;
use serde_json::json;
use tracing::info;

use super::NotionClient;
use crate::error::NotionError;

impl NotionClient {
    /// Append blocks to the end of a page, in order.
    ///
    /// The API accepts at most 100 blocks per call; callers batch.
    pub(crate) fn append_children(&self, page_id: &str, blocks: &[Block]) -> Result<(), NotionError> {
        let url = format!("{}/blocks/{}/children", self.base_url, page_id);
        let payload = json!({ "children": blocks });

        info!(page_id, count = blocks.len(), "Appending blocks");

        self.send(self.agent.patch(&url), &payload)?;
        Ok(())
    }
}
