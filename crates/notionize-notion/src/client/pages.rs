//! Page operations for Notion API.

use notionize_blocks::RichText;
use serde_json::{Value, json};
use tracing::info;

use super::NotionClient;
use crate::error::NotionError;

impl NotionClient {
    /// Create an empty page under `parent_id`, returning the new page id.
    pub(crate) fn create_child_page(
        &self,
        parent_id: &str,
        title: &str,
    ) -> Result<String, NotionError> {
        let url = format!("{}/pages", self.base_url);
        let payload = page_payload(parent_id, title);

        info!(parent_id, title, "Creating page");

        let response = self.send(self.agent.post(&url), &payload)?;
        let id = page_id(&response)?;

        info!(page_id = %id, title, "Created page");
        Ok(id)
    }
}

/// Request body for `POST /pages`.
fn page_payload(parent_id: &str, title: &str) -> Value {
    json!({
        "parent": { "page_id": parent_id },
        "properties": {
            "title": { "title": RichText::plain(title).to_json() }
        }
    })
}

/// Extract the `id` of a created page object.
fn page_id(response: &Value) -> Result<String, NotionError> {
    response
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| NotionError::UnexpectedResponse("page response without id".to_owned()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_page_payload() {
        let payload = page_payload("parent-id", "Install");
        assert_eq!(
            payload,
            json!({
                "parent": { "page_id": "parent-id" },
                "properties": {
                    "title": {
                        "title": [{ "type": "text", "text": { "content": "Install" } }]
                    }
                }
            })
        );
    }

    #[test]
    fn test_page_id() {
        let response = json!({ "object": "page", "id": "abc" });
        assert_eq!(page_id(&response).unwrap(), "abc");
        assert!(matches!(
            page_id(&json!({ "object": "page" })),
            Err(NotionError::UnexpectedResponse(_))
        ));
    }
}
