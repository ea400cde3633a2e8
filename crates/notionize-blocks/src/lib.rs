//! HTML to Notion block conversion.
//!
//! Parses generated documentation pages with html5ever and maps their main
//! content onto the block kinds the Notion API accepts:
//!
//! | HTML | Block |
//! |------|-------|
//! | `h1`, `h2`, `h3`-`h6` | `heading_1`, `heading_2`, `heading_3` |
//! | `p` | `paragraph` |
//! | `blockquote` | `quote` |
//! | `ul > li`, `ol > li` | `bulleted_list_item`, `numbered_list_item` |
//! | `pre`, `div.highlight`, `table.highlighttable` | `code` |
//! | `table` | `table` with `table_row` children |
//! | `hr` | `divider` |
//!
//! Other elements are skipped but their children are still converted.
//! Content that cannot fit Notion's request limits (arrays of at most
//! [`MAX_ARRAY_LENGTH`] entries, [`MAX_REQUEST_BLOCKS`] blocks per request)
//! fails with a [`ConvertError`] instead of being truncated.
//!
//! # Example
//!
//! ```
//! use notionize_blocks::parse_html;
//!
//! let doc = parse_html(
//!     r#"<title>Install - Docs</title><div role="main"><h1>Install</h1><p>Run it.</p></div>"#,
//! );
//! assert_eq!(doc.first_heading().as_deref(), Some("Install"));
//! assert_eq!(doc.title_text().as_deref(), Some("Install"));
//! assert_eq!(doc.to_blocks().unwrap().len(), 2);
//! ```

mod block;
mod dom;
mod error;
mod language;
mod mapper;
mod rich_text;

pub use block::{Block, HeadingLevel, ListItem, MAX_ARRAY_LENGTH, MAX_REQUEST_BLOCKS, Table};
pub use dom::{Document, parse_html};
pub use error::ConvertError;
pub use language::notion_language;
pub use mapper::{
    MAX_LIST_DEPTH, MAX_TABLE_ROWS, MAX_TABLE_WIDTH, convert_children, convert_html, convert_node,
};
pub use markup5ever_rcdom::Handle;
pub use rich_text::{Annotations, MAX_TEXT_LENGTH, RichText, TextSpan};
