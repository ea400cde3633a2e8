//! Error types for block conversion.

/// Error that makes a page impossible to represent as Notion blocks.
///
/// Unsupported tags are not errors: they are skipped and logged. These
/// variants are raised when dropping content would silently change the page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// Table has more columns than a Notion table row can hold.
    #[error("table has {width} columns, Notion accepts at most {max}")]
    TableTooWide {
        /// Number of columns in the widest row.
        width: usize,
        /// Maximum supported width.
        max: usize,
    },

    /// Table has more rows than one block request can create.
    #[error("table has {rows} rows, Notion accepts at most {max} per table")]
    TableTooLong {
        /// Number of rows in the table.
        rows: usize,
        /// Maximum supported row count.
        max: usize,
    },
    /// Text needs more rich text objects than one block accepts.
    #[error("text needs {objects} rich text objects, Notion accepts at most {max} per block")]
    RichTextTooLong {
        /// Text objects after splitting long spans.
        objects: usize,
        /// Maximum objects in a `rich_text` array.
        max: usize,
    },

    /// List item has more nested blocks than one `children` array holds.
    #[error("list item has {children} nested blocks, Notion accepts at most {max}")]
    TooManyChildren {
        /// Direct children of the item.
        children: usize,
        /// Maximum entries in a `children` array.
        max: usize,
    },

    /// Block and everything nested in it exceed one append request.
    #[error("block contains {blocks} blocks including nested ones, Notion accepts at most {max} per request")]
    BlockTooLarge {
        /// Block objects, the block itself included.
        blocks: usize,
        /// Maximum block objects per request.
        max: usize,
    },
}
