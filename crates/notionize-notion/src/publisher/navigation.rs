//! Previous/next links between published pages.

use notionize_blocks::{Annotations, Block, HeadingLevel, RichText};

use super::result::PublishedPage;

const ITALIC: Annotations = Annotations {
    bold: false,
    italic: true,
    strikethrough: false,
    code: false,
};

const BOLD: Annotations = Annotations {
    bold: true,
    italic: false,
    strikethrough: false,
    code: false,
};

/// Public URL of a Notion page.
///
/// ```
/// use notionize_notion::page_url;
///
/// assert_eq!(
///     page_url("01234567-89ab-cdef-0123-456789abcdef"),
///     "https://www.notion.so/0123456789abcdef0123456789abcdef"
/// );
/// ```
pub fn page_url(page_id: &str) -> String {
    format!("https://www.notion.so/{}", page_id.replace('-', ""))
}

/// Blocks linking a page to its neighbours.
///
/// Returns nothing when the page has no neighbours.
pub fn navigation_blocks(prev: Option<&PublishedPage>, next: Option<&PublishedPage>) -> Vec<Block> {
    if prev.is_none() && next.is_none() {
        return Vec::new();
    }

    let mut heading = RichText::new();
    heading.push("Navigation", BOLD, None);

    let mut blocks = vec![
        Block::Divider,
        Block::Heading {
            level: HeadingLevel::H3,
            text: heading,
        },
    ];
    if let Some(page) = prev {
        blocks.push(link_paragraph("← Previous: ", &page.title, &page.id));
    }
    if let Some(page) = next {
        blocks.push(link_paragraph("Next: ", &format!("{} →", page.title), &page.id));
    }
    blocks.push(Block::Divider);
    blocks
}

fn link_paragraph(label: &str, title: &str, page_id: &str) -> Block {
    let mut text = RichText::new();
    text.push(label, ITALIC, None);
    text.push(title, BOLD, Some(&page_url(page_id)));
    Block::Paragraph(text)
}
