//! HTML element to Notion block mapping.
//!
//! Every element is classified into a closed [`Tag`] set. Recognized tags map
//! to blocks; anything else is skipped while its children are still visited,
//! so content nested in theme wrappers (`div`, `section`, admonitions) is kept.

use markup5ever_rcdom::{Handle, NodeData};
use tracing::{debug, warn};

use crate::block::{Block, HeadingLevel, ListItem, Table};
use crate::dom::{
    Document, classes, collect_inline_node, element_children, element_name, find_element,
    find_first, has_class, inline_text, text_content, text_content_except,
};
use crate::error::ConvertError;
use crate::language::{language_from_classes, notion_language};
use crate::rich_text::{Annotations, InlineCollector, RichText};

/// Maximum columns in a Notion table.
pub const MAX_TABLE_WIDTH: usize = 100;

/// Maximum rows in a Notion table created in one request.
pub const MAX_TABLE_ROWS: usize = 100;

/// Deepest list nesting Notion accepts in a single append request.
pub const MAX_LIST_DEPTH: usize = 3;

/// Element names rendered as inline text inside their container.
const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "data", "del", "dfn", "em", "i", "img", "ins",
    "kbd", "mark", "q", "s", "samp", "small", "span", "strike", "strong", "sub", "sup", "time",
    "u", "var", "wbr",
];

/// Classification of an HTML element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Heading(HeadingLevel),
    Paragraph,
    Blockquote,
    BulletedList,
    NumberedList,
    Preformatted,
    Code,
    /// `div.highlight` wrapper around a highlighted `pre`.
    HighlightBlock,
    /// `table.highlighttable`: Pygments code with a line-number column.
    HighlightTable,
    Table,
    Rule,
    /// Scripts and other non-content elements, dropped with their subtree.
    Ignored,
    Unsupported,
}

impl Tag {
    fn of(node: &Handle) -> Option<Self> {
        let name = element_name(node)?;
        let tag = match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Self::Heading(
                name[1..]
                    .parse()
                    .map_or(HeadingLevel::H3, HeadingLevel::from_rank),
            ),
            "p" => Self::Paragraph,
            "blockquote" => Self::Blockquote,
            "ul" => Self::BulletedList,
            "ol" => Self::NumberedList,
            "pre" => Self::Preformatted,
            "code" => Self::Code,
            "div" if has_class(node, "highlight") => Self::HighlightBlock,
            "table" if has_class(node, "highlighttable") => Self::HighlightTable,
            "table" => Self::Table,
            "hr" => Self::Rule,
            "script" | "style" | "template" | "noscript" | "svg" | "button" | "iframe" | "head" => {
                Self::Ignored
            }
            _ => Self::Unsupported,
        };
        Some(tag)
    }
}

/// Parse an HTML document or fragment and map its main content.
///
/// # Example
///
/// ```
/// use notionize_blocks::{Block, HeadingLevel, convert_html};
///
/// let blocks = convert_html("<h1>Intro</h1><p>Hello</p>").unwrap();
/// assert_eq!(
///     blocks,
///     vec![Block::heading(HeadingLevel::H1, "Intro"), Block::paragraph("Hello")]
/// );
/// ```
pub fn convert_html(html: &str) -> Result<Vec<Block>, ConvertError> {
    Document::parse(html).to_blocks()
}

/// Map one node to zero or more blocks.
///
/// Text and comment nodes produce nothing here; loose text is picked up by
/// [`convert_children`] of the enclosing element.
pub fn convert_node(node: &Handle) -> Result<Vec<Block>, ConvertError> {
    checked(node_blocks(node, 0)?)
}

/// Map all children of `node`, in order.
///
/// Runs of text and inline elements between block-level children become
/// paragraphs.
pub fn convert_children(node: &Handle) -> Result<Vec<Block>, ConvertError> {
    checked(children_blocks(node, 0)?)
}

fn checked(blocks: Vec<Block>) -> Result<Vec<Block>, ConvertError> {
    blocks.iter().try_for_each(Block::check_limits)?;
    Ok(blocks)
}

/// Blocks for `node` placed `depth` levels below the page.
fn node_blocks(node: &Handle, depth: usize) -> Result<Vec<Block>, ConvertError> {
    let Some(tag) = Tag::of(node) else {
        return Ok(Vec::new());
    };

    let block = match tag {
        Tag::Heading(level) => non_empty(inline_text(node)).map(|text| Block::Heading { level, text }),
        Tag::Paragraph => non_empty(inline_text(node)).map(Block::Paragraph),
        Tag::Blockquote => non_empty(inline_text(node)).map(Block::Quote),
        Tag::BulletedList => return list_items(node, false, depth),
        Tag::NumberedList => return list_items(node, true, depth),
        Tag::Preformatted | Tag::Code | Tag::HighlightBlock | Tag::HighlightTable => {
            code_block(node, tag)
        }
        // Rows sit one level below their table.
        Tag::Table if depth + 1 >= MAX_LIST_DEPTH => {
            warn!(depth, "Dropping table nested deeper than Notion allows");
            None
        }
        Tag::Table => table_block(node)?,
        Tag::Rule => Some(Block::Divider),
        Tag::Ignored => None,
        Tag::Unsupported => {
            debug!(tag = element_name(node), "Unsupported tag, visiting children");
            return children_blocks(node, depth);
        }
    };
    Ok(block.into_iter().collect())
}

fn children_blocks(node: &Handle, depth: usize) -> Result<Vec<Block>, ConvertError> {
    let mut blocks = Vec::new();
    let mut run = InlineCollector::new();

    for child in node.children.borrow().iter() {
        if is_inline(child) {
            collect_inline_node(child, Annotations::default(), None, &mut run);
            continue;
        }
        flush_paragraph(&mut run, &mut blocks);
        blocks.extend(node_blocks(child, depth)?);
    }
    flush_paragraph(&mut run, &mut blocks);

    Ok(blocks)
}

fn flush_paragraph(run: &mut InlineCollector, blocks: &mut Vec<Block>) {
    if let Some(text) = non_empty(std::mem::take(run).finish()) {
        blocks.push(Block::Paragraph(text));
    }
}

fn is_inline(node: &Handle) -> bool {
    match &node.data {
        NodeData::Text { .. } => true,
        NodeData::Element { .. } => match element_name(node) {
            // Multi-line `code` outside `pre` is a code block.
            Some("code") => !text_content(node).contains('\n'),
            Some(name) => INLINE_ELEMENTS.contains(&name),
            None => false,
        },
        _ => false,
    }
}

fn non_empty(text: RichText) -> Option<RichText> {
    (!text.is_empty()).then_some(text)
}

/// Items of `list`, placed `depth` levels below the page.
///
/// Block content of an item becomes its children one level down; content
/// that would exceed [`MAX_LIST_DEPTH`] is dropped.
fn list_items(list: &Handle, numbered: bool, depth: usize) -> Result<Vec<Block>, ConvertError> {
    let mut blocks = Vec::new();

    for li in element_children(list) {
        if element_name(&li) != Some("li") {
            continue;
        }

        let mut text = InlineCollector::new();
        let mut children = Vec::new();
        for child in li.children.borrow().iter() {
            if element_name(child) == Some("p") || is_inline(child) {
                collect_inline_node(child, Annotations::default(), None, &mut text);
                continue;
            }
            if depth + 1 >= MAX_LIST_DEPTH {
                if Tag::of(child) != Some(Tag::Ignored) && !text_content(child).trim().is_empty() {
                    warn!(depth, "Dropping list item content nested deeper than Notion allows");
                }
                continue;
            }
            children.extend(node_blocks(child, depth + 1)?);
        }

        match non_empty(text.finish()) {
            Some(text) => {
                let item = ListItem { text, children };
                blocks.push(if numbered {
                    Block::NumberedListItem(item)
                } else {
                    Block::BulletedListItem(item)
                });
            }
            // An item holding only a nested list contributes that list.
            None => blocks.extend(children),
        }
    }

    Ok(blocks)
}

fn is_line_numbers(node: &Handle) -> bool {
    has_class(node, "linenos") || has_class(node, "linenodiv") || has_class(node, "lineno")
}

fn code_block(node: &Handle, tag: Tag) -> Option<Block> {
    let source = if tag == Tag::HighlightTable {
        find_first(node, &|n| element_name(n) == Some("td") && has_class(n, "code"))?
    } else {
        std::rc::Rc::clone(node)
    };
    let pre = if element_name(&source) == Some("pre") {
        source
    } else {
        find_element(&source, "pre").unwrap_or(source)
    };
    let code = if element_name(&pre) == Some("code") {
        None
    } else {
        find_element(&pre, "code")
    };

    let body = code.as_ref().unwrap_or(&pre);
    let text = text_content_except(body, &is_line_numbers);
    let text = text.trim_end_matches('\n');
    if text.trim().is_empty() {
        return None;
    }

    let language = [code.as_ref(), Some(&pre), Some(node)]
        .into_iter()
        .flatten()
        .find_map(|n| {
            let class_list = classes(n);
            language_from_classes(class_list.iter().map(String::as_str)).and_then(notion_language)
        });

    Some(Block::Code {
        language,
        text: text.to_owned(),
    })
}

fn table_block(node: &Handle) -> Result<Option<Block>, ConvertError> {
    let mut rows: Vec<Vec<RichText>> = Vec::new();
    let mut has_column_header = false;

    for (tr, in_head) in table_rows(node) {
        let cells: Vec<Handle> = element_children(&tr)
            .into_iter()
            .filter(|c| matches!(element_name(c), Some("td" | "th")))
            .collect();
        if rows.is_empty() {
            has_column_header =
                in_head || (!cells.is_empty() && cells.iter().all(|c| element_name(c) == Some("th")));
        }
        rows.push(cells.iter().map(inline_text).collect());
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 || rows.iter().flatten().all(RichText::is_empty) {
        return Ok(None);
    }
    if width > MAX_TABLE_WIDTH {
        return Err(ConvertError::TableTooWide {
            width,
            max: MAX_TABLE_WIDTH,
        });
    }
    if rows.len() > MAX_TABLE_ROWS {
        return Err(ConvertError::TableTooLong {
            rows: rows.len(),
            max: MAX_TABLE_ROWS,
        });
    }

    for row in &mut rows {
        row.resize_with(width, RichText::new);
    }

    Ok(Some(Block::Table(Table {
        width,
        has_column_header,
        rows,
    })))
}

/// Rows of a table in document order, flagged when inside `thead`.
fn table_rows(table: &Handle) -> Vec<(Handle, bool)> {
    let mut rows = Vec::new();
    for section in element_children(table) {
        match element_name(&section) {
            Some("tr") => rows.push((section, false)),
            Some(name @ ("thead" | "tbody" | "tfoot")) => {
                let in_head = name == "thead";
                rows.extend(
                    element_children(&section)
                        .into_iter()
                        .filter(|r| element_name(r) == Some("tr"))
                        .map(|r| (r, in_head)),
                );
            }
            _ => {}
        }
    }
    rows
}
