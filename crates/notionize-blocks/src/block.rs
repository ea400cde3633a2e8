//! Notion block model and its JSON encoding.

use serde::{Serialize, Serializer};
use serde_json::{Value, json};

use crate::error::ConvertError;
use crate::rich_text::{RichText, text_object_count};

/// Most entries Notion accepts in any array of a request (`rich_text`,
/// `children`, table cells).
pub const MAX_ARRAY_LENGTH: usize = 100;

/// Most block objects, nested ones included, in one append request.
pub const MAX_REQUEST_BLOCKS: usize = 1000;

/// Heading levels Notion supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Map an HTML heading rank (1-6) onto a Notion level.
    ///
    /// Ranks 4-6 collapse to level 3.
    #[must_use]
    pub fn from_rank(rank: u8) -> Self {
        match rank {
            0 | 1 => Self::H1,
            2 => Self::H2,
            _ => Self::H3,
        }
    }

    fn block_type(self) -> &'static str {
        match self {
            Self::H1 => "heading_1",
            Self::H2 => "heading_2",
            Self::H3 => "heading_3",
        }
    }
}

/// A list item with optional nested blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub text: RichText,
    pub children: Vec<Block>,
}

/// Table contents. Every row has exactly `width` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub width: usize,
    pub has_column_header: bool,
    pub rows: Vec<Vec<RichText>>,
}

/// One unit of Notion page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: HeadingLevel, text: RichText },
    Paragraph(RichText),
    Quote(RichText),
    BulletedListItem(ListItem),
    NumberedListItem(ListItem),
    /// Code block. `language` is `None` for languages Notion does not know.
    Code {
        language: Option<&'static str>,
        text: String,
    },
    Table(Table),
    Divider,
}

impl Block {
    /// Plain paragraph.
    #[must_use]
    pub fn paragraph(text: &str) -> Self {
        Self::Paragraph(RichText::plain(text))
    }

    /// Plain heading.
    #[must_use]
    pub fn heading(level: HeadingLevel, text: &str) -> Self {
        Self::Heading {
            level,
            text: RichText::plain(text),
        }
    }

    /// Notion block type name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Heading { level, .. } => level.block_type(),
            Self::Paragraph(_) => "paragraph",
            Self::Quote(_) => "quote",
            Self::BulletedListItem(_) => "bulleted_list_item",
            Self::NumberedListItem(_) => "numbered_list_item",
            Self::Code { .. } => "code",
            Self::Table(_) => "table",
            Self::Divider => "divider",
        }
    }

    /// Block objects sent for this block: itself, nested list children and
    /// table rows.
    #[must_use]
    pub fn element_count(&self) -> usize {
        match self {
            Self::BulletedListItem(item) | Self::NumberedListItem(item) => {
                1 + item.children.iter().map(Self::element_count).sum::<usize>()
            }
            Self::Table(table) => 1 + table.rows.len(),
            _ => 1,
        }
    }

    /// Check the array and request limits Notion enforces on this block.
    pub fn check_limits(&self) -> Result<(), ConvertError> {
        match self {
            Self::Heading { text, .. } | Self::Paragraph(text) | Self::Quote(text) => {
                check_objects(text.object_count())?;
            }
            Self::BulletedListItem(item) | Self::NumberedListItem(item) => {
                check_objects(item.text.object_count())?;
                if item.children.len() > MAX_ARRAY_LENGTH {
                    return Err(ConvertError::TooManyChildren {
                        children: item.children.len(),
                        max: MAX_ARRAY_LENGTH,
                    });
                }
                item.children.iter().try_for_each(Self::check_limits)?;
            }
            Self::Code { text, .. } => check_objects(text_object_count(text))?,
            Self::Table(table) => {
                for cell in table.rows.iter().flatten() {
                    check_objects(cell.object_count())?;
                }
            }
            Self::Divider => {}
        }

        let blocks = self.element_count();
        if blocks > MAX_REQUEST_BLOCKS {
            return Err(ConvertError::BlockTooLarge {
                blocks,
                max: MAX_REQUEST_BLOCKS,
            });
        }
        Ok(())
    }

    /// Encode as a Notion block object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let body = match self {
            Self::Heading { text, .. } | Self::Paragraph(text) | Self::Quote(text) => {
                json!({ "rich_text": text.to_json() })
            }
            Self::BulletedListItem(item) | Self::NumberedListItem(item) => {
                let mut body = json!({ "rich_text": item.text.to_json() });
                if !item.children.is_empty() {
                    body["children"] = item.children.iter().map(Self::to_json).collect();
                }
                body
            }
            Self::Code { language, text } => json!({
                "rich_text": RichText::plain(text.as_str()).to_json(),
                "language": language.unwrap_or("plain text"),
            }),
            Self::Table(table) => {
                let rows: Vec<Value> = table
                    .rows
                    .iter()
                    .map(|row| {
                        let cells: Vec<Value> = row.iter().map(RichText::to_json).collect();
                        json!({
                            "object": "block",
                            "type": "table_row",
                            "table_row": { "cells": cells },
                        })
                    })
                    .collect();
                json!({
                    "table_width": table.width,
                    "has_column_header": table.has_column_header,
                    "has_row_header": false,
                    "children": rows,
                })
            }
            Self::Divider => json!({}),
        };

        let kind = self.kind();
        let mut block = json!({ "object": "block", "type": kind });
        block[kind] = body;
        block
    }
}

fn check_objects(objects: usize) -> Result<(), ConvertError> {
    if objects > MAX_ARRAY_LENGTH {
        return Err(ConvertError::RichTextTooLong {
            objects,
            max: MAX_ARRAY_LENGTH,
        });
    }
    Ok(())
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
