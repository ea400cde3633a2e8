//! HTML parsing and DOM helpers over `markup5ever_rcdom`.

use std::rc::Rc;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::block::Block;
use crate::error::ConvertError;
use crate::mapper;
use crate::rich_text::{Annotations, InlineCollector};

/// Parsed HTML page.
pub struct Document {
    dom: RcDom,
}

impl Document {
    /// Parse a complete HTML document or fragment.
    ///
    /// HTML parsing never fails: malformed markup is recovered the way a
    /// browser would.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                drop_doctype: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let dom = parse_document(RcDom::default(), opts).one(html);
        Self { dom }
    }

    /// Root node of the document.
    #[must_use]
    pub fn root(&self) -> Handle {
        Rc::clone(&self.dom.document)
    }

    /// Node holding the page's own content, without theme chrome.
    ///
    /// Tries `div[role=main]` (MkDocs themes), then `<main>`, `<article>` and
    /// finally `<body>`.
    #[must_use]
    pub fn main_content(&self) -> Option<Handle> {
        let root = &self.dom.document;
        find_first(root, &|n| {
            element_name(n) == Some("div") && attr(n, "role").as_deref() == Some("main")
        })
        .or_else(|| find_element(root, "main"))
        .or_else(|| find_element(root, "article"))
        .or_else(|| find_element(root, "body"))
    }

    /// Text of the first `<h1>`, preferring the main content area.
    #[must_use]
    pub fn first_heading(&self) -> Option<String> {
        let h1 = self
            .main_content()
            .and_then(|main| find_element(&main, "h1"))
            .or_else(|| find_element(&self.dom.document, "h1"))?;
        let text = inline_text(&h1).plain_text();
        (!text.is_empty()).then_some(text)
    }

    /// `<title>` text with a theme suffix such as `" - My Docs"` removed.
    #[must_use]
    pub fn title_text(&self) -> Option<String> {
        let title = find_element(&self.dom.document, "title")?;
        let text = text_content(&title);
        let text = text.trim();
        let text = text.split(" - ").next().unwrap_or(text).trim();
        (!text.is_empty()).then(|| text.to_owned())
    }

    /// Convert the main content area to blocks.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if the content cannot be represented in Notion.
    pub fn to_blocks(&self) -> Result<Vec<Block>, ConvertError> {
        match self.main_content() {
            Some(main) => mapper::convert_children(&main),
            None => Ok(Vec::new()),
        }
    }
}

/// Parse an HTML document.
#[must_use]
pub fn parse_html(html: &str) -> Document {
    Document::parse(html)
}

/// Local tag name of an element node.
pub(crate) fn element_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

/// Attribute value by local name.
pub(crate) fn attr(node: &Handle, name: &str) -> Option<String> {
    let NodeData::Element { attrs, .. } = &node.data else {
        return None;
    };
    attrs
        .borrow()
        .iter()
        .find(|a| &*a.name.local == name)
        .map(|a| (*a.value).to_owned())
}

/// Whitespace-separated classes of an element.
pub(crate) fn classes(node: &Handle) -> Vec<String> {
    attr(node, "class")
        .map(|c| c.split_whitespace().map(str::to_owned).collect())
        .unwrap_or_default()
}

pub(crate) fn has_class(node: &Handle, class: &str) -> bool {
    classes(node).iter().any(|c| c == class)
}

/// Child element nodes, in order.
pub(crate) fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|c| matches!(c.data, NodeData::Element { .. }))
        .map(Rc::clone)
        .collect()
}

/// First descendant (depth-first, pre-order) matching `pred`.
pub(crate) fn find_first(node: &Handle, pred: &dyn Fn(&Handle) -> bool) -> Option<Handle> {
    for child in node.children.borrow().iter() {
        if pred(child) {
            return Some(Rc::clone(child));
        }
        if let Some(found) = find_first(child, pred) {
            return Some(found);
        }
    }
    None
}

pub(crate) fn find_element(node: &Handle, name: &str) -> Option<Handle> {
    find_first(node, &|n| element_name(n) == Some(name))
}

/// Raw text of all descendant text nodes, whitespace preserved.
pub(crate) fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    append_text(node, &mut out, &|_| false);
    out
}

/// Raw text, skipping subtrees for which `skip` returns true.
pub(crate) fn text_content_except(node: &Handle, skip: &dyn Fn(&Handle) -> bool) -> String {
    let mut out = String::new();
    append_text(node, &mut out, skip);
    out
}

fn append_text(node: &Handle, out: &mut String, skip: &dyn Fn(&Handle) -> bool) {
    for child in node.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } if !skip(child) => append_text(child, out, skip),
            _ => {}
        }
    }
}

/// Styled inline text of an element's whole subtree.
pub(crate) fn inline_text(node: &Handle) -> crate::rich_text::RichText {
    let mut collector = InlineCollector::new();
    collect_inline(node, Annotations::default(), None, &mut collector);
    collector.finish()
}

/// Walk an element's children collecting styled text.
pub(crate) fn collect_inline(
    node: &Handle,
    annotations: Annotations,
    link: Option<&str>,
    out: &mut InlineCollector,
) {
    for child in node.children.borrow().iter() {
        collect_inline_node(child, annotations, link, out);
    }
}

/// Collect one node (text or element) into `out`.
pub(crate) fn collect_inline_node(
    node: &Handle,
    mut annotations: Annotations,
    link: Option<&str>,
    out: &mut InlineCollector,
) {
    let name = match &node.data {
        NodeData::Text { contents } => {
            out.push_text(&contents.borrow(), annotations, link);
            return;
        }
        NodeData::Element { name, .. } => name.local.to_string(),
        _ => return,
    };

    match name.as_str() {
        "br" => out.line_break(),
        "script" | "style" | "template" | "svg" | "button" => {}
        "a" if has_class(node, "headerlink") => {}
        "a" => {
            let href = attr(node, "href").filter(|h| is_absolute_url(h));
            collect_inline(node, annotations, href.as_deref().or(link), out);
        }
        "strong" | "b" => {
            annotations.bold = true;
            collect_inline(node, annotations, link, out);
        }
        "em" | "i" => {
            annotations.italic = true;
            collect_inline(node, annotations, link, out);
        }
        "code" | "kbd" | "samp" => {
            annotations.code = true;
            collect_inline(node, annotations, link, out);
        }
        "del" | "s" | "strike" => {
            annotations.strikethrough = true;
            collect_inline(node, annotations, link, out);
        }
        "p" | "div" | "li" | "pre" | "blockquote" | "tr" | "h1" | "h2" | "h3" | "h4" | "h5"
        | "h6" => {
            out.block_break();
            collect_inline(node, annotations, link, out);
            out.block_break();
        }
        _ => collect_inline(node, annotations, link, out),
    }
}

/// Notion only accepts absolute web links.
fn is_absolute_url(href: &str) -> bool {
    href.starts_with("https://") || href.starts_with("http://")
}
