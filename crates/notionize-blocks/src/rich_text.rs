//! Notion rich text: styled text spans with optional links.

use serde_json::{Value, json};

/// Maximum characters in one Notion text object.
pub const MAX_TEXT_LENGTH: usize = 2000;

/// Inline styling applied to a text span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Annotations {
    /// `<strong>`, `<b>`.
    pub bold: bool,
    /// `<em>`, `<i>`.
    pub italic: bool,
    /// `<del>`, `<s>`.
    pub strikethrough: bool,
    /// `<code>`, `<kbd>`.
    pub code: bool,
}

impl Annotations {
    fn is_plain(self) -> bool {
        self == Self::default()
    }
}

/// A run of text sharing the same annotations and link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    /// Text content.
    pub content: String,
    /// Inline styling.
    pub annotations: Annotations,
    /// Absolute link target, if any.
    pub link: Option<String>,
}

/// Ordered sequence of styled spans, the payload of most blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    spans: Vec<TextSpan>,
}

impl RichText {
    /// Create empty rich text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rich text made of a single unstyled span.
    #[must_use]
    pub fn plain(content: impl Into<String>) -> Self {
        let mut text = Self::new();
        text.push(&content.into(), Annotations::default(), None);
        text
    }

    /// Append text, merging with the previous span when styling matches.
    pub fn push(&mut self, content: &str, annotations: Annotations, link: Option<&str>) {
        if content.is_empty() {
            return;
        }
        if let Some(last) = self.spans.last_mut()
            && last.annotations == annotations
            && last.link.as_deref() == link
        {
            last.content.push_str(content);
            return;
        }
        self.spans.push(TextSpan {
            content: content.to_owned(),
            annotations,
            link: link.map(str::to_owned),
        });
    }

    /// Spans in order.
    #[must_use]
    pub fn spans(&self) -> &[TextSpan] {
        &self.spans
    }

    /// True when there is no visible text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.content.trim().is_empty())
    }

    /// Concatenated text without styling.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.content.as_str()).collect()
    }

    /// Number of text objects [`to_json`](Self::to_json) produces.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.spans
            .iter()
            .map(|s| text_object_count(&s.content))
            .sum()
    }

    /// Encode as a Notion `rich_text` array.
    ///
    /// Spans longer than [`MAX_TEXT_LENGTH`] characters are split into
    /// consecutive text objects with the same styling.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut objects = Vec::with_capacity(self.spans.len());
        for span in &self.spans {
            for chunk in chunk_chars(&span.content, MAX_TEXT_LENGTH) {
                objects.push(text_object(chunk, span));
            }
        }
        Value::Array(objects)
    }
}

fn text_object(content: &str, span: &TextSpan) -> Value {
    let mut text = json!({ "content": content });
    if let Some(url) = &span.link {
        text["link"] = json!({ "url": url });
    }
    let mut object = json!({ "type": "text", "text": text });
    if !span.annotations.is_plain() {
        let a = span.annotations;
        object["annotations"] = json!({
            "bold": a.bold,
            "italic": a.italic,
            "strikethrough": a.strikethrough,
            "code": a.code,
        });
    }
    object
}

/// Text objects needed for `content` once split at [`MAX_TEXT_LENGTH`].
pub(crate) fn text_object_count(content: &str) -> usize {
    content.chars().count().div_ceil(MAX_TEXT_LENGTH)
}

/// Split `s` into pieces of at most `max` characters, on char boundaries.
fn chunk_chars(s: &str, max: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in s.char_indices() {
        if count == max {
            chunks.push(&s[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < s.len() {
        chunks.push(&s[start..]);
    }
    chunks
}

/// Accumulates inline text with HTML whitespace collapsing.
///
/// Runs of whitespace become a single space; leading and trailing whitespace
/// is dropped, as is whitespace directly after a line break.
#[derive(Debug, Default)]
pub(crate) struct InlineCollector {
    text: RichText,
    pending_space: bool,
    has_content: bool,
    at_line_start: bool,
}

impl InlineCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_text(&mut self, raw: &str, annotations: Annotations, link: Option<&str>) {
        let mut out = String::with_capacity(raw.len());
        for ch in raw.chars() {
            if ch.is_whitespace() {
                self.pending_space = true;
                continue;
            }
            if self.pending_space && self.has_content && !self.at_line_start {
                if out.is_empty() {
                    // Whitespace carried over from a previous node stays unstyled.
                    self.text.push(" ", Annotations::default(), None);
                } else {
                    out.push(' ');
                }
            }
            self.pending_space = false;
            self.has_content = true;
            self.at_line_start = false;
            out.push(ch);
        }
        self.text.push(&out, annotations, link);
    }

    /// Hard line break (`<br>`).
    pub(crate) fn line_break(&mut self) {
        if !self.has_content {
            return;
        }
        self.text.push("\n", Annotations::default(), None);
        self.pending_space = false;
        self.at_line_start = true;
    }

    /// Separate two block-level children (paragraphs in a quote, for example).
    pub(crate) fn block_break(&mut self) {
        if self.has_content && !self.at_line_start {
            self.line_break();
        }
    }

    pub(crate) fn finish(mut self) -> RichText {
        // A break right before the end is not content.
        if let Some(last) = self.text.spans.last_mut() {
            let trimmed = last.content.trim_end_matches('\n').len();
            last.content.truncate(trimmed);
        }
        self.text.spans.retain(|s| !s.content.is_empty());
        self.text
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const BOLD: Annotations = Annotations {
        bold: true,
        italic: false,
        strikethrough: false,
        code: false,
    };

    #[test]
    fn test_push_merges_same_style() {
        let mut text = RichText::new();
        text.push("Hello", Annotations::default(), None);
        text.push(" world", Annotations::default(), None);
        text.push("!", BOLD, None);
        assert_eq!(text.spans().len(), 2);
        assert_eq!(text.spans()[0].content, "Hello world");
        assert_eq!(text.plain_text(), "Hello world!");
    }

    #[test]
    fn test_push_keeps_links_apart() {
        let mut text = RichText::new();
        text.push("a", Annotations::default(), Some("https://a.example"));
        text.push("b", Annotations::default(), Some("https://b.example"));
        assert_eq!(text.spans().len(), 2);
    }

    #[test]
    fn test_is_empty_ignores_whitespace() {
        assert!(RichText::new().is_empty());
        assert!(RichText::plain("  \n").is_empty());
        assert!(!RichText::plain("x").is_empty());
    }

    #[test]
    fn test_to_json_plain_span() {
        let json = RichText::plain("Hello").to_json();
        assert_eq!(json, json!([{ "type": "text", "text": { "content": "Hello" } }]));
    }

    #[test]
    fn test_to_json_annotations_and_link() {
        let mut text = RichText::new();
        text.push("docs", BOLD, Some("https://example.com"));
        let json = text.to_json();
        assert_eq!(json[0]["text"]["link"]["url"], "https://example.com");
        assert_eq!(json[0]["annotations"]["bold"], true);
        assert_eq!(json[0]["annotations"]["italic"], false);
    }

    #[test]
    fn test_to_json_splits_long_content() {
        let long = "é".repeat(MAX_TEXT_LENGTH * 2 + 5);
        let json = RichText::plain(long.clone()).to_json();
        let parts = json.as_array().unwrap();
        assert_eq!(parts.len(), 3);
        let joined: String = parts
            .iter()
            .map(|p| p["text"]["content"].as_str().unwrap())
            .collect();
        assert_eq!(joined, long);
        assert_eq!(
            parts[0]["text"]["content"].as_str().unwrap().chars().count(),
            MAX_TEXT_LENGTH
        );
    }

    #[test]
    fn test_object_count_matches_json() {
        let mut text = RichText::plain("a".repeat(MAX_TEXT_LENGTH + 1));
        text.push("b", BOLD, None);
        assert_eq!(text.object_count(), 3);
        assert_eq!(text.to_json().as_array().unwrap().len(), 3);
        assert_eq!(RichText::new().object_count(), 0);
    }

    #[test]
    fn test_collector_collapses_whitespace() {
        let mut c = InlineCollector::new();
        c.push_text("\n   Hello \t ", Annotations::default(), None);
        c.push_text("  big ", BOLD, None);
        c.push_text("  world  \n", Annotations::default(), None);
        let text = c.finish();
        assert_eq!(text.plain_text(), "Hello big world");
        assert_eq!(text.spans()[0].content, "Hello ");
        assert_eq!(text.spans()[1].content, "big");
    }

    #[test]
    fn test_collector_line_breaks() {
        let mut c = InlineCollector::new();
        c.line_break();
        c.push_text("one", Annotations::default(), None);
        c.line_break();
        c.push_text("  two", Annotations::default(), None);
        c.block_break();
        c.block_break();
        let text = c.finish();
        assert_eq!(text.plain_text(), "one\ntwo");
    }
}
