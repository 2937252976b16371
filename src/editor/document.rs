// src/editor/document.rs

use serde::{Deserialize, Serialize};

/// Text alignment for paragraph-like blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Align {
    pub fn css(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
            Align::Justify => "justify",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn tag(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
        }
    }
}

/// Inline emphasis state of a span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marks {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub strike: bool,
}

/// A run of text with uniform styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    #[serde(default)]
    pub marks: Marks,
    /// Hyperlink target, if the run is inside a link.
    #[serde(default)]
    pub link: Option<String>,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Marks::default(),
            link: None,
        }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// One list entry. Alignment is carried so converting a paragraph into a
/// list item and back restores the original block exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    #[serde(default)]
    pub align: Align,
    pub spans: Vec<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        #[serde(default)]
        align: Align,
        spans: Vec<Span>,
    },
    Heading {
        level: HeadingLevel,
        #[serde(default)]
        align: Align,
        spans: Vec<Span>,
    },
    List {
        ordered: bool,
        items: Vec<ListItem>,
    },
    Blockquote {
        #[serde(default)]
        align: Align,
        spans: Vec<Span>,
    },
    Rule,
    Image {
        src: String,
        #[serde(default)]
        alt: String,
    },
}

impl Block {
    pub fn empty_paragraph() -> Self {
        Block::Paragraph {
            align: Align::default(),
            spans: Vec::new(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph {
            align: Align::default(),
            spans: vec![Span::plain(text)],
        }
    }

    /// Inline spans of paragraph-like blocks. Lists are addressed per item
    /// and have no flat span view; `Rule`/`Image` carry no text.
    pub fn spans(&self) -> Option<&[Span]> {
        match self {
            Block::Paragraph { spans, .. }
            | Block::Heading { spans, .. }
            | Block::Blockquote { spans, .. } => Some(spans),
            _ => None,
        }
    }

    pub fn spans_mut(&mut self) -> Option<&mut Vec<Span>> {
        match self {
            Block::Paragraph { spans, .. }
            | Block::Heading { spans, .. }
            | Block::Blockquote { spans, .. } => Some(spans),
            _ => None,
        }
    }

    /// Number of addressable character positions in the block.
    pub fn char_len(&self) -> usize {
        match self {
            Block::List { items, .. } => items
                .iter()
                .map(|item| item.spans.iter().map(Span::char_len).sum::<usize>())
                .sum(),
            Block::Rule | Block::Image { .. } => 0,
            other => other
                .spans()
                .map(|spans| spans.iter().map(Span::char_len).sum())
                .unwrap_or(0),
        }
    }
}

/// A character position: block index plus character offset within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub block: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// Anchor/head pair. `anchor == head` is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Position,
    pub head: Position,
}

impl Selection {
    pub fn caret(block: usize, offset: usize) -> Self {
        let pos = Position::new(block, offset);
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn range(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    pub fn is_caret(&self) -> bool {
        self.anchor == self.head
    }

    /// Returns (start, end) in document order.
    pub fn normalized(&self) -> (Position, Position) {
        let forward = self.anchor.block < self.head.block
            || (self.anchor.block == self.head.block && self.anchor.offset <= self.head.offset);
        if forward {
            (self.anchor, self.head)
        } else {
            (self.head, self.anchor)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            blocks: vec![Block::empty_paragraph()],
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.blocks
            .get(pos.block)
            .is_some_and(|block| pos.offset <= block.char_len())
    }
}

/// Applies `f` to every span fragment within the character range
/// `[from, to)`, splitting spans at the boundaries so untouched text keeps
/// its styling. Adjacent spans left with identical styling are merged.
pub(crate) fn restyle_range(spans: &mut Vec<Span>, from: usize, to: usize, f: impl Fn(&mut Span)) {
    let mut result: Vec<Span> = Vec::with_capacity(spans.len() + 2);
    let mut cursor = 0usize;

    for span in spans.drain(..) {
        let len = span.char_len();
        let (start, end) = (cursor, cursor + len);
        cursor = end;

        if len == 0 {
            continue;
        }
        if end <= from || start >= to {
            result.push(span);
            continue;
        }

        let cut_a = from.saturating_sub(start).min(len);
        let cut_b = to.saturating_sub(start).min(len);
        let chars: Vec<char> = span.text.chars().collect();

        let before: String = chars[..cut_a].iter().collect();
        let middle: String = chars[cut_a..cut_b].iter().collect();
        let after: String = chars[cut_b..].iter().collect();

        if !before.is_empty() {
            result.push(Span {
                text: before,
                marks: span.marks,
                link: span.link.clone(),
            });
        }
        if !middle.is_empty() {
            let mut touched = Span {
                text: middle,
                marks: span.marks,
                link: span.link.clone(),
            };
            f(&mut touched);
            result.push(touched);
        }
        if !after.is_empty() {
            result.push(Span {
                text: after,
                marks: span.marks,
                link: span.link,
            });
        }
    }

    merge_adjacent(&mut result);
    *spans = result;
}

/// Collapses neighboring spans whose styling is identical.
pub(crate) fn merge_adjacent(spans: &mut Vec<Span>) {
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans.drain(..) {
        if let Some(last) = merged.last_mut()
            && last.marks == span.marks
            && last.link == span.link
        {
            last.text.push_str(&span.text);
            continue;
        }
        merged.push(span);
    }
    *spans = merged;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restyle_splits_at_boundaries() {
        let mut spans = vec![Span::plain("hello world")];
        restyle_range(&mut spans, 6, 11, |span| span.marks.bold = true);

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "hello ");
        assert!(!spans[0].marks.bold);
        assert_eq!(spans[1].text, "world");
        assert!(spans[1].marks.bold);
    }

    #[test]
    fn restyle_merges_identical_neighbors() {
        let mut spans = vec![Span::plain("ab"), Span::plain("cd")];
        restyle_range(&mut spans, 0, 4, |span| span.marks.italic = true);

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "abcd");
        assert!(spans[0].marks.italic);
    }

    #[test]
    fn restyle_middle_of_span() {
        let mut spans = vec![Span::plain("abcdef")];
        restyle_range(&mut spans, 2, 4, |span| span.marks.strike = true);

        let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["ab", "cd", "ef"]);
        assert!(spans[1].marks.strike);
        assert!(!spans[0].marks.strike && !spans[2].marks.strike);
    }

    #[test]
    fn selection_normalizes_backwards_ranges() {
        let sel = Selection::range(Position::new(2, 3), Position::new(0, 1));
        let (start, end) = sel.normalized();
        assert_eq!(start, Position::new(0, 1));
        assert_eq!(end, Position::new(2, 3));
    }

    #[test]
    fn char_len_counts_characters_not_bytes() {
        let block = Block::paragraph("héllo");
        assert_eq!(block.char_len(), 5);
    }
}
