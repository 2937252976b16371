// src/editor/command.rs

use url::Url;

use crate::content::urlcheck::is_safe_url;

use super::EditorError;
use super::document::{
    Align, Block, Document, HeadingLevel, ListItem, Marks, Position, Selection, Span,
    restyle_range,
};

/// One discrete edit operation. Commands act on the current selection and
/// leave everything outside it untouched; toggles invert cleanly, so
/// applying the same toggle twice with no intervening change restores the
/// prior document.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Inserts text at a caret, inheriting the styling to its left.
    InsertText(String),
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    ToggleStrike,
    ToggleHeading(HeadingLevel),
    ToggleBulletList,
    ToggleOrderedList,
    ToggleBlockquote,
    SetAlign(Align),
    InsertRule,
    /// Wraps the selected text in a hyperlink. The URL must pass the
    /// scheme allow-list or the command fails without mutating anything.
    SetLink { href: String },
    /// Inserts an image block after the selection. Same URL rule as links.
    InsertImage { src: String, alt: String },
}

/// Applies `cmd` to `doc` at `selection`. Returns whether the document
/// changed. URL-bearing commands validate before any mutation, so an `Err`
/// always leaves the document exactly as it was.
pub(crate) fn apply_command(
    doc: &mut Document,
    selection: &mut Selection,
    cmd: &Command,
    origin: &Url,
) -> Result<bool, EditorError> {
    if !doc.contains(selection.anchor) || !doc.contains(selection.head) {
        return Err(EditorError::InvalidSelection);
    }

    match cmd {
        Command::InsertText(text) => insert_text(doc, selection, text),
        Command::ToggleBold => Ok(toggle_mark(
            doc,
            selection,
            |m| m.bold,
            |m, on| m.bold = on,
        )),
        Command::ToggleItalic => Ok(toggle_mark(
            doc,
            selection,
            |m| m.italic,
            |m, on| m.italic = on,
        )),
        Command::ToggleUnderline => Ok(toggle_mark(
            doc,
            selection,
            |m| m.underline,
            |m, on| m.underline = on,
        )),
        Command::ToggleStrike => Ok(toggle_mark(
            doc,
            selection,
            |m| m.strike,
            |m, on| m.strike = on,
        )),
        Command::ToggleHeading(level) => Ok(toggle_heading(doc, selection, *level)),
        Command::ToggleBulletList => Ok(toggle_list(doc, selection, false)),
        Command::ToggleOrderedList => Ok(toggle_list(doc, selection, true)),
        Command::ToggleBlockquote => Ok(toggle_blockquote(doc, selection)),
        Command::SetAlign(align) => Ok(set_align(doc, selection, *align)),
        Command::InsertRule => Ok(insert_block(doc, selection, Block::Rule)),
        Command::SetLink { href } => {
            if !is_safe_url(href, origin) {
                return Err(EditorError::UnsafeUrl(href.clone()));
            }
            Ok(set_link(doc, selection, href))
        }
        Command::InsertImage { src, alt } => {
            if !is_safe_url(src, origin) {
                return Err(EditorError::UnsafeUrl(src.clone()));
            }
            Ok(insert_block(
                doc,
                selection,
                Block::Image {
                    src: src.clone(),
                    alt: alt.clone(),
                },
            ))
        }
    }
}

/// Character bounds of the selection within block `idx`.
fn inline_bounds(block: &Block, idx: usize, start: Position, end: Position) -> (usize, usize) {
    let from = if idx == start.block { start.offset } else { 0 };
    let to = if idx == end.block {
        end.offset
    } else {
        block.char_len()
    };
    (from, to.min(block.char_len()))
}

/// True when every character in the selection satisfies `pred`, and the
/// selection contains at least one character of paragraph-like text.
fn selection_fully<F>(doc: &Document, start: Position, end: Position, pred: F) -> bool
where
    F: Fn(&Span) -> bool,
{
    let mut any = false;
    for idx in start.block..=end.block {
        let block = &doc.blocks[idx];
        let Some(spans) = block.spans() else { continue };
        let (from, to) = inline_bounds(block, idx, start, end);

        let mut cursor = 0usize;
        for span in spans {
            let len = span.char_len();
            let (s, e) = (cursor, cursor + len);
            cursor = e;
            if len == 0 || e <= from || s >= to {
                continue;
            }
            any = true;
            if !pred(span) {
                return false;
            }
        }
    }
    any
}

fn selection_has_text(doc: &Document, start: Position, end: Position) -> bool {
    for idx in start.block..=end.block {
        let block = &doc.blocks[idx];
        let Some(spans) = block.spans() else { continue };
        let (from, to) = inline_bounds(block, idx, start, end);
        let mut cursor = 0usize;
        for span in spans {
            let len = span.char_len();
            let (s, e) = (cursor, cursor + len);
            cursor = e;
            if len > 0 && e > from && s < to {
                return true;
            }
        }
    }
    false
}

fn toggle_mark(
    doc: &mut Document,
    selection: &Selection,
    get: fn(&Marks) -> bool,
    set: fn(&mut Marks, bool),
) -> bool {
    if selection.is_caret() {
        return false;
    }
    let (start, end) = selection.normalized();
    if !selection_has_text(doc, start, end) {
        return false;
    }
    let on = !selection_fully(doc, start, end, |span| get(&span.marks));

    for idx in start.block..=end.block {
        let (from, to) = inline_bounds(&doc.blocks[idx], idx, start, end);
        if let Some(spans) = doc.blocks[idx].spans_mut() {
            restyle_range(spans, from, to, |span| set(&mut span.marks, on));
        }
    }
    true
}

fn set_link(doc: &mut Document, selection: &Selection, href: &str) -> bool {
    if selection.is_caret() {
        return false;
    }
    let (start, end) = selection.normalized();
    if !selection_has_text(doc, start, end) {
        return false;
    }

    for idx in start.block..=end.block {
        let (from, to) = inline_bounds(&doc.blocks[idx], idx, start, end);
        if let Some(spans) = doc.blocks[idx].spans_mut() {
            restyle_range(spans, from, to, |span| span.link = Some(href.to_string()));
        }
    }
    true
}

fn toggle_heading(doc: &mut Document, selection: &Selection, level: HeadingLevel) -> bool {
    let (start, end) = selection.normalized();

    let targets: Vec<usize> = (start.block..=end.block)
        .filter(|&idx| {
            matches!(
                doc.blocks[idx],
                Block::Paragraph { .. } | Block::Heading { .. }
            )
        })
        .collect();
    if targets.is_empty() {
        return false;
    }

    let all_at_level = targets
        .iter()
        .all(|&idx| matches!(doc.blocks[idx], Block::Heading { level: l, .. } if l == level));

    let mut changed = false;
    for &idx in &targets {
        let block = &mut doc.blocks[idx];
        let already = matches!(block, Block::Heading { level: l, .. } if *l == level);
        let replaced = std::mem::replace(block, Block::Rule);
        *block = match replaced {
            Block::Paragraph { align, spans } | Block::Heading { align, spans, .. } => {
                if all_at_level {
                    changed = true;
                    Block::Paragraph { align, spans }
                } else {
                    changed |= !already;
                    Block::Heading {
                        level,
                        align,
                        spans,
                    }
                }
            }
            other => other,
        };
    }
    changed
}

fn toggle_blockquote(doc: &mut Document, selection: &Selection) -> bool {
    let (start, end) = selection.normalized();

    let targets: Vec<usize> = (start.block..=end.block)
        .filter(|&idx| {
            matches!(
                doc.blocks[idx],
                Block::Paragraph { .. } | Block::Blockquote { .. }
            )
        })
        .collect();
    if targets.is_empty() {
        return false;
    }

    let all_quoted = targets
        .iter()
        .all(|&idx| matches!(doc.blocks[idx], Block::Blockquote { .. }));

    let mut changed = false;
    for &idx in &targets {
        let block = &mut doc.blocks[idx];
        let replaced = std::mem::replace(block, Block::Rule);
        *block = match replaced {
            Block::Paragraph { align, spans } if !all_quoted => {
                changed = true;
                Block::Blockquote { align, spans }
            }
            Block::Blockquote { align, spans } if all_quoted => {
                changed = true;
                Block::Paragraph { align, spans }
            }
            other => other,
        };
    }
    changed
}

fn set_align(doc: &mut Document, selection: &Selection, align: Align) -> bool {
    let (start, end) = selection.normalized();
    let mut changed = false;

    for idx in start.block..=end.block {
        match &mut doc.blocks[idx] {
            Block::Paragraph { align: a, .. } | Block::Heading { align: a, .. } => {
                if *a != align {
                    *a = align;
                    changed = true;
                }
            }
            _ => {}
        }
    }
    changed
}

fn toggle_list(doc: &mut Document, selection: &mut Selection, ordered: bool) -> bool {
    let (start, end) = selection.normalized();

    let original: Vec<Block> = doc.blocks.drain(start.block..=end.block).collect();
    let before = original.clone();

    let all_matching_lists = original
        .iter()
        .all(|block| matches!(block, Block::List { ordered: o, .. } if *o == ordered));
    let all_lists = original
        .iter()
        .all(|block| matches!(block, Block::List { .. }));

    let mut replacement: Vec<Block> = Vec::with_capacity(original.len());

    if all_matching_lists {
        // Unwrap each item back into the paragraph it came from.
        for block in original {
            if let Block::List { items, .. } = block {
                for item in items {
                    replacement.push(Block::Paragraph {
                        align: item.align,
                        spans: item.spans,
                    });
                }
            }
        }
    } else if all_lists {
        // Switch list kind in place.
        for block in original {
            if let Block::List { items, .. } = block {
                replacement.push(Block::List { ordered, items });
            }
        }
    } else {
        // Wrap runs of consecutive paragraphs into one list each; other
        // blocks interrupt a run and pass through unchanged.
        let mut run: Vec<ListItem> = Vec::new();
        for block in original {
            match block {
                Block::Paragraph { align, spans } => run.push(ListItem { align, spans }),
                other => {
                    if !run.is_empty() {
                        replacement.push(Block::List {
                            ordered,
                            items: std::mem::take(&mut run),
                        });
                    }
                    replacement.push(other);
                }
            }
        }
        if !run.is_empty() {
            replacement.push(Block::List {
                ordered,
                items: run,
            });
        }
    }

    if replacement.is_empty() {
        replacement.push(Block::empty_paragraph());
    }

    let changed = replacement != before;
    let first = start.block;
    let last = first + replacement.len() - 1;
    let last_len = replacement[replacement.len() - 1].char_len();
    doc.blocks.splice(first..first, replacement);

    if changed {
        *selection = Selection::range(Position::new(first, 0), Position::new(last, last_len));
    }
    changed
}

fn insert_text(
    doc: &mut Document,
    selection: &mut Selection,
    text: &str,
) -> Result<bool, EditorError> {
    if text.is_empty() {
        return Ok(false);
    }
    if !selection.is_caret() {
        return Err(EditorError::InvalidSelection);
    }
    let caret = selection.head;
    let Some(spans) = doc.blocks[caret.block].spans_mut() else {
        return Err(EditorError::InvalidSelection);
    };

    insert_into_spans(spans, caret.offset, text);
    *selection = Selection::caret(caret.block, caret.offset + text.chars().count());
    Ok(true)
}

/// Inserts `text` at `offset`, extending the span to its left so new text
/// inherits the styling the author was just typing in.
fn insert_into_spans(spans: &mut Vec<Span>, offset: usize, text: &str) {
    if spans.is_empty() {
        spans.push(Span::plain(text));
        return;
    }

    let mut cursor = 0usize;
    for span in spans.iter_mut() {
        let len = span.char_len();
        if offset <= cursor + len {
            let local = offset - cursor;
            let byte_idx = span
                .text
                .char_indices()
                .nth(local)
                .map(|(i, _)| i)
                .unwrap_or(span.text.len());
            span.text.insert_str(byte_idx, text);
            return;
        }
        cursor += len;
    }

    if let Some(last) = spans.last_mut() {
        last.text.push_str(text);
    }
}

/// Inserts `block` after the selection and leaves the caret in a paragraph
/// following it, creating that paragraph when the insertion lands at the
/// end of the document.
fn insert_block(doc: &mut Document, selection: &mut Selection, block: Block) -> bool {
    let (_, end) = selection.normalized();
    let at = end.block + 1;
    doc.blocks.insert(at, block);

    if at + 1 == doc.blocks.len() {
        doc.blocks.push(Block::empty_paragraph());
    }
    *selection = Selection::caret(at + 1, 0);
    true
}
