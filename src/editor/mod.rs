// src/editor/mod.rs
//
// The authoring surface's core: a block/inline document model, a command
// set operating on the current selection, and a session with linear
// undo/redo. The session only ever emits HTML that has passed through the
// sanitizer, and link/image commands refuse unsafe URLs before touching
// the document.

pub mod command;
pub mod document;
pub mod html;
pub mod session;

use std::fmt;

pub use command::Command;
pub use document::{Align, Block, Document, HeadingLevel, ListItem, Marks, Position, Selection, Span};
pub use session::EditorSession;

#[derive(Debug, PartialEq, Eq)]
pub enum EditorError {
    /// The URL failed the scheme allow-list. The document is unchanged.
    UnsafeUrl(String),
    /// The selection points outside the document.
    InvalidSelection,
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::UnsafeUrl(url) => write!(f, "URL is not allowed: {}", url),
            EditorError::InvalidSelection => write!(f, "Selection is out of range"),
        }
    }
}

impl std::error::Error for EditorError {}
