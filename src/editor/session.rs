// src/editor/session.rs

use url::Url;

use crate::content::sanitize::{SanitizedHtml, sanitize};

use super::EditorError;
use super::command::{Command, apply_command};
use super::document::{Document, Selection};
use super::html::render_html;

#[derive(Debug, Clone)]
struct Snapshot {
    doc: Document,
    selection: Selection,
}

/// An editing session: a document, a selection, and a linear undo/redo
/// history. Every successful edit pushes one history entry; a new edit
/// clears the redo stack, so the history never branches.
#[derive(Debug)]
pub struct EditorSession {
    doc: Document,
    selection: Selection,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    origin: Url,
}

impl EditorSession {
    pub fn new(origin: Url) -> Self {
        Self::from_document(Document::new(), origin)
    }

    pub fn from_document(doc: Document, origin: Url) -> Self {
        Self {
            doc,
            selection: Selection::caret(0, 0),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            origin,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Moves the selection. Selection changes are not edits and are not
    /// recorded in the history.
    pub fn select(&mut self, selection: Selection) -> Result<(), EditorError> {
        if !self.doc.contains(selection.anchor) || !self.doc.contains(selection.head) {
            return Err(EditorError::InvalidSelection);
        }
        self.selection = selection;
        Ok(())
    }

    /// Applies one command. On failure the document, selection, and history
    /// are all left exactly as they were.
    pub fn apply(&mut self, cmd: Command) -> Result<(), EditorError> {
        let snapshot = Snapshot {
            doc: self.doc.clone(),
            selection: self.selection,
        };

        let changed = apply_command(&mut self.doc, &mut self.selection, &cmd, &self.origin)?;
        if changed {
            self.undo_stack.push(snapshot);
            self.redo_stack.clear();
        }
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Restores the state before the most recent edit. Returns false when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(Snapshot {
            doc: std::mem::replace(&mut self.doc, snapshot.doc),
            selection: std::mem::replace(&mut self.selection, snapshot.selection),
        });
        true
    }

    /// Re-applies the most recently undone edit. Returns false when there
    /// is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(Snapshot {
            doc: std::mem::replace(&mut self.doc, snapshot.doc),
            selection: std::mem::replace(&mut self.selection, snapshot.selection),
        });
        true
    }

    /// The document as sanitized HTML. This is the only way markup leaves
    /// a session, mirroring the emit-on-change contract of the authoring
    /// surface: serialize, then sanitize, then hand out.
    pub fn html(&self) -> SanitizedHtml {
        sanitize(&render_html(&self.doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::document::{Align, Block, HeadingLevel, Position};

    fn origin() -> Url {
        Url::parse("http://localhost:3000").unwrap()
    }

    fn session_with_text(text: &str) -> EditorSession {
        let mut session = EditorSession::new(origin());
        session.apply(Command::InsertText(text.to_string())).unwrap();
        session
    }

    fn select_all_of_block(session: &mut EditorSession, block: usize) {
        let len = session.document().blocks[block].char_len();
        session
            .select(Selection::range(
                Position::new(block, 0),
                Position::new(block, len),
            ))
            .unwrap();
    }

    #[test]
    fn insert_text_moves_caret() {
        let session = session_with_text("hello");
        assert_eq!(session.selection(), Selection::caret(0, 5));
        assert_eq!(session.html().as_str(), "<p>hello</p>");
    }

    #[test]
    fn toggle_heading_twice_restores_document() {
        let mut session = session_with_text("title");
        select_all_of_block(&mut session, 0);
        let before = session.document().clone();

        session
            .apply(Command::ToggleHeading(HeadingLevel::H1))
            .unwrap();
        assert_eq!(session.html().as_str(), "<h1>title</h1>");

        session
            .apply(Command::ToggleHeading(HeadingLevel::H1))
            .unwrap();
        assert_eq!(session.document(), &before);
    }

    #[test]
    fn toggle_bold_twice_restores_document() {
        let mut session = session_with_text("some words");
        session
            .select(Selection::range(Position::new(0, 5), Position::new(0, 10)))
            .unwrap();
        let before = session.document().clone();

        session.apply(Command::ToggleBold).unwrap();
        assert_eq!(session.html().as_str(), "<p>some <strong>words</strong></p>");

        session.apply(Command::ToggleBold).unwrap();
        assert_eq!(session.document(), &before);
    }

    #[test]
    fn toggle_bold_leaves_unselected_text_alone() {
        let mut session = session_with_text("abc def");
        session
            .select(Selection::range(Position::new(0, 0), Position::new(0, 3)))
            .unwrap();
        session.apply(Command::ToggleBold).unwrap();

        assert_eq!(session.html().as_str(), "<p><strong>abc</strong> def</p>");
    }

    #[test]
    fn list_toggle_round_trips() {
        let mut session = session_with_text("item");
        select_all_of_block(&mut session, 0);
        let before = session.document().clone();

        session.apply(Command::ToggleBulletList).unwrap();
        assert_eq!(session.html().as_str(), "<ul><li>item</li></ul>");

        session.apply(Command::ToggleBulletList).unwrap();
        assert_eq!(session.document(), &before);
    }

    #[test]
    fn ordered_toggle_switches_list_kind() {
        let mut session = session_with_text("item");
        select_all_of_block(&mut session, 0);
        session.apply(Command::ToggleBulletList).unwrap();
        session.apply(Command::ToggleOrderedList).unwrap();

        assert_eq!(session.html().as_str(), "<ol><li>item</li></ol>");
    }

    #[test]
    fn blockquote_preserves_alignment_through_round_trip() {
        let mut session = session_with_text("quote me");
        select_all_of_block(&mut session, 0);
        session.apply(Command::SetAlign(Align::Center)).unwrap();
        let before = session.document().clone();

        session.apply(Command::ToggleBlockquote).unwrap();
        assert_eq!(
            session.html().as_str(),
            "<blockquote><p style=\"text-align: center\">quote me</p></blockquote>"
        );

        session.apply(Command::ToggleBlockquote).unwrap();
        assert_eq!(session.document(), &before);
    }

    #[test]
    fn rejected_image_url_leaves_document_unchanged() {
        let mut session = session_with_text("body");
        let before = session.document().clone();
        let history_before = session.can_undo();

        let err = session
            .apply(Command::InsertImage {
                src: "javascript:alert(1)".to_string(),
                alt: String::new(),
            })
            .unwrap_err();

        assert_eq!(err, EditorError::UnsafeUrl("javascript:alert(1)".to_string()));
        assert_eq!(session.document(), &before);
        assert_eq!(session.can_undo(), history_before);
    }

    #[test]
    fn accepted_image_url_inserts_exactly_one_image() {
        let mut session = session_with_text("body");
        session
            .apply(Command::InsertImage {
                src: "https://example.com/a.png".to_string(),
                alt: "a".to_string(),
            })
            .unwrap();

        let images: Vec<_> = session
            .document()
            .blocks
            .iter()
            .filter(|b| matches!(b, Block::Image { .. }))
            .collect();
        assert_eq!(images.len(), 1);
        assert!(
            session
                .html()
                .as_str()
                .contains(r#"<img src="https://example.com/a.png" alt="a">"#)
        );
    }

    #[test]
    fn rejected_link_url_leaves_document_unchanged() {
        let mut session = session_with_text("click here");
        select_all_of_block(&mut session, 0);
        let before = session.document().clone();

        let err = session
            .apply(Command::SetLink {
                href: "data:text/html,x".to_string(),
            })
            .unwrap_err();

        assert!(matches!(err, EditorError::UnsafeUrl(_)));
        assert_eq!(session.document(), &before);
    }

    #[test]
    fn undo_redo_restore_exact_states() {
        let mut session = session_with_text("one");
        let after_first = session.document().clone();

        session.apply(Command::InsertText(" two".to_string())).unwrap();
        let after_second = session.document().clone();

        assert!(session.undo());
        assert_eq!(session.document(), &after_first);

        assert!(session.redo());
        assert_eq!(session.document(), &after_second);

        // Two undos walk back to the empty document.
        assert!(session.undo());
        assert!(session.undo());
        assert_eq!(session.document(), &Document::new());
        assert!(!session.undo());
    }

    #[test]
    fn new_edit_clears_redo_history() {
        let mut session = session_with_text("one");
        session.apply(Command::InsertText(" two".to_string())).unwrap();
        session.undo();
        assert!(session.can_redo());

        session.apply(Command::InsertText(" three".to_string())).unwrap();
        assert!(!session.can_redo());
        assert_eq!(session.html().as_str(), "<p>one three</p>");
    }

    #[test]
    fn insert_rule_adds_trailing_paragraph() {
        let mut session = session_with_text("above");
        session.apply(Command::InsertRule).unwrap();

        assert_eq!(session.html().as_str(), "<p>above</p><hr><p></p>");
        session.apply(Command::InsertText("below".to_string())).unwrap();
        assert_eq!(session.html().as_str(), "<p>above</p><hr><p>below</p>");
    }

    #[test]
    fn caret_toggle_is_not_an_edit() {
        let mut session = session_with_text("text");
        let undo_depth_before = session.can_undo();
        session.apply(Command::ToggleBold).unwrap();
        assert_eq!(session.can_undo(), undo_depth_before);
        assert_eq!(session.html().as_str(), "<p>text</p>");
    }

    #[test]
    fn emitted_html_survives_resanitization() {
        let mut session = session_with_text("mixed content & <angles>");
        select_all_of_block(&mut session, 0);
        session.apply(Command::ToggleItalic).unwrap();
        session
            .apply(Command::SetLink {
                href: "https://x.org".to_string(),
            })
            .unwrap();

        let html = session.html();
        let again = sanitize(html.as_str());
        assert_eq!(html, again);
    }
}
