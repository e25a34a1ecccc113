//! The block editor controller.
//!
//! Holds the open document, tracks which block has focus, and applies the
//! toolbar operations to that block. Every mutation funnels through one
//! propagation path: replace the block, refresh the active-formats snapshot,
//! re-serialize, and hand the new JSON to the registered change callback.

use tracing::warn;

use crate::document::{
    self, Alignment, Block, BlockKind, Document, HeadingLevel, ListKind, TextFormat,
};
use crate::prompt::Prompter;

use super::Editor;

/// Heading selection offered by the toolbar: a level, or back to paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingChoice {
    Paragraph,
    Heading(HeadingLevel),
}

impl std::str::FromStr for HeadingChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paragraph" | "p" => Ok(HeadingChoice::Paragraph),
            other => other.parse().map(HeadingChoice::Heading),
        }
    }
}

/// Snapshot of the focused block's formatting, for toolbar highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActiveFormats {
    pub heading: Option<HeadingLevel>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub alignment: Alignment,
    pub list: Option<ListKind>,
    pub code_block: bool,
    pub quote: bool,
    pub link: bool,
}

impl ActiveFormats {
    fn of(block: &Block) -> Self {
        Self {
            heading: match block.kind {
                BlockKind::Heading(level) => Some(level),
                _ => None,
            },
            bold: block.formats.bold,
            italic: block.formats.italic,
            underline: block.formats.underline,
            strikethrough: block.formats.strikethrough,
            alignment: block.formats.alignment,
            list: match block.kind {
                BlockKind::ListItem(kind) => Some(kind),
                _ => None,
            },
            code_block: block.kind == BlockKind::Code,
            quote: block.kind == BlockKind::Quote,
            link: block.formats.link,
        }
    }
}

type ChangeCallback = Box<dyn FnMut(&str)>;

pub struct BlockEditor {
    document: Document,
    focus: Option<usize>,
    active: ActiveFormats,
    on_change: Option<ChangeCallback>,
}

impl BlockEditor {
    pub fn new() -> Self {
        let document = Document::empty();
        let active = ActiveFormats::of(&document.blocks()[0]);
        Self {
            document,
            focus: Some(0),
            active,
            on_change: None,
        }
    }

    /// Register the change callback invoked with the serialized tree after
    /// every mutation.
    pub fn on_change(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn active_formats(&self) -> &ActiveFormats {
        &self.active
    }

    /// Move focus to a block and refresh the snapshot. Out-of-range indexes
    /// are ignored.
    pub fn focus_block(&mut self, index: usize) {
        if let Some(block) = self.document.get(index) {
            self.focus = Some(index);
            self.active = ActiveFormats::of(block);
        }
    }

    /// Rewrite the focused block as a heading level or back to a paragraph.
    pub fn set_heading(&mut self, choice: HeadingChoice) {
        self.mutate_focused(|block| {
            block.kind = match choice {
                HeadingChoice::Paragraph => BlockKind::Paragraph,
                HeadingChoice::Heading(level) => BlockKind::Heading(level),
            };
        });
    }

    /// Flip a character format flag on the focused block.
    pub fn toggle_format(&mut self, format: TextFormat) {
        self.mutate_focused(|block| block.formats.toggle(format));
    }

    /// Overwrite the focused block's alignment.
    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.mutate_focused(|block| block.formats.alignment = alignment);
    }

    /// Convert the focused block to a list item of `kind`, or back to a
    /// paragraph when it already is that list kind.
    pub fn toggle_list(&mut self, kind: ListKind) {
        self.mutate_focused(|block| {
            block.kind = if block.kind == BlockKind::ListItem(kind) {
                BlockKind::Paragraph
            } else {
                BlockKind::ListItem(kind)
            };
        });
    }

    pub fn indent(&mut self) {
        self.mutate_focused(|block| block.formats.indent += 1);
    }

    /// Decrement the indent counter, floor-clamped at zero.
    pub fn outdent(&mut self) {
        self.mutate_focused(|block| {
            block.formats.indent = block.formats.indent.saturating_sub(1);
        });
    }

    /// Ask for a URL and display text, then append a markdown-style link
    /// token to the focused block. Cancelling or emptying either prompt
    /// aborts the whole operation with no mutation.
    pub fn insert_link(&mut self, prompter: &mut dyn Prompter) {
        let Some(url) = prompter.input("Enter URL:") else {
            return;
        };
        let Some(text) = prompter.input("Enter link text:") else {
            return;
        };

        self.mutate_focused(|block| {
            block.text.push_str(&format!(" [{}]({})", text, url));
            block.formats.link = true;
        });
    }

    pub fn toggle_code_block(&mut self) {
        self.mutate_focused(|block| {
            block.kind = if block.kind == BlockKind::Code {
                BlockKind::Paragraph
            } else {
                BlockKind::Code
            };
        });
    }

    pub fn toggle_quote(&mut self) {
        self.mutate_focused(|block| {
            block.kind = if block.kind == BlockKind::Quote {
                BlockKind::Paragraph
            } else {
                BlockKind::Quote
            };
        });
    }

    /// Append an empty paragraph and move focus to it.
    pub fn add_block(&mut self) {
        let index = self.document.push(Block::paragraph(""));
        self.focus = Some(index);
        self.refresh_snapshot();
        self.emit_change();
    }

    /// Replace a block's text (the typing entry point). Out-of-range
    /// indexes are ignored.
    pub fn set_block_text(&mut self, index: usize, text: impl Into<String>) {
        let Some(block) = self.document.get_mut(index) else {
            return;
        };
        block.text = text.into();
        self.refresh_snapshot();
        self.emit_change();
    }

    /// Apply `f` to the focused block and run the change funnel. Silently
    /// ignored when nothing valid has focus.
    fn mutate_focused(&mut self, f: impl FnOnce(&mut Block)) {
        let Some(block) = self.focus.and_then(|i| self.document.get_mut(i)) else {
            return;
        };
        f(block);
        self.refresh_snapshot();
        self.emit_change();
    }

    fn refresh_snapshot(&mut self) {
        self.active = match self.focus.and_then(|i| self.document.get(i)) {
            Some(block) => ActiveFormats::of(block),
            None => ActiveFormats::default(),
        };
    }

    fn emit_change(&mut self) {
        let json = self.serialize();
        if let Some(callback) = self.on_change.as_mut() {
            callback(&json);
        }
    }
}

impl Default for BlockEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor for BlockEditor {
    fn serialize(&self) -> String {
        match document::to_json(&self.document) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize document");
                String::from("{}")
            }
        }
    }

    fn deserialize(&mut self, json: &str) {
        self.replace_state(document::deserialize(json));
    }

    fn replace_state(&mut self, doc: Document) {
        self.document = doc;
        self.focus = Some(0);
        self.refresh_snapshot();
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_new_editor_has_one_empty_paragraph() {
        let editor = BlockEditor::new();
        assert_eq!(editor.document().len(), 1);
        assert_eq!(editor.document().blocks()[0].kind, BlockKind::Paragraph);
        assert_eq!(editor.focus(), Some(0));
    }

    #[test]
    fn test_set_heading_rewrites_kind() {
        let mut editor = BlockEditor::new();
        editor.set_heading(HeadingChoice::Heading(HeadingLevel::H2));
        assert_eq!(
            editor.document().blocks()[0].kind,
            BlockKind::Heading(HeadingLevel::H2)
        );
        assert_eq!(editor.active_formats().heading, Some(HeadingLevel::H2));

        editor.set_heading(HeadingChoice::Paragraph);
        assert_eq!(editor.document().blocks()[0].kind, BlockKind::Paragraph);
        assert_eq!(editor.active_formats().heading, None);
    }

    #[test]
    fn test_toggle_format_twice_restores() {
        let mut editor = BlockEditor::new();
        editor.toggle_format(TextFormat::Italic);
        assert!(editor.active_formats().italic);
        editor.toggle_format(TextFormat::Italic);
        assert!(!editor.active_formats().italic);
    }

    #[test]
    fn test_toggle_list_off_returns_to_paragraph() {
        let mut editor = BlockEditor::new();
        editor.toggle_list(ListKind::Bullet);
        assert_eq!(
            editor.document().blocks()[0].kind,
            BlockKind::ListItem(ListKind::Bullet)
        );

        // Switching kinds keeps it a list.
        editor.toggle_list(ListKind::Number);
        assert_eq!(
            editor.document().blocks()[0].kind,
            BlockKind::ListItem(ListKind::Number)
        );

        // Repeating the active kind toggles off.
        editor.toggle_list(ListKind::Number);
        assert_eq!(editor.document().blocks()[0].kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_outdent_clamped_at_zero() {
        let mut editor = BlockEditor::new();
        editor.outdent();
        assert_eq!(editor.document().blocks()[0].formats.indent, 0);

        editor.indent();
        editor.indent();
        editor.outdent();
        assert_eq!(editor.document().blocks()[0].formats.indent, 1);
    }

    #[test]
    fn test_insert_link_appends_markup() {
        let mut editor = BlockEditor::new();
        editor.set_block_text(0, "see");

        let mut prompter =
            ScriptedPrompter::new([Some("https://example.com"), Some("docs")], []);
        editor.insert_link(&mut prompter);

        assert_eq!(
            editor.document().blocks()[0].text,
            "see [docs](https://example.com)"
        );
        assert!(editor.document().blocks()[0].formats.link);
        assert!(editor.active_formats().link);
    }

    #[test]
    fn test_insert_link_cancelled_prompt_aborts() {
        let mut editor = BlockEditor::new();
        editor.set_block_text(0, "untouched");

        let mut prompter = ScriptedPrompter::new([Some("https://example.com"), None], []);
        editor.insert_link(&mut prompter);

        assert_eq!(editor.document().blocks()[0].text, "untouched");
        assert!(!editor.document().blocks()[0].formats.link);
    }

    #[test]
    fn test_toggle_code_and_quote_round_trip() {
        let mut editor = BlockEditor::new();
        editor.toggle_code_block();
        assert!(editor.active_formats().code_block);
        editor.toggle_code_block();
        assert_eq!(editor.document().blocks()[0].kind, BlockKind::Paragraph);

        editor.toggle_quote();
        assert!(editor.active_formats().quote);
        editor.toggle_quote();
        assert_eq!(editor.document().blocks()[0].kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_add_block_moves_focus() {
        let mut editor = BlockEditor::new();
        editor.toggle_format(TextFormat::Bold);
        editor.add_block();

        assert_eq!(editor.document().len(), 2);
        assert_eq!(editor.focus(), Some(1));
        // Snapshot reflects the fresh paragraph, not the old block.
        assert!(!editor.active_formats().bold);
    }

    #[test]
    fn test_focus_out_of_range_ignored() {
        let mut editor = BlockEditor::new();
        editor.focus_block(5);
        assert_eq!(editor.focus(), Some(0));
        editor.set_block_text(5, "nope");
        assert_eq!(editor.document().blocks()[0].text, "");
    }

    #[test]
    fn test_change_callback_receives_serialized_tree() {
        let seen: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&seen);

        let mut editor = BlockEditor::new();
        editor.on_change(move |json| sink.borrow_mut().push(json.to_string()));

        editor.set_block_text(0, "hello");
        editor.toggle_quote();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].contains("\"text\":\"hello\""));
        assert!(seen[1].contains("\"type\":\"quote\""));
    }

    #[test]
    fn test_deserialize_installs_document_and_focus() {
        let mut editor = BlockEditor::new();
        editor.deserialize(
            r#"{"root":{"children":[{"type":"h1","children":[{"type":"text","text":"A"}]},{"type":"paragraph","children":[{"type":"text","text":"B"}]}]}}"#,
        );

        assert_eq!(editor.document().len(), 2);
        assert_eq!(editor.focus(), Some(0));
        assert_eq!(editor.active_formats().heading, Some(HeadingLevel::H1));
    }

    #[test]
    fn test_deserialize_garbage_yields_empty_document() {
        let mut editor = BlockEditor::new();
        editor.set_block_text(0, "old");
        editor.deserialize("{{{");

        assert_eq!(editor.document().len(), 1);
        assert_eq!(editor.document().blocks()[0].text, "");
    }
}
