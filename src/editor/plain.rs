//! Plain-text fallback editor.
//!
//! Holds the whole note as one text buffer. Serializes to a single-paragraph
//! document tree and loads by best-effort text extraction, so it can open
//! anything the block editor wrote (losing structure, keeping words).

use crate::document::{self, Block, Document};

use super::Editor;

#[derive(Default)]
pub struct PlainTextEditor {
    text: String,
}

impl PlainTextEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Editor for PlainTextEditor {
    fn serialize(&self) -> String {
        let doc = Document::from_blocks(vec![Block::paragraph(self.text.clone())]);
        match document::to_json(&doc) {
            Ok(json) => json,
            Err(_) => String::from("{}"),
        }
    }

    fn deserialize(&mut self, json: &str) {
        self.replace_state(document::deserialize(json));
    }

    fn replace_state(&mut self, doc: Document) {
        self.text = doc.plain_text();
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
