//! Editor variants and the context that holds the active one.

mod block_editor;
mod plain;

pub use block_editor::{ActiveFormats, BlockEditor, HeadingChoice};
pub use plain::PlainTextEditor;

use crate::document::Document;

/// Common surface of the interchangeable editor implementations.
///
/// `deserialize` is total: malformed input degrades to the seeded empty
/// document instead of failing.
pub trait Editor {
    /// Current state as document-tree JSON.
    fn serialize(&self) -> String;

    /// Load state from document-tree JSON.
    fn deserialize(&mut self, json: &str);

    /// Install an already-built document.
    fn replace_state(&mut self, doc: Document);

    /// Downcast hook so a host can reach variant-specific operations on the
    /// editor it registered.
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// Which editor implementation a session should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorKind {
    #[default]
    Block,
    Plain,
}

impl std::str::FromStr for EditorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "block" => Ok(EditorKind::Block),
            "plain" => Ok(EditorKind::Plain),
            _ => Err(format!("Invalid editor kind: {}", s)),
        }
    }
}

/// Single-slot holder for the active editor of one open document view.
///
/// Empty until an editor registers; a later registration replaces the
/// earlier one (a view shows one document at a time).
#[derive(Default)]
pub struct EditorContext {
    active: Option<Box<dyn Editor>>,
}

impl EditorContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an editor as the active instance. Last registration wins.
    pub fn register(&mut self, editor: Box<dyn Editor>) {
        self.active = Some(editor);
    }

    pub fn active(&self) -> Option<&dyn Editor> {
        self.active.as_deref()
    }

    pub fn active_mut(&mut self) -> Option<&mut (dyn Editor + 'static)> {
        self.active.as_deref_mut()
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}
