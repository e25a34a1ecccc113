pub mod autosave;
pub mod cli;
pub mod document;
pub mod editor;
pub mod error;
pub mod note;
pub mod prompt;
pub mod storage;

pub use error::{DraftpadError, Result};
pub use note::Note;
pub use storage::NoteStore;
