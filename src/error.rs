use thiserror::Error;

#[derive(Error, Debug)]
pub enum DraftpadError {
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("No note selected")]
    NoNoteSelected,

    #[error("Unknown editor kind: {0}")]
    UnknownEditor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DraftpadError>;
