//! File-backed note collection.
//!
//! The whole collection is persisted wholesale as one JSON array under
//! `.draftpad/notes.json`. There is no incremental diffing and no
//! versioning scheme; a missing file is simply the empty collection.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::document::{self, Document};
use crate::error::{DraftpadError, Result};
use crate::note::Note;
use crate::prompt::Prompter;

const DRAFTPAD_DIR: &str = ".draftpad";
const NOTES_FILE: &str = "notes.json";

pub struct NoteStore {
    notes: Vec<Note>,
    current: Option<String>,
    path: PathBuf,
}

impl NoteStore {
    /// Open the store under `root`. A missing notes file yields an empty
    /// collection; when notes exist the first one is selected.
    pub fn open(root: &Path) -> Result<Self> {
        let path = root.join(DRAFTPAD_DIR).join(NOTES_FILE);

        let notes: Vec<Note> = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            Vec::new()
        };

        let current = notes.first().map(|note| note.id.clone());

        Ok(Self {
            notes,
            current,
            path,
        })
    }

    /// Write the whole collection back to disk, creating `.draftpad/` on
    /// the first write.
    pub fn persist(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.notes)?)?;
        Ok(())
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current(&self) -> Option<&Note> {
        let id = self.current.as_deref()?;
        self.notes.iter().find(|note| note.id == id)
    }

    /// Create a note seeded with an empty document (or the given serialized
    /// state), append it, and select it.
    pub fn create(&mut self, initial_content: Option<&str>) -> Result<&Note> {
        let content = match initial_content {
            Some(content) => content.to_string(),
            None => document::to_json(&Document::empty())?,
        };

        let id = self.fresh_id();
        let title = format!("Note {}", self.notes.len() + 1);
        self.notes.push(Note::new(id.clone(), title, content));
        self.current = Some(id);

        Ok(self.notes.last().expect("note was just pushed"))
    }

    /// Overwrite the selected note's content and stamp `updated_at`. No-op
    /// when nothing is selected.
    pub fn save_current(&mut self, content: &str) {
        let Some(id) = self.current.clone() else {
            return;
        };
        if let Some(note) = self.notes.iter_mut().find(|note| note.id == id) {
            note.content = content.to_string();
            note.updated_at = Some(Utc::now());
        }
    }

    /// Rename the selected note. No-op when nothing is selected.
    pub fn set_current_title(&mut self, title: &str) {
        let Some(id) = self.current.clone() else {
            return;
        };
        if let Some(note) = self.notes.iter_mut().find(|note| note.id == id) {
            note.title = title.to_string();
        }
    }

    /// Switch the active note.
    pub fn select(&mut self, id: &str) -> Result<&Note> {
        let resolved = self.resolve_id(id)?;
        self.current = Some(resolved.clone());
        Ok(self
            .notes
            .iter()
            .find(|note| note.id == resolved)
            .expect("resolved id exists"))
    }

    /// Look a note up by id, 1-based position, or unique id prefix.
    pub fn get(&self, id: &str) -> Result<&Note> {
        let resolved = self.resolve_id(id)?;
        Ok(self
            .notes
            .iter()
            .find(|note| note.id == resolved)
            .expect("resolved id exists"))
    }

    /// Delete a note after interactive confirmation (unless forced).
    /// Declining leaves everything untouched and returns false. Removing the
    /// selected note re-selects the first remaining note, or none.
    pub fn delete(&mut self, id: &str, prompter: &mut dyn Prompter, force: bool) -> Result<bool> {
        let resolved = self.resolve_id(id)?;

        if !force && !prompter.confirm("Are you sure you want to delete this note?") {
            return Ok(false);
        }

        self.notes.retain(|note| note.id != resolved);
        if self.current.as_deref() == Some(resolved.as_str()) {
            self.current = self.notes.first().map(|note| note.id.clone());
        }

        Ok(true)
    }

    fn resolve_id(&self, id: &str) -> Result<String> {
        if self.notes.iter().any(|note| note.id == id) {
            return Ok(id.to_string());
        }

        // 1-based position, the way the sidebar numbers notes.
        if let Ok(position) = id.parse::<usize>() {
            if position >= 1 {
                if let Some(note) = self.notes.get(position - 1) {
                    return Ok(note.id.clone());
                }
            }
        }

        // Unique id prefix.
        let mut matches = self.notes.iter().filter(|note| note.id.starts_with(id));
        if let (Some(note), None) = (matches.next(), matches.next()) {
            return Ok(note.id.clone());
        }

        Err(DraftpadError::NoteNotFound(id.to_string()))
    }

    /// Epoch-millis-derived id, bumped until unique within the collection.
    fn fresh_id(&self) -> String {
        let mut millis = Utc::now().timestamp_millis();
        while self.notes.iter().any(|note| note.id == millis.to_string()) {
            millis += 1;
        }
        millis.to_string()
    }
}
