use std::env;
use std::path::PathBuf;

use crate::editor::EditorKind;
use crate::error::{DraftpadError, Result};
use crate::prompt::StdinPrompter;
use crate::storage::NoteStore;

use super::session;

/// Find the project root by looking for .draftpad/ or .git/
fn find_project_root() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut current = cwd.as_path();
    loop {
        if current.join(".draftpad").exists() || current.join(".git").exists() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return cwd,
        }
    }
}

fn open_store() -> Result<NoteStore> {
    NoteStore::open(&find_project_root())
}

pub fn handle_new(title: Option<String>, json: bool) -> Result<()> {
    let mut store = open_store()?;

    store.create(None)?;
    if let Some(title) = title {
        store.set_current_title(&title);
    }
    let note = store
        .current()
        .ok_or(DraftpadError::NoNoteSelected)?
        .clone();
    store.persist()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        println!("Created note ({}) - {}", note.id, note.title);
    }

    Ok(())
}

pub fn handle_list(json: bool) -> Result<()> {
    let store = open_store()?;

    if json {
        println!("{}", serde_json::to_string_pretty(store.notes())?);
        return Ok(());
    }

    if store.is_empty() {
        println!("No notes yet. Run 'draftpad new' to create one.");
        return Ok(());
    }

    println!("Your Notes ({})", store.len());
    for (position, note) in store.notes().iter().enumerate() {
        let marker = if store.current_id() == Some(note.id.as_str()) {
            "*"
        } else {
            " "
        };
        let stamp = note.updated_at.unwrap_or(note.created_at);
        println!(
            "{} {:>3}. [{}] {} ({})",
            marker,
            position + 1,
            note.id,
            note.title,
            stamp.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}

pub fn handle_show(id: String, json: bool) -> Result<()> {
    let store = open_store()?;
    let note = store.get(&id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(note)?);
        return Ok(());
    }

    println!("{}", note.title);
    println!("Created: {}", note.created_at.format("%Y-%m-%d %H:%M"));
    if let Some(updated) = note.updated_at {
        println!("Updated: {}", updated.format("%Y-%m-%d %H:%M"));
    }
    let text = note.document().plain_text();
    if !text.is_empty() {
        println!();
        println!("{}", text);
    }

    Ok(())
}

pub fn handle_edit(id: Option<String>, editor: String) -> Result<()> {
    let kind: EditorKind = editor
        .parse()
        .map_err(|_| DraftpadError::UnknownEditor(editor))?;

    let mut store = open_store()?;

    match id {
        Some(id) => {
            store.select(&id)?;
        }
        None if store.current_id().is_none() => {
            let note = store.create(None)?;
            println!("Created note ({}) - {}", note.id, note.title);
        }
        None => {}
    }

    session::run(&mut store, kind)?;
    store.persist()
}

pub fn handle_delete(id: String, force: bool) -> Result<()> {
    let mut store = open_store()?;
    let note_id = store.get(&id)?.id.clone();

    let mut prompter = StdinPrompter;
    if store.delete(&note_id, &mut prompter, force)? {
        store.persist()?;
        println!("Deleted note {}", note_id);
    } else {
        println!("Delete cancelled");
    }

    Ok(())
}
