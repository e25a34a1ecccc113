//! Interactive edit session.
//!
//! A line-oriented loop over the active editor: plain lines replace the
//! focused block's text, `:` commands map to the toolbar operations. Edits
//! feed the autosave debouncer; the pending payload is flushed on exit so
//! the last edit always lands in the store.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::time::Instant;

use crate::autosave::Debouncer;
use crate::document::{Alignment, BlockKind, ListKind, TextFormat};
use crate::editor::{
    BlockEditor, Editor, EditorContext, EditorKind, HeadingChoice, PlainTextEditor,
};
use crate::error::Result;
use crate::prompt::{Prompter, StdinPrompter};
use crate::storage::NoteStore;

const HELP: &str = "\
Commands:
  :p :h1 :h2 :h3        set the focused block's heading level
  :bold :italic :underline :strike
                        toggle a format flag
  :left :center :right  set alignment
  :ul :ol               toggle bullet / numbered list
  :indent :outdent      adjust indentation
  :link                 insert a link (prompts for URL and text)
  :code :quote          toggle code / quote block
  :add                  append a new paragraph block
  :focus N              focus block N
  :blocks               list blocks
  :save                 save now
  :q                    quit (pending edits are saved)
Anything else replaces the focused block's text.";

pub fn run(store: &mut NoteStore, kind: EditorKind) -> Result<()> {
    // Latest change emitted by the editor, picked up after each input.
    let pending: Rc<RefCell<Option<String>>> = Rc::default();

    let mut ctx = EditorContext::new();
    match kind {
        EditorKind::Block => {
            let mut editor = BlockEditor::new();
            let sink = Rc::clone(&pending);
            editor.on_change(move |json| *sink.borrow_mut() = Some(json.to_string()));
            ctx.register(Box::new(editor));
        }
        EditorKind::Plain => ctx.register(Box::new(PlainTextEditor::new())),
    }

    if let (Some(note), Some(editor)) = (store.current(), ctx.active_mut()) {
        editor.deserialize(&note.content);
    }

    let interactive = atty::is(atty::Stream::Stdin);
    if interactive {
        let title = store
            .current()
            .map(|note| note.title.as_str())
            .unwrap_or("untitled");
        println!("Editing '{}'. ':help' for commands, ':q' to quit.", title);
    }

    let mut debouncer = Debouncer::default();
    let mut prompter = StdinPrompter;
    let stdin = io::stdin();

    loop {
        if let Some(json) = debouncer.poll(Instant::now()) {
            store.save_current(&json);
            store.persist()?;
        }

        if interactive {
            print!("> ");
            io::stdout().flush()?;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);

        let Some(editor) = ctx.active_mut() else {
            break;
        };

        let quit = match line.strip_prefix(':') {
            Some(command) => {
                dispatch(command, editor, &mut prompter, store, &mut debouncer)?
            }
            None => {
                apply_text(editor, line, &pending);
                false
            }
        };

        if let Some(json) = pending.borrow_mut().take() {
            debouncer.record(json, Instant::now());
        }

        if quit {
            break;
        }
    }

    if let Some(json) = debouncer.flush() {
        store.save_current(&json);
        store.persist()?;
    }

    Ok(())
}

fn apply_text(editor: &mut dyn Editor, line: &str, pending: &Rc<RefCell<Option<String>>>) {
    if let Some(block) = editor.as_any_mut().downcast_mut::<BlockEditor>() {
        if let Some(index) = block.focus() {
            block.set_block_text(index, line);
        }
        return;
    }

    if let Some(plain) = editor.as_any_mut().downcast_mut::<PlainTextEditor>() {
        let text = if plain.text().is_empty() {
            line.to_string()
        } else {
            format!("{}\n{}", plain.text(), line)
        };
        plain.set_text(text);
        *pending.borrow_mut() = Some(plain.serialize());
    }
}

/// Run one `:` command. Returns true when the session should end.
fn dispatch(
    command: &str,
    editor: &mut dyn Editor,
    prompter: &mut dyn Prompter,
    store: &mut NoteStore,
    debouncer: &mut Debouncer,
) -> Result<bool> {
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or("");

    match name {
        "q" | "quit" => return Ok(true),
        "help" => {
            println!("{}", HELP);
            return Ok(false);
        }
        "save" => {
            // Saving now supersedes whatever the debouncer was holding.
            debouncer.flush();
            store.save_current(&editor.serialize());
            store.persist()?;
            println!("Saved.");
            return Ok(false);
        }
        _ => {}
    }

    let Some(block) = editor.as_any_mut().downcast_mut::<BlockEditor>() else {
        eprintln!("Unknown command for this editor: :{}", name);
        return Ok(false);
    };

    match name {
        "p" | "h1" | "h2" | "h3" => match name.parse::<HeadingChoice>() {
            Ok(choice) => block.set_heading(choice),
            Err(e) => eprintln!("{}", e),
        },
        "bold" | "italic" | "underline" | "strike" => match name.parse::<TextFormat>() {
            Ok(format) => block.toggle_format(format),
            Err(e) => eprintln!("{}", e),
        },
        "left" | "center" | "right" => match name.parse::<Alignment>() {
            Ok(alignment) => block.set_alignment(alignment),
            Err(e) => eprintln!("{}", e),
        },
        "ul" => block.toggle_list(ListKind::Bullet),
        "ol" => block.toggle_list(ListKind::Number),
        "indent" => block.indent(),
        "outdent" => block.outdent(),
        "link" => block.insert_link(prompter),
        "code" => block.toggle_code_block(),
        "quote" => block.toggle_quote(),
        "add" => block.add_block(),
        "focus" => match parts.next().and_then(|n| n.parse::<usize>().ok()) {
            Some(n) if n >= 1 => block.focus_block(n - 1),
            _ => eprintln!("Usage: :focus N"),
        },
        "blocks" => print_blocks(block),
        other => eprintln!("Unknown command: :{}", other),
    }

    Ok(false)
}

fn print_blocks(editor: &BlockEditor) {
    for (index, block) in editor.document().blocks().iter().enumerate() {
        let marker = if editor.focus() == Some(index) { ">" } else { " " };
        let tag = match block.kind {
            BlockKind::Paragraph => "p".to_string(),
            BlockKind::Heading(level) => level.to_string(),
            BlockKind::ListItem(kind) => match kind {
                ListKind::Bullet => "ul".to_string(),
                ListKind::Number => "ol".to_string(),
            },
            BlockKind::Quote => "quote".to_string(),
            BlockKind::Code => "code".to_string(),
        };
        println!("{} {:>3}. [{}] {}", marker, index + 1, tag, block.text);
    }
}
