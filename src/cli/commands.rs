use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "draftpad")]
#[command(version, about = "A local-first, block-based note-taking tool")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new note
    New {
        /// Note title (defaults to "Note {n}")
        #[arg(long)]
        title: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List notes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single note
    Show {
        /// Note id, 1-based position, or id prefix
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open a note in an interactive edit session
    Edit {
        /// Note id (defaults to the selected note, creating one if none exist)
        id: Option<String>,

        /// Editor implementation (block, plain)
        #[arg(long, default_value = "block")]
        editor: String,
    },

    /// Delete a note
    Delete {
        /// Note id, 1-based position, or id prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}
