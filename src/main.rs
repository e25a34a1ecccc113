use clap::Parser;
use draftpad::cli::{
    handle_delete, handle_edit, handle_list, handle_new, handle_show, Cli, Commands,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::New { title, json } => handle_new(title, json),
        Commands::List { json } => handle_list(json),
        Commands::Show { id, json } => handle_show(id, json),
        Commands::Edit { id, editor } => handle_edit(id, editor),
        Commands::Delete { id, force } => handle_delete(id, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
