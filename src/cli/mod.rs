mod commands;
mod handlers;
mod session;

pub use commands::{Cli, Commands};
pub use handlers::{handle_delete, handle_edit, handle_list, handle_new, handle_show};
