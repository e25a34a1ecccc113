//! Interactive input as an explicit collaborator.
//!
//! Operations that need user input (link URLs, delete confirmation) take a
//! `Prompter` instead of blocking on the terminal directly, so handlers can
//! run against a scripted prompter in tests.

use std::io::{self, BufRead, Write};

/// Request/response seam for modal user input. `None` means cancelled.
pub trait Prompter {
    /// Ask for a line of text. Empty input counts as cancelled.
    fn input(&mut self, prompt: &str) -> Option<String>;

    /// Ask a yes/no question. Defaults to no.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Prompter reading answers line-by-line from stdin. The prompt text is only
/// echoed when stdin is a terminal, so piped sessions stay clean.
pub struct StdinPrompter;

impl StdinPrompter {
    fn read_line(&self, prompt: &str) -> Option<String> {
        if atty::is(atty::Stream::Stdin) {
            print!("{} ", prompt);
            let _ = io::stdout().flush();
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl Prompter for StdinPrompter {
    fn input(&mut self, prompt: &str) -> Option<String> {
        match self.read_line(prompt) {
            Some(line) if !line.is_empty() => Some(line),
            _ => None,
        }
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        match self.read_line(&format!("{} [y/N]", prompt)) {
            Some(line) => matches!(line.to_lowercase().as_str(), "y" | "yes"),
            None => false,
        }
    }
}

/// Scripted prompter for tests: pops queued answers front-to-back.
#[cfg(test)]
pub struct ScriptedPrompter {
    answers: std::collections::VecDeque<Option<String>>,
    confirmations: std::collections::VecDeque<bool>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(
        answers: impl IntoIterator<Item = Option<&'static str>>,
        confirmations: impl IntoIterator<Item = bool>,
    ) -> Self {
        Self {
            answers: answers
                .into_iter()
                .map(|a| a.map(str::to_string))
                .collect(),
            confirmations: confirmations.into_iter().collect(),
        }
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn input(&mut self, _prompt: &str) -> Option<String> {
        self.answers
            .pop_front()
            .flatten()
            .filter(|s| !s.is_empty())
    }

    fn confirm(&mut self, _prompt: &str) -> bool {
        self.confirmations.pop_front().unwrap_or(false)
    }
}
