use anyhow::{Context, Result};
use console::{Key, Term};

/// Source of operator input for the interactive stages
pub trait KeySource {
    /// Block until a single key is pressed
    fn read_key(&mut self) -> Result<char>;

    /// Read a full line after showing `prompt`
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Keys read from the controlling terminal without waiting for Enter
pub struct TerminalKeys {
    term: Term,
}

impl TerminalKeys {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Default for TerminalKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for TerminalKeys {
    fn read_key(&mut self) -> Result<char> {
        loop {
            match self.term.read_key().context("Failed to read key")? {
                Key::Char(c) => return Ok(c),
                Key::Enter => return Ok('\n'),
                Key::Escape => return Ok('\u{1b}'),
                // arrows, function keys and the like carry no command
                _ => continue,
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.term.write_str(prompt)?;
        Ok(self.term.read_line().context("Failed to read line")?.trim().to_string())
    }
}

/// Ask a yes/no question; only `y`/`Y` confirms
pub fn confirm(keys: &mut dyn KeySource, question: &str) -> Result<bool> {
    println!("{} [y/N]", question);
    Ok(matches!(keys.read_key()?, 'y' | 'Y'))
}

/// Pre-recorded input for driving interactive loops in tests
#[cfg(test)]
pub struct ScriptedKeys {
    keys: std::collections::VecDeque<char>,
    lines: std::collections::VecDeque<String>,
}

#[cfg(test)]
impl ScriptedKeys {
    pub fn new(keys: &str) -> Self {
        Self {
            keys: keys.chars().collect(),
            lines: Default::default(),
        }
    }

    pub fn with_lines(mut self, lines: &[&str]) -> Self {
        self.lines = lines.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

#[cfg(test)]
impl KeySource for ScriptedKeys {
    fn read_key(&mut self) -> Result<char> {
        self.keys.pop_front().context("Scripted keys exhausted")
    }

    fn read_line(&mut self, _prompt: &str) -> Result<String> {
        self.lines.pop_front().context("Scripted lines exhausted")
    }
}
