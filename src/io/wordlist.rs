use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a word list, one word per line, skipping blank lines
///
/// Invalid UTF-8 is replaced rather than rejected; a malformed file yields
/// whatever words can be recovered.
pub fn read_word_list(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    Ok(parse_word_list(&String::from_utf8_lossy(&bytes)))
}

pub fn parse_word_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Write a word list, one word per line
pub fn write_word_list(path: &Path, words: &[String]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    for word in words {
        writeln!(file, "{}", word)?;
    }
    Ok(())
}
