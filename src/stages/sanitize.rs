use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::io::{read_word_list, write_word_list};
use crate::lemmatize::Lemmatizer;

/// Result of the sanitize stage
#[derive(Debug)]
pub struct SanitizeResult {
    /// Non-blank lines in the raw list
    pub lines_read: usize,
    /// Unique lemmas written
    pub lemmas: Vec<String>,
}

/// First whitespace-separated token of each line
///
/// Raw lists are often pasted from glossaries ("comer - to eat"), so only
/// the leading word is kept.
pub fn first_tokens(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_lowercase)
        .collect()
}

/// Execute the sanitize stage: raw list in, lemma list out
pub fn execute_sanitize(input: &Path, output: &Path, lemmatizer: &Lemmatizer) -> Result<SanitizeResult> {
    info!("Reading raw vocabulary from {:?}", input);
    let lines = read_word_list(input)?;
    let tokens = first_tokens(&lines);
    info!("Lemmatizing {} words", tokens.len());

    let lemmas = lemmatizer.lemmatize_all(&tokens);
    write_word_list(output, &lemmas)?;

    info!(
        "Wrote {} unique lemmas to {:?} ({} lines dropped or merged)",
        lemmas.len(),
        output,
        lines.len() - lemmas.len()
    );

    Ok(SanitizeResult {
        lines_read: lines.len(),
        lemmas,
    })
}
