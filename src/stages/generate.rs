use std::io::Write;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::error::EntryError;
use crate::io::{KeySource, TermStore};
use crate::llm::{LanguageModel, SYSTEM_PROMPT, build_flashcard_prompt, validate_flashcard};
use crate::models::{DictionaryRecord, EntryPaths, FlashcardRecord, artifact_present};

/// Result of the generate stage
#[derive(Debug, Default)]
pub struct GenerateResult {
    pub generated: usize,
    /// Entries that already had a flashcard record
    pub skipped: usize,
    /// Entries left without a record after a service or validation error
    pub failed: usize,
    /// Records the operator chose not to keep
    pub declined: usize,
}

/// Operator review of generated records before they are written
pub struct Reviewer<'a> {
    pub keys: &'a mut dyn KeySource,
    /// Editor command, e.g. `vim` or `code --wait`
    pub editor: String,
}

impl Reviewer<'_> {
    /// Show a record until the operator accepts (SPACE) or skips it
    ///
    /// `e` round-trips the record through the editor; an edit that no
    /// longer validates is discarded and the previous version shown again.
    pub fn review(
        &mut self,
        mut record: FlashcardRecord,
        entry: &DictionaryRecord,
    ) -> Result<Option<FlashcardRecord>> {
        loop {
            println!("{}", serde_json::to_string_pretty(&record)?);
            println!("SPACE = accept, e = edit, any other key = skip");

            match self.keys.read_key()? {
                ' ' => return Ok(Some(record)),
                'e' => match edit_json(&serde_json::to_value(&record)?, &self.editor) {
                    Ok(edited) => {
                        let validation = validate_flashcard(edited, entry);
                        match validation.record {
                            Some(edited) => record = edited,
                            None => warn!(
                                "Edited record is invalid: {}",
                                validation.errors.join("; ")
                            ),
                        }
                    }
                    Err(e) => warn!("Edit failed: {:#}", e),
                },
                _ => return Ok(None),
            }
        }
    }
}

/// `$EDITOR`, falling back to vim
pub fn editor_command() -> String {
    std::env::var("EDITOR")
        .ok()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| "vim".to_string())
}

/// Open JSON in an editor through a temporary file and parse the result
pub fn edit_json(value: &serde_json::Value, editor: &str) -> Result<serde_json::Value> {
    let mut file = tempfile::Builder::new()
        .prefix("flashcard-")
        .suffix(".json")
        .tempfile()
        .context("Failed to create temp file for editing")?;
    serde_json::to_writer_pretty(&mut file, value)?;
    file.flush()?;

    let mut parts = editor.split_whitespace();
    let program = parts.next().context("Editor command is empty")?;
    let status = Command::new(program)
        .args(parts)
        .arg(file.path())
        .status()
        .with_context(|| format!("Failed to launch editor '{}'", editor))?;
    if !status.success() {
        anyhow::bail!("Editor exited with {}", status);
    }

    let content = std::fs::read_to_string(file.path())?;
    serde_json::from_str(&content).context("Edited file is not valid JSON")
}

/// Execute the generate stage over every entry lacking a flashcard record
pub async fn execute_generate<M: LanguageModel>(
    model: &M,
    store: &TermStore,
    mut reviewer: Option<Reviewer<'_>>,
) -> Result<GenerateResult> {
    let mut result = GenerateResult::default();
    let entries = store.entries()?;
    info!("Generate: {} entries in {:?}", entries.len(), store.root());

    for paths in entries {
        if !artifact_present(&paths.dictionary_entry()) {
            debug!("{}: no dictionary record, skipping", paths.id);
            continue;
        }
        if artifact_present(&paths.flashcard()) {
            result.skipped += 1;
            continue;
        }

        let (record, entry) = match generate_one(model, store, &paths).await {
            Ok(generated) => generated,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                warn!("{}: {}", paths.id, e);
                result.failed += 1;
                continue;
            }
        };

        let record = match reviewer.as_mut() {
            Some(reviewer) => match reviewer.review(record, &entry)? {
                Some(record) => record,
                None => {
                    info!("{}: skipped by operator", paths.id);
                    result.declined += 1;
                    continue;
                }
            },
            None => record,
        };

        store.save_flashcard(&paths, &record)?;
        info!(
            "{}: generated (rating {}, {} examples)",
            paths.id,
            record.frequency_rating,
            record.example_sentences.len()
        );
        result.generated += 1;
    }

    info!(
        "Generate: {} generated, {} already done, {} failed, {} declined",
        result.generated, result.skipped, result.failed, result.declined
    );
    Ok(result)
}

async fn generate_one<M: LanguageModel>(
    model: &M,
    store: &TermStore,
    paths: &EntryPaths,
) -> Result<(FlashcardRecord, DictionaryRecord), EntryError> {
    let entry = store
        .load_dictionary_record(paths)
        .map_err(|e| EntryError::validation(format!("{:#}", e)))?;

    let prompt = build_flashcard_prompt(&entry);
    let response = model
        .generate(SYSTEM_PROMPT, &prompt)
        .await
        .map_err(EntryError::Service)?;

    let validation = validate_flashcard(response, &entry);
    match validation.record {
        Some(record) => Ok((record, entry)),
        None => Err(EntryError::Validation(validation.errors)),
    }
}
