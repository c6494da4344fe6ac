use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use genanki_rs::{Deck, Package};
use tracing::{debug, info, warn};

use crate::config::AnkiConfig;
use crate::deck::{NoteFields, build_model};
use crate::io::TermStore;
use crate::models::artifact_present;

/// Result of the assemble stage
#[derive(Debug, Default)]
pub struct AssembleResult {
    pub notes: usize,
    /// Entries left out for lacking a readable flashcard record
    pub excluded: Vec<String>,
    pub media_files: usize,
}

/// Collect note fields for every entry with a flashcard record
///
/// Audio and image are optional; an entry without a usable flashcard
/// record is excluded with a warning.
pub fn collect_notes(store: &TermStore) -> Result<(Vec<NoteFields>, Vec<String>)> {
    let mut notes = Vec::new();
    let mut excluded = Vec::new();

    for paths in store.entries()? {
        if !artifact_present(&paths.flashcard()) {
            warn!("{}: no flashcard record, excluded from deck", paths.id);
            excluded.push(paths.id.to_string());
            continue;
        }
        let record = match store.load_flashcard(&paths) {
            Ok(record) => record,
            Err(e) => {
                warn!("{}: unreadable flashcard record, excluded: {:#}", paths.id, e);
                excluded.push(paths.id.to_string());
                continue;
            }
        };

        let audio = Some(paths.audio()).filter(|p| artifact_present(p));
        let image = Some(paths.image()).filter(|p| artifact_present(p));
        debug!(
            "{}: audio={} image={}",
            paths.id,
            audio.is_some(),
            image.is_some()
        );
        notes.push(NoteFields::new(
            &paths.id,
            &record,
            audio.as_deref(),
            image.as_deref(),
        ));
    }

    Ok((notes, excluded))
}

/// Execute the assemble stage and write the deck package
pub fn execute_assemble(store: &TermStore, anki: &AnkiConfig, output: &Path) -> Result<AssembleResult> {
    let (notes, excluded) = collect_notes(store)?;
    if notes.is_empty() {
        anyhow::bail!("No entries with flashcard records in {:?}", store.root());
    }

    let model = build_model(anki);
    let mut deck = Deck::new(anki.deck_id, &anki.deck_name, "Spanish vocabulary flashcards");
    let mut media: Vec<PathBuf> = Vec::new();

    for fields in &notes {
        deck.add_note(fields.to_note(&model)?);
        media.extend(fields.media.iter().cloned());
    }

    let media_paths: Vec<&str> = media.iter().filter_map(|p| p.to_str()).collect();
    if media_paths.len() != media.len() {
        warn!("Skipped {} media files with non-UTF-8 paths", media.len() - media_paths.len());
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    let output_str = output
        .to_str()
        .with_context(|| format!("Deck path is not valid UTF-8: {:?}", output))?;

    let mut package = Package::new(vec![deck], media_paths.clone())
        .map_err(|e| anyhow::anyhow!("Failed to build package: {:?}", e))?;
    package
        .write_to_file(output_str)
        .map_err(|e| anyhow::anyhow!("Failed to write deck to {:?}: {:?}", output, e))?;

    info!(
        "Wrote {} notes with {} media files to {:?} ({} excluded)",
        notes.len(),
        media_paths.len(),
        output,
        excluded.len()
    );

    Ok(AssembleResult {
        notes: notes.len(),
        excluded,
        media_files: media_paths.len(),
    })
}
