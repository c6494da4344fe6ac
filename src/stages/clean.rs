use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::{debug, info};

use crate::io::{KeySource, TermStore, confirm};
use crate::models::EntryPaths;

/// Artifact type removed by `clean`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Component {
    /// flashcard.json in every entry
    FlashcardData,
    /// Entry images
    Image,
    /// Entry pronunciation audio
    Audio,
    /// dictionary_entry.json, and the entry directory once empty
    DictionaryEntry,
    /// The curator's review cursor
    History,
    /// The sanitized word list
    SanitizedVocab,
    /// Everything above
    All,
}

impl Component {
    fn includes(self, other: Component) -> bool {
        self == Component::All || self == other
    }
}

/// Where the removable artifacts live
#[derive(Debug, Clone)]
pub struct CleanTargets {
    pub store: TermStore,
    pub history: PathBuf,
    pub sanitized_vocab: PathBuf,
}

/// Existing files that cleaning `component` would remove
pub fn files_to_remove(component: Component, targets: &CleanTargets) -> Result<Vec<PathBuf>> {
    let per_entry: [(Component, fn(&EntryPaths) -> PathBuf); 4] = [
        (Component::FlashcardData, EntryPaths::flashcard),
        (Component::Image, EntryPaths::image),
        (Component::Audio, EntryPaths::audio),
        (Component::DictionaryEntry, EntryPaths::dictionary_entry),
    ];

    let mut files = Vec::new();
    for paths in targets.store.entries()? {
        for (kind, path_of) in &per_entry {
            let path = path_of(&paths);
            if component.includes(*kind) && path.exists() {
                files.push(path);
            }
        }
    }
    if component.includes(Component::History) && targets.history.exists() {
        files.push(targets.history.clone());
    }
    if component.includes(Component::SanitizedVocab) && targets.sanitized_vocab.exists() {
        files.push(targets.sanitized_vocab.clone());
    }
    Ok(files)
}

/// Execute the clean stage, asking for confirmation when `keys` is given
///
/// Returns the removed files.
pub fn execute_clean(
    component: Component,
    targets: &CleanTargets,
    keys: Option<&mut dyn KeySource>,
) -> Result<Vec<PathBuf>> {
    let files = files_to_remove(component, targets)?;
    if files.is_empty() {
        println!("Nothing to remove.");
        return Ok(files);
    }

    if let Some(keys) = keys {
        let question = format!("Remove {} files ({:?})?", files.len(), component);
        if !confirm(keys, &question)? {
            println!("Aborted.");
            return Ok(Vec::new());
        }
    }

    for file in &files {
        std::fs::remove_file(file).with_context(|| format!("Failed to remove {:?}", file))?;
        println!("Removed {}", file.display());
    }

    if component.includes(Component::DictionaryEntry) {
        remove_empty_entries(&targets.store)?;
    }

    info!("Removed {} files", files.len());
    Ok(files)
}

fn remove_empty_entries(store: &TermStore) -> Result<()> {
    for paths in store.entries()? {
        let is_empty = std::fs::read_dir(&paths.dir)?.next().is_none();
        if is_empty {
            std::fs::remove_dir(&paths.dir)
                .with_context(|| format!("Failed to remove {:?}", paths.dir))?;
            debug!("Removed empty entry directory {:?}", paths.dir);
        }
    }
    Ok(())
}
