use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::io::{read_json, write_json};
use crate::models::{
    CreatedArtifacts, DictionaryEntry, DictionaryRecord, EntryId, EntryPaths, FlashcardRecord,
    artifact_present,
};

/// The `terms/` directory: one subdirectory per accepted entry
#[derive(Debug, Clone)]
pub struct TermStore {
    root: PathBuf,
}

impl TermStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn paths(&self, id: &EntryId) -> EntryPaths {
        EntryPaths::new(&self.root, id.clone())
    }

    /// An entry exists once its dictionary record is written
    pub fn exists(&self, id: &EntryId) -> bool {
        artifact_present(&self.paths(id).dictionary_entry())
    }

    /// All entry directories, sorted by name
    ///
    /// A missing root is an empty store.
    pub fn entries(&self) -> Result<Vec<EntryPaths>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for item in std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list terms directory: {:?}", self.root))?
        {
            let item = item?;
            if item.file_type()?.is_dir() {
                if let Some(paths) = EntryPaths::from_dir(&item.path()) {
                    entries.push(paths);
                }
            }
        }
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(entries)
    }

    /// Create the entry directory and write its dictionary record
    pub fn save_dictionary_entry(&self, entry: &DictionaryEntry) -> Result<EntryPaths> {
        let paths = self.paths(&entry.id);
        std::fs::create_dir_all(&paths.dir)
            .with_context(|| format!("Failed to create entry directory: {:?}", paths.dir))?;
        write_json(&paths.dictionary_entry(), &entry.to_record())?;
        info!("Saved entry '{}'", entry.id);
        Ok(paths)
    }

    pub fn save_audio(&self, id: &EntryId, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.paths(id).audio();
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write audio: {:?}", path))?;
        debug!("Wrote {} bytes of audio to {:?}", bytes.len(), path);
        Ok(path)
    }

    pub fn load_dictionary_record(&self, paths: &EntryPaths) -> Result<DictionaryRecord> {
        read_json(&paths.dictionary_entry())
    }

    pub fn load_flashcard(&self, paths: &EntryPaths) -> Result<FlashcardRecord> {
        read_json(&paths.flashcard())
    }

    pub fn save_flashcard(&self, paths: &EntryPaths, record: &FlashcardRecord) -> Result<()> {
        write_json(&paths.flashcard(), record)
    }

    /// Undo one accept: remove the dictionary record, plus the audio and the
    /// directory when that accept created them
    ///
    /// Flashcards and images written by later stages stay, and so does the
    /// directory holding them.
    pub fn remove_accepted(&self, id: &EntryId, created: CreatedArtifacts) -> Result<()> {
        let paths = self.paths(id);
        remove_if_exists(&paths.dictionary_entry())?;
        if created.audio {
            remove_if_exists(&paths.audio())?;
        }

        if created.entry_dir && is_empty_dir(&paths.dir) {
            std::fs::remove_dir(&paths.dir)
                .with_context(|| format!("Failed to remove entry directory: {:?}", paths.dir))?;
        } else if paths.dir.exists() {
            debug!("Keeping entry directory {:?}", paths.dir);
        }
        info!("Removed entry '{}'", id);
        Ok(())
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("{:?} was already gone", path);
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to remove {:?}", path)),
    }
}

fn is_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut items| items.next().is_none())
        .unwrap_or(false)
}
