use std::fmt;
use std::path::{Path, PathBuf};

/// Dictionary record written by the curator
pub const DICTIONARY_ENTRY_FILE: &str = "dictionary_entry.json";
/// Flashcard record written by the generator
pub const FLASHCARD_FILE: &str = "flashcard.json";
pub const AUDIO_EXTENSION: &str = "mp3";
pub const IMAGE_EXTENSION: &str = "png";

/// Identifier of a vocabulary entry, e.g. `comer` or `menos:3`
///
/// The numeric suffix disambiguates homonyms and senses. The id is also the
/// name of the entry's directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The word without its sense suffix
    pub fn word(&self) -> &str {
        self.split().0
    }

    /// Sense index, if the id carries one
    pub fn sense(&self) -> Option<u32> {
        self.split().1
    }

    /// Stem for media files; distinct for every sense of a word
    pub fn file_stem(&self) -> String {
        match self.sense() {
            Some(sense) => format!("{}-{}", self.word(), sense),
            None => self.word().to_string(),
        }
    }

    fn split(&self) -> (&str, Option<u32>) {
        if let Some((word, suffix)) = self.0.rsplit_once(':') {
            if let Ok(sense) = suffix.parse::<u32>() {
                return (word, Some(sense));
            }
        }
        (&self.0, None)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Artifact locations inside one entry directory
#[derive(Debug, Clone)]
pub struct EntryPaths {
    pub id: EntryId,
    pub dir: PathBuf,
}

impl EntryPaths {
    pub fn new(terms_dir: &Path, id: EntryId) -> Self {
        let dir = terms_dir.join(id.as_str());
        Self { id, dir }
    }

    /// Build from an existing entry directory; the directory name is the id
    pub fn from_dir(dir: &Path) -> Option<Self> {
        let name = dir.file_name()?.to_str()?;
        Some(Self {
            id: EntryId::new(name),
            dir: dir.to_path_buf(),
        })
    }

    pub fn dictionary_entry(&self) -> PathBuf {
        self.dir.join(DICTIONARY_ENTRY_FILE)
    }

    pub fn flashcard(&self) -> PathBuf {
        self.dir.join(FLASHCARD_FILE)
    }

    pub fn audio(&self) -> PathBuf {
        self.dir
            .join(format!("{}.{}", self.id.file_stem(), AUDIO_EXTENSION))
    }

    pub fn image(&self) -> PathBuf {
        self.dir
            .join(format!("{}.{}", self.id.file_stem(), IMAGE_EXTENSION))
    }
}

/// Whether a stage output is usable: the file exists and is not empty
pub fn artifact_present(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}
