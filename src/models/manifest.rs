use super::{EntryId, EntryPaths};

/// Which pipeline artifacts exist for one entry
///
/// Computed from the filesystem on demand; never persisted. A flag is set
/// whenever the file exists, even if it is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    pub id: EntryId,
    pub dictionary: bool,
    pub flashcard: bool,
    pub audio: bool,
    pub image: bool,
}

impl ManifestRow {
    pub fn inspect(paths: &EntryPaths) -> Self {
        Self {
            id: paths.id.clone(),
            dictionary: paths.dictionary_entry().is_file(),
            flashcard: paths.flashcard().is_file(),
            audio: paths.audio().is_file(),
            image: paths.image().is_file(),
        }
    }

    /// Presence flags in column order
    pub fn flags(&self) -> [bool; 4] {
        [self.dictionary, self.flashcard, self.audio, self.image]
    }

    pub fn is_complete(&self) -> bool {
        self.flags().iter().all(|&f| f)
    }
}
