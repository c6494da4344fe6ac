use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use console::style;
use tracing::{debug, error, info, warn};

use crate::error::EntryError;
use crate::io::{KeySource, TermStore, read_json, write_json_atomic};
use crate::models::{CreatedArtifacts, Decision, DictionaryEntry, EntryId, ReviewCursor, Verdict};
use crate::services::DictionaryService;

const HELP: &str = "y = accept, n = reject, u = undo, q = quit";

/// The entry currently awaiting a decision
#[derive(Debug, Clone)]
pub struct Review {
    pub headword_index: usize,
    pub word: String,
    pub entry: DictionaryEntry,
    /// 1-based position of this sense among the word's senses
    pub sense: usize,
    pub senses: usize,
}

/// Resumable accept/reject/undo review over the sanitized word list
///
/// Every transition is flushed to the cursor file before the next key is
/// read, so an interrupted session loses at most the step in flight.
pub struct Curator<D> {
    dictionary: D,
    store: TermStore,
    words: Vec<String>,
    cursor: ReviewCursor,
    cursor_path: PathBuf,
    lookups: HashMap<String, Vec<DictionaryEntry>>,
}

impl<D: DictionaryService> Curator<D> {
    /// Resume from the cursor file, or start at the top of the list
    pub fn new(
        dictionary: D,
        store: TermStore,
        words: Vec<String>,
        cursor_path: PathBuf,
    ) -> Result<Self> {
        let mut cursor: ReviewCursor = if cursor_path.exists() {
            read_json(&cursor_path)?
        } else {
            ReviewCursor::default()
        };
        cursor.clamp(words.len());

        if cursor.headword_index > 0 {
            info!(
                "Resuming at word {} of {} ({} decisions so far)",
                cursor.headword_index + 1,
                words.len(),
                cursor.history.len()
            );
        }

        Ok(Self {
            dictionary,
            store,
            words,
            cursor,
            cursor_path,
            lookups: HashMap::new(),
        })
    }

    pub fn cursor(&self) -> &ReviewCursor {
        &self.cursor
    }

    /// Move to the next entry that needs a decision
    ///
    /// Words without dictionary entries, and entries already in the store,
    /// are stepped over. A failed lookup leaves the cursor on the word so the
    /// next session retries it.
    pub async fn advance(&mut self) -> Result<Option<Review>, EntryError> {
        loop {
            if self.cursor.is_finished(self.words.len()) {
                return Ok(None);
            }
            let headword_index = self.cursor.headword_index;
            let word = self.words[headword_index].clone();
            let entries = self.entries_for(&word).await?;

            if let Some(entry) = entries.get(self.cursor.entry_index) {
                if self.store.exists(&entry.id) {
                    info!("Skipping '{}': already processed", entry.id);
                    self.cursor.skip_entry(entries.len());
                    self.persist()?;
                    continue;
                }
                return Ok(Some(Review {
                    headword_index,
                    entry: entry.clone(),
                    sense: self.cursor.entry_index + 1,
                    senses: entries.len(),
                    word,
                }));
            }

            if entries.is_empty() {
                info!("No dictionary entries for '{}', skipping", word);
            }
            self.cursor.next_headword();
            self.persist()?;
        }
    }

    /// Persist the entry and its audio, then move past it
    ///
    /// Audio is fetched before anything is written, so a failed fetch leaves
    /// the store untouched and the cursor where it was. Audio already on disk
    /// is kept as is.
    pub async fn accept(&mut self, review: &Review) -> Result<(), EntryError> {
        let entry = &review.entry;
        let paths = self.store.paths(&entry.id);

        let audio = if paths.audio().exists() {
            debug!("Keeping existing audio for '{}'", entry.id);
            None
        } else {
            let fetched = self
                .dictionary
                .fetch_audio(entry)
                .await
                .map_err(EntryError::Service)?;
            if fetched.is_none() {
                warn!("No pronunciation audio for '{}'", entry.id);
            }
            fetched
        };

        let created = CreatedArtifacts {
            entry_dir: !paths.dir.exists(),
            audio: audio.is_some(),
        };
        let saved = self.store.save_dictionary_entry(entry).and_then(|_| match &audio {
            Some(bytes) => self.store.save_audio(&entry.id, bytes).map(|_| ()),
            None => Ok(()),
        });
        if let Err(e) = saved {
            self.store
                .remove_accepted(&entry.id, created)
                .map_err(EntryError::Io)?;
            return Err(EntryError::Io(e));
        }

        self.cursor
            .record_accept(entry.id.as_str(), review.senses, created);
        self.persist()
    }

    pub fn reject(&mut self, review: &Review) -> Result<(), EntryError> {
        self.cursor
            .record(Verdict::Rejected, review.entry.id.as_str(), review.senses);
        self.persist()
    }

    /// Rewind to the last decision, removing what it created if it was an accept
    pub fn undo(&mut self) -> Result<Option<Decision>, EntryError> {
        let Some(decision) = self.cursor.rewind() else {
            return Ok(None);
        };
        self.persist()?;

        if decision.verdict == Verdict::Accepted {
            self.store
                .remove_accepted(&EntryId::new(decision.entry_id.as_str()), decision.created)
                .map_err(EntryError::Io)?;
        }
        Ok(Some(decision))
    }

    async fn entries_for(&mut self, word: &str) -> Result<Vec<DictionaryEntry>, EntryError> {
        if let Some(entries) = self.lookups.get(word) {
            return Ok(entries.clone());
        }
        let entries = self
            .dictionary
            .look_up(word)
            .await
            .map_err(EntryError::Service)?;
        self.lookups.insert(word.to_string(), entries.clone());
        Ok(entries)
    }

    fn persist(&self) -> Result<(), EntryError> {
        write_json_atomic(&self.cursor_path, &self.cursor).map_err(EntryError::Io)
    }
}

/// How a review session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Every word has been reviewed
    Finished,
    /// The operator pressed quit
    Quit,
    /// The dictionary lookup failed; the current word stays pending
    LookupFailed,
}

#[derive(Debug)]
pub struct SessionSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub undone: usize,
    pub end: SessionEnd,
}

/// Drive the curator from operator keys until the list ends or `q`
pub async fn run_session<D: DictionaryService>(
    curator: &mut Curator<D>,
    keys: &mut impl KeySource,
) -> Result<SessionSummary> {
    let mut summary = SessionSummary {
        accepted: 0,
        rejected: 0,
        undone: 0,
        end: SessionEnd::Finished,
    };

    'words: loop {
        let review = match curator.advance().await {
            Ok(Some(review)) => review,
            Ok(None) => {
                println!("{}", style("All words reviewed.").green());
                break;
            }
            Err(e) if !e.is_fatal() => {
                error!("Lookup failed, stopping session: {}", e);
                summary.end = SessionEnd::LookupFailed;
                break;
            }
            Err(e) => return Err(e.into()),
        };

        print_review(&review, curator.words.len());

        loop {
            let outcome = match keys.read_key()? {
                'y' => curator.accept(&review).await.map(|_| {
                    summary.accepted += 1;
                    println!("{} {}", style("Accepted").green(), review.entry.id);
                }),
                'n' => curator.reject(&review).map(|_| {
                    summary.rejected += 1;
                    println!("{} {}", style("Rejected").red(), review.entry.id);
                }),
                'u' => curator.undo().map(|decision| match decision {
                    Some(decision) => {
                        summary.undone += 1;
                        println!("{} {}", style("Undid").yellow(), decision.entry_id);
                    }
                    None => println!("Nothing to undo."),
                }),
                'q' => {
                    summary.end = SessionEnd::Quit;
                    break 'words;
                }
                _ => {
                    println!("{}", HELP);
                    continue;
                }
            };

            match outcome {
                Ok(()) => continue 'words,
                Err(e) if !e.is_fatal() => {
                    error!("Could not accept '{}': {}", review.entry.id, e);
                    println!("{}", HELP);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    info!(
        "Session ended ({:?}): {} accepted, {} rejected, {} undone",
        summary.end, summary.accepted, summary.rejected, summary.undone
    );
    Ok(summary)
}

/// "Meaning i of n" for words with several senses
pub fn meaning_label(sense: usize, senses: usize) -> Option<String> {
    (senses > 1).then(|| format!("Meaning {} of {}", sense, senses))
}

fn print_review(review: &Review, word_count: usize) {
    println!();
    println!(
        "[{}/{}] {}  {}",
        review.headword_index + 1,
        word_count,
        style(&review.entry.headword).bold(),
        style(&review.entry.part_of_speech).italic()
    );
    if let Some(label) = meaning_label(review.sense, review.senses) {
        println!("{}", style(label).dim());
    }
    for (i, definition) in review.entry.definitions.iter().enumerate() {
        println!("  {}. {}", i + 1, definition);
    }
    println!("{}", style(HELP).dim());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ScriptedKeys;
    use crate::models::{EntryPaths, ReviewState};
    use serde_json::json;
    use std::cell::Cell;
    use std::collections::HashSet;

    fn entry(id: &str, definition: &str) -> DictionaryEntry {
        let word = id.split(':').next().unwrap();
        DictionaryEntry::from_merriam_webster(&json!({
            "meta": {"id": id, "lang": "es"},
            "hwi": {"hw": word, "prs": [{"sound": {"audio": format!("{}001", word)}}]},
            "fl": "noun",
            "shortdef": [definition]
        }))
        .unwrap()
    }

    #[derive(Default)]
    struct FakeDictionary {
        entries: HashMap<String, Vec<DictionaryEntry>>,
        failing_lookups: HashSet<String>,
        failing_audio: bool,
        lookups: Cell<usize>,
    }

    impl FakeDictionary {
        fn with_words() -> Self {
            let mut entries = HashMap::new();
            entries.insert("comer".to_string(), vec![entry("comer", "to eat")]);
            entries.insert(
                "menos".to_string(),
                vec![entry("menos:1", "less"), entry("menos:2", "minus")],
            );
            entries.insert("casa".to_string(), vec![entry("casa", "house")]);
            Self {
                entries,
                ..Default::default()
            }
        }
    }

    impl DictionaryService for FakeDictionary {
        async fn look_up(&self, word: &str) -> Result<Vec<DictionaryEntry>> {
            self.lookups.set(self.lookups.get() + 1);
            if self.failing_lookups.contains(word) {
                anyhow::bail!("503 Service Unavailable");
            }
            Ok(self.entries.get(word).cloned().unwrap_or_default())
        }

        async fn fetch_audio(&self, entry: &DictionaryEntry) -> Result<Option<Vec<u8>>> {
            if self.failing_audio {
                anyhow::bail!("timeout");
            }
            Ok(entry.audio.as_ref().map(|_| b"ID3".to_vec()))
        }
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    struct Fixture {
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
            }
        }

        fn store(&self) -> TermStore {
            TermStore::new(self.dir.path().join("terms"))
        }

        fn cursor_path(&self) -> PathBuf {
            self.dir.path().join("curator_history.json")
        }

        fn curator(&self, dictionary: FakeDictionary, list: &[&str]) -> Curator<FakeDictionary> {
            Curator::new(dictionary, self.store(), words(list), self.cursor_path()).unwrap()
        }

        fn stored_ids(&self) -> Vec<String> {
            self.store()
                .entries()
                .unwrap()
                .into_iter()
                .map(|p| p.id.to_string())
                .collect()
        }
    }

    #[tokio::test]
    async fn test_accept_then_undo_restores_prior_state() {
        let fx = Fixture::new();
        let mut curator = fx.curator(FakeDictionary::with_words(), &["comer", "casa"]);

        let review = curator.advance().await.unwrap().unwrap();
        let before = curator.cursor().clone();

        curator.accept(&review).await.unwrap();
        let paths = fx.store().paths(&EntryId::new("comer"));
        assert!(paths.dictionary_entry().exists());
        assert!(paths.audio().exists());
        assert_eq!(curator.cursor().headword_index, 1);

        let undone = curator.undo().unwrap().unwrap();
        assert_eq!(undone.entry_id, "comer");
        assert_eq!(curator.cursor(), &before);
        assert!(!paths.dir.exists());

        let persisted: ReviewCursor = read_json(&fx.cursor_path()).unwrap();
        assert_eq!(persisted, before);
    }

    /// An entry directory holding later-stage work but no dictionary record
    fn seed_generated(fx: &Fixture, id: &str) -> EntryPaths {
        let paths = fx.store().paths(&EntryId::new(id));
        std::fs::create_dir_all(&paths.dir).unwrap();
        std::fs::write(paths.flashcard(), "{}").unwrap();
        std::fs::write(paths.image(), b"png").unwrap();
        paths
    }

    #[tokio::test]
    async fn test_existing_entries_are_skipped() {
        let fx = Fixture::new();
        let comer = seed_generated(&fx, "comer");
        std::fs::write(comer.dictionary_entry(), "{\"word\": \"comer\"}").unwrap();
        let mut curator = fx.curator(FakeDictionary::with_words(), &["comer", "casa"]);
        let mut keys = ScriptedKeys::new("yuq");

        let summary = run_session(&mut curator, &mut keys).await.unwrap();
        assert_eq!((summary.accepted, summary.undone), (1, 1));
        assert!(curator.cursor().history.is_empty());
        assert_eq!(curator.cursor().headword_index, 1);

        let record = std::fs::read_to_string(comer.dictionary_entry()).unwrap();
        assert_eq!(record, "{\"word\": \"comer\"}");
        assert!(comer.flashcard().exists());
        assert!(comer.image().exists());
        assert_eq!(fx.stored_ids(), vec!["comer"]);
    }

    #[tokio::test]
    async fn test_undo_into_populated_directory_keeps_later_work() {
        let fx = Fixture::new();
        let comer = seed_generated(&fx, "comer");
        let mut curator = fx.curator(FakeDictionary::with_words(), &["comer"]);

        let review = curator.advance().await.unwrap().unwrap();
        curator.accept(&review).await.unwrap();
        assert!(comer.dictionary_entry().exists());
        assert!(comer.audio().exists());

        curator.undo().unwrap().unwrap();
        assert!(!comer.dictionary_entry().exists());
        assert!(!comer.audio().exists());
        assert!(comer.flashcard().exists());
        assert!(comer.image().exists());
    }

    #[tokio::test]
    async fn test_undo_from_earlier_session_keeps_generated_files() {
        let fx = Fixture::new();
        let mut curator = fx.curator(FakeDictionary::with_words(), &["comer", "casa"]);
        let mut keys = ScriptedKeys::new("yq");
        run_session(&mut curator, &mut keys).await.unwrap();

        // later stages fill the directory between sessions
        let comer = fx.store().paths(&EntryId::new("comer"));
        std::fs::write(comer.flashcard(), "{}").unwrap();
        std::fs::write(comer.image(), b"png").unwrap();

        let mut resumed = fx.curator(FakeDictionary::with_words(), &["comer", "casa"]);
        let mut keys = ScriptedKeys::new("uq");
        run_session(&mut resumed, &mut keys).await.unwrap();

        assert!(!comer.dictionary_entry().exists());
        assert!(!comer.audio().exists());
        assert!(comer.flashcard().exists());
        assert!(comer.image().exists());
        assert_eq!(resumed.cursor().headword_index, 0);
    }

    #[tokio::test]
    async fn test_audio_failure_leaves_populated_directory_alone() {
        let fx = Fixture::new();
        let comer = seed_generated(&fx, "comer");
        let dictionary = FakeDictionary {
            failing_audio: true,
            ..FakeDictionary::with_words()
        };
        let mut curator = fx.curator(dictionary, &["comer"]);
        let mut keys = ScriptedKeys::new("yq");

        let summary = run_session(&mut curator, &mut keys).await.unwrap();
        assert_eq!(summary.accepted, 0);
        assert!(!comer.dictionary_entry().exists());
        assert!(comer.flashcard().exists());
        assert!(comer.image().exists());
        assert_eq!(curator.cursor(), &ReviewCursor::default());
    }

    #[tokio::test]
    async fn test_existing_audio_is_kept_and_survives_undo() {
        let fx = Fixture::new();
        let comer = fx.store().paths(&EntryId::new("comer"));
        std::fs::create_dir_all(&comer.dir).unwrap();
        std::fs::write(comer.audio(), b"original").unwrap();
        let dictionary = FakeDictionary {
            failing_audio: true,
            ..FakeDictionary::with_words()
        };
        let mut curator = fx.curator(dictionary, &["comer"]);

        let review = curator.advance().await.unwrap().unwrap();
        curator.accept(&review).await.unwrap();
        assert_eq!(std::fs::read(comer.audio()).unwrap(), b"original");

        curator.undo().unwrap().unwrap();
        assert_eq!(std::fs::read(comer.audio()).unwrap(), b"original");
        assert!(!comer.dictionary_entry().exists());
    }

    #[tokio::test]
    async fn test_quit_persists_and_resumes_at_next_sense() {
        let fx = Fixture::new();
        let mut curator = fx.curator(FakeDictionary::with_words(), &["comer", "menos"]);
        let mut keys = ScriptedKeys::new("ynq");

        let summary = run_session(&mut curator, &mut keys).await.unwrap();
        assert_eq!(summary.end, SessionEnd::Quit);
        assert_eq!((summary.accepted, summary.rejected), (1, 1));
        assert_eq!(fx.stored_ids(), vec!["comer"]);

        let mut resumed = fx.curator(FakeDictionary::with_words(), &["comer", "menos"]);
        assert_eq!(resumed.cursor().state_of(0, 0), ReviewState::Accepted);
        assert_eq!(resumed.cursor().state_of(1, 0), ReviewState::Rejected);
        let review = resumed.advance().await.unwrap().unwrap();
        assert_eq!(review.entry.id, EntryId::new("menos:2"));
        assert_eq!((review.sense, review.senses), (2, 2));
    }

    #[tokio::test]
    async fn test_words_without_entries_are_skipped_and_undo_steps_over_them() {
        let fx = Fixture::new();
        let mut curator = fx.curator(
            FakeDictionary::with_words(),
            &["comer", "xyzzy", "casa", "menos"],
        );
        let mut keys = ScriptedKeys::new("yyuq");

        let summary = run_session(&mut curator, &mut keys).await.unwrap();
        assert_eq!((summary.accepted, summary.undone), (2, 1));

        assert_eq!(fx.stored_ids(), vec!["comer"]);
        assert_eq!(curator.cursor().headword_index, 2);
        assert_eq!(curator.cursor().history.len(), 1);
    }

    #[tokio::test]
    async fn test_finished_list() {
        let fx = Fixture::new();
        let mut curator = fx.curator(FakeDictionary::with_words(), &["comer", "menos"]);
        let mut keys = ScriptedKeys::new("?ynn");

        let summary = run_session(&mut curator, &mut keys).await.unwrap();
        assert_eq!(summary.end, SessionEnd::Finished);
        assert_eq!((summary.accepted, summary.rejected), (1, 2));
        assert!(curator.cursor().is_finished(2));
        assert_eq!(keys.remaining(), 0);
    }

    #[tokio::test]
    async fn test_lookup_failure_leaves_word_pending() {
        let fx = Fixture::new();
        let mut dictionary = FakeDictionary::with_words();
        dictionary.failing_lookups.insert("casa".to_string());
        let mut curator = fx.curator(dictionary, &["comer", "casa"]);
        let mut keys = ScriptedKeys::new("y");

        let summary = run_session(&mut curator, &mut keys).await.unwrap();
        assert_eq!(summary.end, SessionEnd::LookupFailed);
        assert_eq!(summary.accepted, 1);

        let persisted: ReviewCursor = read_json(&fx.cursor_path()).unwrap();
        assert_eq!((persisted.headword_index, persisted.entry_index), (1, 0));
        assert_eq!(persisted.state_of(1, 0), ReviewState::Reviewing);
    }

    #[tokio::test]
    async fn test_audio_failure_rolls_back_accept() {
        let fx = Fixture::new();
        let dictionary = FakeDictionary {
            failing_audio: true,
            ..FakeDictionary::with_words()
        };
        let mut curator = fx.curator(dictionary, &["comer"]);
        let mut keys = ScriptedKeys::new("yq");

        let summary = run_session(&mut curator, &mut keys).await.unwrap();
        assert_eq!(summary.end, SessionEnd::Quit);
        assert_eq!(summary.accepted, 0);
        assert!(fx.stored_ids().is_empty());
        assert_eq!(curator.cursor(), &ReviewCursor::default());
    }

    #[tokio::test]
    async fn test_undo_with_empty_history() {
        let fx = Fixture::new();
        let mut curator = fx.curator(FakeDictionary::with_words(), &["comer"]);
        let mut keys = ScriptedKeys::new("uq");

        let summary = run_session(&mut curator, &mut keys).await.unwrap();
        assert_eq!(summary.undone, 0);
        assert_eq!(curator.cursor(), &ReviewCursor::default());
    }

    #[tokio::test]
    async fn test_lookups_are_cached_for_the_session() {
        let fx = Fixture::new();
        let mut curator = fx.curator(FakeDictionary::with_words(), &["menos"]);
        let mut keys = ScriptedKeys::new("nuq");

        run_session(&mut curator, &mut keys).await.unwrap();
        assert_eq!(curator.dictionary.lookups.get(), 1);
    }

    #[test]
    fn test_shrunk_list_clamps_cursor() {
        let fx = Fixture::new();
        let cursor = ReviewCursor {
            headword_index: 7,
            entry_index: 1,
            history: vec![],
        };
        write_json_atomic(&fx.cursor_path(), &cursor).unwrap();

        let curator = fx.curator(FakeDictionary::default(), &["comer", "casa"]);
        assert_eq!(curator.cursor().headword_index, 2);
        assert_eq!(curator.cursor().entry_index, 0);
    }

    #[test]
    fn test_meaning_label() {
        assert_eq!(meaning_label(1, 1), None);
        assert_eq!(meaning_label(2, 3).as_deref(), Some("Meaning 2 of 3"));
    }
}
