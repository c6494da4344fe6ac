use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review state of a single dictionary entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    /// Not yet reached by the cursor
    Pending,
    /// Shown to the operator, awaiting a key
    Reviewing,
    Accepted,
    Rejected,
}

/// Outcome of reviewing one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl From<Verdict> for ReviewState {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Accepted => ReviewState::Accepted,
            Verdict::Rejected => ReviewState::Rejected,
        }
    }
}

/// What an accept added to the entry directory, so undo removes only that
///
/// The dictionary record is always new; the directory and the audio may
/// already have been there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedArtifacts {
    pub entry_dir: bool,
    pub audio: bool,
}

/// A recorded review decision, with the cursor position it was made at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub headword_index: usize,
    pub entry_index: usize,
    pub entry_id: String,
    pub verdict: Verdict,
    #[serde(default)]
    pub created: CreatedArtifacts,
    pub decided_at: DateTime<Utc>,
}

/// Persisted position of the curator in the sanitized word list
///
/// `headword_index` points at the word under review and `entry_index` at the
/// sense of that word. `history` is a stack of decisions; undo pops it.
/// Invariant: `headword_index <= word count`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewCursor {
    pub headword_index: usize,
    pub entry_index: usize,
    #[serde(default)]
    pub history: Vec<Decision>,
}

impl ReviewCursor {
    /// Whether every word has been reviewed
    pub fn is_finished(&self, word_count: usize) -> bool {
        self.headword_index >= word_count
    }

    /// Pull an out-of-range cursor (e.g. after the list shrank) back in range
    pub fn clamp(&mut self, word_count: usize) {
        if self.headword_index > word_count {
            self.headword_index = word_count;
            self.entry_index = 0;
        }
    }

    /// State of the entry at (`headword_index`, `entry_index`)
    pub fn state_of(&self, headword_index: usize, entry_index: usize) -> ReviewState {
        if let Some(decision) = self
            .history
            .iter()
            .rev()
            .find(|d| d.headword_index == headword_index && d.entry_index == entry_index)
        {
            return decision.verdict.into();
        }
        if (headword_index, entry_index) == (self.headword_index, self.entry_index) {
            ReviewState::Reviewing
        } else {
            ReviewState::Pending
        }
    }

    /// Record a decision on the entry under the cursor and move past it
    ///
    /// `entry_count` is the number of senses of the current word; after the
    /// last sense the cursor moves to the next word.
    pub fn record(&mut self, verdict: Verdict, entry_id: &str, entry_count: usize) {
        self.push(verdict, entry_id, entry_count, CreatedArtifacts::default());
    }

    /// Record an accept along with what it created on disk
    pub fn record_accept(&mut self, entry_id: &str, entry_count: usize, created: CreatedArtifacts) {
        self.push(Verdict::Accepted, entry_id, entry_count, created);
    }

    fn push(&mut self, verdict: Verdict, entry_id: &str, entry_count: usize, created: CreatedArtifacts) {
        self.history.push(Decision {
            headword_index: self.headword_index,
            entry_index: self.entry_index,
            entry_id: entry_id.to_string(),
            verdict,
            created,
            decided_at: Utc::now(),
        });
        self.skip_entry(entry_count);
    }

    /// Move past the entry under the cursor without a decision
    pub fn skip_entry(&mut self, entry_count: usize) {
        self.entry_index += 1;
        if self.entry_index >= entry_count {
            self.next_headword();
        }
    }

    /// Move past the current word without a decision (no dictionary entries)
    pub fn next_headword(&mut self) {
        self.headword_index += 1;
        self.entry_index = 0;
    }

    /// Pop the last decision and move the cursor back to where it was made
    pub fn rewind(&mut self) -> Option<Decision> {
        let decision = self.history.pop()?;
        self.headword_index = decision.headword_index;
        self.entry_index = decision.entry_index;
        Some(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_walks_senses_then_words() {
        let mut cursor = ReviewCursor::default();

        cursor.record(Verdict::Rejected, "menos:1", 2);
        assert_eq!((cursor.headword_index, cursor.entry_index), (0, 1));

        cursor.record(Verdict::Rejected, "menos:2", 2);
        assert_eq!((cursor.headword_index, cursor.entry_index), (1, 0));
    }

    #[test]
    fn test_rewind_restores_position() {
        let mut cursor = ReviewCursor::default();
        cursor.record(Verdict::Accepted, "comer", 1);
        let before = cursor.clone();

        cursor.next_headword();
        cursor.record(Verdict::Accepted, "casa", 1);
        assert_eq!(cursor.headword_index, 3);

        let undone = cursor.rewind().unwrap();
        assert_eq!(undone.entry_id, "casa");
        assert_eq!(undone.verdict, Verdict::Accepted);
        assert_eq!((cursor.headword_index, cursor.entry_index), (2, 0));
        assert_eq!(cursor.history, before.history);
    }

    #[test]
    fn test_skip_records_nothing() {
        let mut cursor = ReviewCursor::default();
        cursor.skip_entry(2);
        assert_eq!((cursor.headword_index, cursor.entry_index), (0, 1));
        cursor.skip_entry(2);
        assert_eq!((cursor.headword_index, cursor.entry_index), (1, 0));
        assert!(cursor.history.is_empty());
    }

    #[test]
    fn test_decisions_without_created_flags_still_load() {
        let json = r#"{"headword_index":0,"entry_index":0,"history":[
            {"headword_index":0,"entry_index":0,"entry_id":"comer",
             "verdict":"accepted","decided_at":"2026-01-05T10:00:00Z"}]}"#;
        let cursor: ReviewCursor = serde_json::from_str(json).unwrap();
        assert_eq!(cursor.history[0].created, CreatedArtifacts::default());
    }

    #[test]
    fn test_rewind_on_empty_history() {
        let mut cursor = ReviewCursor::default();
        assert!(cursor.rewind().is_none());
        assert_eq!(cursor, ReviewCursor::default());
    }

    #[test]
    fn test_states() {
        let mut cursor = ReviewCursor::default();
        cursor.record(Verdict::Accepted, "comer", 1);
        cursor.record(Verdict::Rejected, "comida", 1);

        assert_eq!(cursor.state_of(0, 0), ReviewState::Accepted);
        assert_eq!(cursor.state_of(1, 0), ReviewState::Rejected);
        assert_eq!(cursor.state_of(2, 0), ReviewState::Reviewing);
        assert_eq!(cursor.state_of(3, 0), ReviewState::Pending);
    }

    #[test]
    fn test_clamp() {
        let mut cursor = ReviewCursor {
            headword_index: 10,
            entry_index: 2,
            history: vec![],
        };
        cursor.clamp(4);
        assert_eq!((cursor.headword_index, cursor.entry_index), (4, 0));
        assert!(cursor.is_finished(4));
    }

    #[test]
    fn test_serde_round_trip_of_history() {
        let mut cursor = ReviewCursor::default();
        cursor.record_accept(
            "menos:3",
            1,
            CreatedArtifacts {
                entry_dir: true,
                audio: false,
            },
        );

        let json = serde_json::to_string(&cursor).unwrap();
        assert!(json.contains("\"verdict\":\"accepted\""));
        let restored: ReviewCursor = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cursor);
    }
}
