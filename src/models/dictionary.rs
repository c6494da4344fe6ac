use serde::{Deserialize, Serialize};

use super::EntryId;

/// One sense of a word as returned by the dictionary service
///
/// Keeps the raw service payload alongside the parsed fields so the
/// persisted record carries everything the service returned.
#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryEntry {
    pub id: EntryId,
    pub headword: String,
    pub part_of_speech: String,
    pub definitions: Vec<String>,
    /// Pronunciation audio file name (service-specific), if any
    pub audio: Option<String>,
    pub raw: serde_json::Value,
}

impl DictionaryEntry {
    /// Parse a Merriam-Webster entry object
    ///
    /// Returns `None` for entries missing an id, a part of speech or short
    /// definitions.
    pub fn from_merriam_webster(raw: &serde_json::Value) -> Option<Self> {
        let id = raw.pointer("/meta/id")?.as_str()?;
        let headword = raw
            .pointer("/hwi/hw")
            .and_then(|hw| hw.as_str())
            .unwrap_or_default()
            .replace('*', "");
        let part_of_speech = raw.get("fl")?.as_str()?.to_string();
        let definitions: Vec<String> = raw
            .get("shortdef")?
            .as_array()?
            .iter()
            .filter_map(|d| d.as_str().map(str::to_string))
            .collect();

        if part_of_speech.is_empty() || definitions.is_empty() {
            return None;
        }

        let audio = raw
            .pointer("/hwi/prs")
            .and_then(|prs| prs.as_array())
            .into_iter()
            .flatten()
            .filter_map(|pr| pr.pointer("/sound/audio").and_then(|a| a.as_str()))
            .find(|a| !a.is_empty())
            .map(str::to_string);

        Some(Self {
            id: EntryId::new(id),
            headword,
            part_of_speech,
            definitions,
            audio,
            raw: raw.clone(),
        })
    }

    /// The record persisted in the entry directory
    pub fn to_record(&self) -> DictionaryRecord {
        DictionaryRecord {
            id: self.id.as_str().to_string(),
            word: self.id.word().to_string(),
            sense: self.id.sense(),
            part_of_speech: self.part_of_speech.clone(),
            definitions: self.definitions.clone(),
            raw: self.raw.clone(),
        }
    }
}

/// On-disk dictionary record (`dictionary_entry.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryRecord {
    /// Entry id including sense suffix
    pub id: String,
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sense: Option<u32>,
    pub part_of_speech: String,
    pub definitions: Vec<String>,
    /// Full service response for this sense
    #[serde(default)]
    pub raw: serde_json::Value,
}
