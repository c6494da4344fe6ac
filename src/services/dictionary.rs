use std::future::Future;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::required_env;
use crate::models::DictionaryEntry;

const API_URL: &str = "https://www.dictionaryapi.com/api/v3/references/spanish/json";
const AUDIO_URL: &str = "https://media.merriam-webster.com/audio/prons/es/me/mp3";

/// Looks up words and their pronunciation audio
pub trait DictionaryService {
    /// Entries (senses) for `word`, already filtered to usable ones
    fn look_up(&self, word: &str) -> impl Future<Output = Result<Vec<DictionaryEntry>>>;

    /// Pronunciation audio for an entry, or `None` when it has none
    fn fetch_audio(&self, entry: &DictionaryEntry) -> impl Future<Output = Result<Option<Vec<u8>>>>;
}

/// Merriam-Webster Spanish-English dictionary API client
pub struct MerriamWebster {
    client: Client,
    api_key: String,
}

impl MerriamWebster {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(required_env("MERRIAM_WEBSTER_API_KEY")?))
    }
}

impl DictionaryService for MerriamWebster {
    async fn look_up(&self, word: &str) -> Result<Vec<DictionaryEntry>> {
        let url = format!("{}/{}", API_URL, word);
        let response = self
            .client
            .get(&url)
            .query(&[("key", &self.api_key)])
            .send()
            .await
            .with_context(|| format!("Failed to send dictionary request for '{}'", word))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Dictionary API error: {} - {}", status, body);
        }

        let body: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse dictionary API response")?;

        Ok(parse_entries(word, &body))
    }

    async fn fetch_audio(&self, entry: &DictionaryEntry) -> Result<Option<Vec<u8>>> {
        let Some(audio) = entry.audio.as_deref() else {
            return Ok(None);
        };
        let url = audio_url(audio);
        debug!("Fetching audio {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to download audio from {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Audio download failed: {} ({})", response.status(), url);
        }

        let bytes = response.bytes().await.context("Failed to read audio body")?;
        Ok(Some(bytes.to_vec()))
    }
}

/// Keep the entries of a response that belong to `word`
///
/// An unknown word yields a list of spelling suggestions (plain strings)
/// instead of entry objects; those are dropped like any other non-entry.
pub fn parse_entries(word: &str, body: &serde_json::Value) -> Vec<DictionaryEntry> {
    let Some(items) = body.as_array() else {
        warn!("Unexpected dictionary response for '{}'", word);
        return Vec::new();
    };

    items
        .iter()
        .filter(|item| item.pointer("/meta/lang").and_then(|l| l.as_str()) == Some("es"))
        .filter_map(DictionaryEntry::from_merriam_webster)
        .filter(|entry| entry.headword == word)
        .collect()
}

/// Media URL for a Merriam-Webster audio file name
pub fn audio_url(audio: &str) -> String {
    let subdirectory = if audio.starts_with("bix") {
        "bix".to_string()
    } else if audio.starts_with("gg") {
        "gg".to_string()
    } else {
        match audio.chars().next() {
            Some(c) if c.is_ascii_alphabetic() => c.to_string(),
            _ => "number".to_string(),
        }
    };
    format!("{}/{}/{}.mp3", AUDIO_URL, subdirectory, audio)
}
