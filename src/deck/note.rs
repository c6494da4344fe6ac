use std::path::{Path, PathBuf};

use anyhow::Result;
use genanki_rs::{Model, Note};

use crate::models::{EntryId, ExampleSentence, FlashcardRecord};

/// Field values for one note, plus the media files it references
#[derive(Debug, Clone, PartialEq)]
pub struct NoteFields {
    pub guid: String,
    pub values: Vec<String>,
    pub tags: Vec<String>,
    pub media: Vec<PathBuf>,
}

impl NoteFields {
    /// Build fields from a flashcard record and whichever media exist
    pub fn new(
        id: &EntryId,
        record: &FlashcardRecord,
        audio: Option<&Path>,
        image: Option<&Path>,
    ) -> Self {
        let mut media = Vec::new();

        let audio_field = media_name(audio)
            .map(|name| format!("[sound:{}]", name))
            .unwrap_or_default();
        let image_field = media_name(image)
            .map(|name| format!("<img src=\"{}\">", escape_html(&name)))
            .unwrap_or_default();
        media.extend(audio.map(Path::to_path_buf));
        media.extend(image.map(Path::to_path_buf));

        let values = vec![
            escape_html(&record.term),
            record
                .gender
                .map(|g| g.label().to_string())
                .unwrap_or_default(),
            escape_html(&record.part_of_speech),
            escape_html(&record.definitions),
            render_examples(&record.example_sentences),
            image_field,
            audio_field,
            record.frequency_rating.to_string(),
            id.to_string(),
        ];

        Self {
            guid: id.to_string(),
            values,
            tags: tags_for(record),
            media,
        }
    }

    pub fn to_note(&self, model: &Model) -> Result<Note> {
        let values: Vec<&str> = self.values.iter().map(String::as_str).collect();
        let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        Note::new_with_options(model.clone(), values, None, Some(tags), Some(&self.guid))
            .map_err(|e| anyhow::anyhow!("Failed to build note '{}': {:?}", self.guid, e))
    }
}

/// Example pairs as an HTML list
pub fn render_examples(sentences: &[ExampleSentence]) -> String {
    if sentences.is_empty() {
        return String::new();
    }
    let items: String = sentences
        .iter()
        .map(|s| {
            format!(
                "<li><span class=\"es\">{}</span><br><span class=\"en\">{}</span></li>",
                escape_html(&s.es),
                escape_html(&s.en)
            )
        })
        .collect();
    format!("<ul>{}</ul>", items)
}

/// Anki tags cannot contain spaces
fn tags_for(record: &FlashcardRecord) -> Vec<String> {
    let pos = record.part_of_speech.trim().to_lowercase().replace(' ', "_");
    if pos.is_empty() { vec![] } else { vec![pos] }
}

fn media_name(path: Option<&Path>) -> Option<String> {
    path?.file_name()?.to_str().map(str::to_string)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
