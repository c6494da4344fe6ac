use serde::{Deserialize, Serialize};

/// Lowest and highest allowed frequency rating
pub const FREQUENCY_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// Grammatical gender of a noun
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "m", alias = "masculino")]
    Masculine,
    #[serde(alias = "f", alias = "femenino")]
    Feminine,
    /// Nouns taking either article (el/la estudiante)
    #[serde(alias = "common", alias = "masculine/feminine")]
    Both,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Masculine => "masculine",
            Self::Feminine => "feminine",
            Self::Both => "masculine/feminine",
        }
    }
}

/// A Spanish sentence with its English translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleSentence {
    pub es: String,
    pub en: String,
}

/// On-disk flashcard record (`flashcard.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashcardRecord {
    pub term: String,
    pub definitions: String,
    /// How common the word is, 1 (rare) to 10 (very common)
    pub frequency_rating: u8,
    pub example_sentences: Vec<ExampleSentence>,
    pub image_search_query: String,
    pub part_of_speech: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl FlashcardRecord {
    /// Parse a record from untrusted JSON, reporting every schema problem
    pub fn from_value(value: serde_json::Value) -> Result<Self, Vec<String>> {
        let record: Self = serde_json::from_value(value).map_err(|e| vec![e.to_string()])?;
        let errors = record.check();
        if errors.is_empty() {
            Ok(record)
        } else {
            Err(errors)
        }
    }

    /// Invariants serde cannot express
    pub fn check(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.term.trim().is_empty() {
            errors.push("term is empty".to_string());
        }
        if self.definitions.trim().is_empty() {
            errors.push("definitions are empty".to_string());
        }
        if !FREQUENCY_RANGE.contains(&self.frequency_rating) {
            errors.push(format!(
                "frequency_rating {} outside {}-{}",
                self.frequency_rating,
                FREQUENCY_RANGE.start(),
                FREQUENCY_RANGE.end()
            ));
        }
        if self.example_sentences.is_empty() {
            errors.push("no example sentences".to_string());
        }
        for (i, sentence) in self.example_sentences.iter().enumerate() {
            if sentence.es.trim().is_empty() || sentence.en.trim().is_empty() {
                errors.push(format!("example sentence {} is missing 'es' or 'en'", i));
            }
        }
        if self.image_search_query.trim().is_empty() {
            errors.push("image_search_query is empty".to_string());
        }
        if self.part_of_speech.trim().is_empty() {
            errors.push("part_of_speech is empty".to_string());
        }

        errors
    }
}
