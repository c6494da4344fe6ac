use crate::models::{DictionaryRecord, FlashcardRecord};

/// Outcome of checking a model response
#[derive(Debug, Clone)]
pub struct FlashcardValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    /// The parsed record, present only when valid
    pub record: Option<FlashcardRecord>,
}

impl FlashcardValidation {
    pub fn valid(record: FlashcardRecord) -> Self {
        Self {
            is_valid: true,
            errors: vec![],
            record: Some(record),
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            is_valid: false,
            errors,
            record: None,
        }
    }
}

/// Validate a raw model response against the flashcard schema and the
/// dictionary entry it was generated from
pub fn validate_flashcard(
    response: serde_json::Value,
    entry: &DictionaryRecord,
) -> FlashcardValidation {
    // Models sometimes answer "gender": "" or "n/a" for non-nouns
    let response = normalize_gender(response);

    let record = match FlashcardRecord::from_value(response) {
        Ok(record) => record,
        Err(errors) => return FlashcardValidation::invalid(errors),
    };

    let mut errors = Vec::new();
    if !record
        .term
        .to_lowercase()
        .contains(&entry.word.to_lowercase())
    {
        errors.push(format!(
            "term '{}' does not contain the word '{}'",
            record.term, entry.word
        ));
    }

    if errors.is_empty() {
        FlashcardValidation::valid(record)
    } else {
        FlashcardValidation::invalid(errors)
    }
}

fn normalize_gender(mut response: serde_json::Value) -> serde_json::Value {
    if let Some(gender) = response.get("gender").and_then(|g| g.as_str()) {
        let gender = gender.trim().to_lowercase();
        if gender.is_empty() || gender == "n/a" || gender == "none" {
            response["gender"] = serde_json::Value::Null;
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use serde_json::json;

    fn entry(word: &str) -> DictionaryRecord {
        DictionaryRecord {
            id: word.to_string(),
            word: word.to_string(),
            sense: None,
            part_of_speech: "noun".to_string(),
            definitions: vec!["house".to_string()],
            raw: serde_json::Value::Null,
        }
    }

    fn response() -> serde_json::Value {
        json!({
            "term": "la casa",
            "definitions": "house, home",
            "frequency_rating": 10,
            "example_sentences": [{"es": "Mi casa es azul.", "en": "My house is blue."}],
            "image_search_query": "colorful house",
            "part_of_speech": "noun",
            "gender": "feminine"
        })
    }

    #[test]
    fn test_valid_response() {
        let result = validate_flashcard(response(), &entry("casa"));
        assert!(result.is_valid);
        assert_eq!(result.record.unwrap().gender, Some(Gender::Feminine));
    }

    #[test]
    fn test_term_must_match_entry() {
        let result = validate_flashcard(response(), &entry("perro"));
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("does not contain the word 'perro'"));
        assert!(result.record.is_none());
    }

    #[test]
    fn test_schema_errors_are_reported() {
        let mut value = response();
        value["frequency_rating"] = json!(42);
        let result = validate_flashcard(value, &entry("casa"));
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("frequency_rating"));
    }

    #[test]
    fn test_placeholder_gender_becomes_absent() {
        let mut value = response();
        value["gender"] = json!("N/A");
        let result = validate_flashcard(value, &entry("casa"));
        assert!(result.is_valid);
        assert_eq!(result.record.unwrap().gender, None);
    }
}
