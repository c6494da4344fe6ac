use crate::models::DictionaryRecord;

/// System prompt for the language model
pub const SYSTEM_PROMPT: &str = r#"You are a language expert creating flashcard content for learners of Latin American Spanish.

RULES:
1. Use only the meanings given in the dictionary definitions. Do not add new senses.
2. Order definitions by how often each meaning is used.
3. Give 1-3 example sentences, each showing a different usage. Prefer fewer if usages are similar.
4. Rate how common the word is in everyday speech from 1 (rare) to 10 (very common).
5. The image search query is a short, specific English description of a memorable image.
6. Gender is "masculine", "feminine" or "masculine/feminine" for nouns, and null otherwise.

Output MUST be a single JSON object matching the provided schema."#;

/// Build the user prompt for one dictionary entry
pub fn build_flashcard_prompt(record: &DictionaryRecord) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Spanish word \"{}\" ({}):\n",
        record.word, record.part_of_speech
    ));
    for definition in &record.definitions {
        prompt.push_str(&format!("- {}\n", definition));
    }

    prompt.push_str(
        r#"
Return JSON with:
- term: the word with its article or both gendered forms ("la casa", "el doctor / la doctora", "el/la estudiante", "pequeño / pequeña"), or the plain word for verbs
- definitions: comma-separated English meanings, from the definitions above only
- frequency_rating: integer 1-10
- example_sentences: list of {"es", "en"} pairs
- image_search_query: English description for an image search
- part_of_speech: noun/verb/adjective/etc.
- gender: "masculine" | "feminine" | "masculine/feminine" | null

Example:
{"term": "la casa", "definitions": "house, home", "frequency_rating": 10, "example_sentences": [{"es": "Mi casa es azul.", "en": "My house is blue."}], "image_search_query": "colorful house", "part_of_speech": "noun", "gender": "feminine"}
"#,
    );

    prompt
}

/// JSON schema of the flashcard record, used as the tool input schema
pub fn flashcard_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "term": {
                "type": "string",
                "description": "The word with its article or gendered forms"
            },
            "definitions": {
                "type": "string",
                "description": "Comma-separated English meanings, most common first"
            },
            "frequency_rating": {
                "type": "integer",
                "minimum": 1,
                "maximum": 10
            },
            "example_sentences": {
                "type": "array",
                "minItems": 1,
                "maxItems": 3,
                "items": {
                    "type": "object",
                    "properties": {
                        "es": {"type": "string"},
                        "en": {"type": "string"}
                    },
                    "required": ["es", "en"]
                }
            },
            "image_search_query": {"type": "string"},
            "part_of_speech": {"type": "string"},
            "gender": {
                "type": ["string", "null"],
                "enum": ["masculine", "feminine", "masculine/feminine", null]
            }
        },
        "required": [
            "term",
            "definitions",
            "frequency_rating",
            "example_sentences",
            "image_search_query",
            "part_of_speech"
        ]
    })
}
