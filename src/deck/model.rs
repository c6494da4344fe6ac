use genanki_rs::{Field, Model, Template};

use crate::config::AnkiConfig;

/// Note fields, in model order
pub const FIELDS: [&str; 9] = [
    "Term",
    "Gender",
    "PartOfSpeech",
    "Definition",
    "ExampleSentences",
    "Image",
    "Audio",
    "FrequencyRating",
    "GUID",
];

const FRONT: &str = r#"<div class="term">{{Term}}</div>
{{#Gender}}<div class="gender">{{Gender}}</div>{{/Gender}}
<div class="pos">{{PartOfSpeech}}</div>
{{Audio}}"#;

const BACK: &str = r#"{{FrontSide}}
<hr id="answer">
<div class="definition">{{Definition}}</div>
{{#Image}}<div class="image">{{Image}}</div>{{/Image}}
<div class="examples">{{ExampleSentences}}</div>
<div class="frequency">Frequency: {{FrequencyRating}}/10</div>"#;

const CSS: &str = r#".card {
  font-family: arial, sans-serif;
  font-size: 20px;
  text-align: center;
  color: #222;
  background-color: #fafafa;
}
.term { font-size: 36px; font-weight: bold; }
.gender, .pos { font-size: 16px; color: #777; font-style: italic; }
.definition { font-size: 24px; margin: 12px 0; }
.image img { max-width: 90%; max-height: 320px; }
.examples ul { list-style: none; padding: 0; text-align: left; display: inline-block; }
.examples .es { font-weight: bold; }
.examples .en { color: #555; }
.frequency { font-size: 12px; color: #999; margin-top: 12px; }
"#;

/// The note model shared by every card in the deck
///
/// Identity comes from `AnkiConfig::model_id`; keeping it fixed lets Anki
/// match notes across rebuilds.
pub fn build_model(anki: &AnkiConfig) -> Model {
    let fields = FIELDS.iter().map(|name| Field::new(name)).collect();
    let templates = vec![Template::new("Spanish to English").qfmt(FRONT).afmt(BACK)];

    Model::new_with_options(
        anki.model_id,
        &anki.model_name,
        fields,
        templates,
        Some(CSS),
        None,
        None,
        None,
        None,
    )
}
