//! Spanish function words.
//!
//! Only content words (nouns, verbs, adjectives, adverbs) are worth a
//! flashcard, so these are dropped before lemmatization.

use std::collections::HashSet;

pub fn stop_words() -> HashSet<&'static str> {
    [
        // articles & determiners
        "el", "la", "los", "las", "un", "una", "unos", "unas", "lo",
        "este", "esta", "estos", "estas", "ese", "esa", "esos", "esas",
        "aquel", "aquella", "aquellos", "aquellas",
        // possessives
        "mi", "mis", "tu", "tus", "su", "sus", "nuestro", "nuestra",
        "nuestros", "nuestras", "vuestro", "vuestra", "vuestros", "vuestras",
        // personal pronouns
        "yo", "tú", "él", "ella", "ello", "usted", "nosotros", "nosotras",
        "vosotros", "vosotras", "ellos", "ellas", "ustedes",
        "me", "te", "se", "nos", "os", "le", "les", "mí", "ti", "sí", "conmigo", "contigo",
        // prepositions
        "a", "al", "ante", "bajo", "con", "contra", "de", "del", "desde", "en",
        "entre", "hacia", "hasta", "para", "por", "según", "sin", "sobre", "tras",
        // conjunctions
        "y", "e", "o", "u", "ni", "pero", "sino", "que", "porque", "pues", "si",
        // relatives & interrogatives
        "quien", "quién", "quienes", "cual", "cuál", "cuales", "cuyo", "cuya",
        "qué", "cuando", "cuándo", "donde", "dónde", "como", "cómo",
    ]
    .into_iter()
    .collect()
}
