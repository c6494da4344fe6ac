pub mod rules;
pub mod stop_words;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

pub use stop_words::stop_words;

/// Upper bound on rewrite steps for one word
const MAX_STEPS: usize = 8;

/// Form-to-lemma table loaded from a `lemma<TAB>form` file
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    forms: HashMap<String, String>,
    lemmas: HashSet<String>,
}

impl Lexicon {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read lexicon: {:?}", path))?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// Parse `lemma<whitespace>form` lines; malformed lines are ignored
    ///
    /// The first lemma listed for an ambiguous form wins.
    pub fn parse(content: &str) -> Self {
        let mut lexicon = Self::default();
        for line in content.lines() {
            let mut columns = line.split_whitespace();
            let (Some(lemma), Some(form)) = (columns.next(), columns.next()) else {
                continue;
            };
            let lemma = lemma.trim_start_matches('\u{feff}').to_lowercase();
            let form = form.to_lowercase();
            lexicon.forms.entry(form).or_insert_with(|| lemma.clone());
            lexicon.lemmas.insert(lemma);
        }
        lexicon
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn lemma_of(&self, form: &str) -> Option<&str> {
        self.forms.get(form).map(String::as_str)
    }

    /// Whether the word appears as a form or a lemma
    pub fn knows(&self, word: &str) -> bool {
        self.lemmas.contains(word) || self.forms.contains_key(word)
    }
}

/// Maps raw tokens to Spanish lemmas
///
/// Lexicon entries win; otherwise suffix rules propose candidates that are
/// accepted only when attested. Rewriting runs to a fixed point, so the
/// lemma of a lemma is itself.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    lexicon: Lexicon,
    stop_words: HashSet<&'static str>,
    strict: bool,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new(Lexicon::default())
    }
}

impl Lemmatizer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self {
            lexicon,
            stop_words: stop_words(),
            strict: false,
        }
    }

    /// Drop words the lexicon does not know; no effect without a lexicon
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Lemmatize a list, keeping the first occurrence of each lemma
    pub fn lemmatize_all(&self, words: &[String]) -> Vec<String> {
        let tokens: Vec<String> = words
            .iter()
            .filter_map(|w| self.normalize(w))
            .collect();
        let known: HashSet<String> = tokens.iter().cloned().collect();

        let mut seen = HashSet::new();
        let mut lemmas = Vec::new();
        for token in &tokens {
            if let Some(lemma) = self.lemmatize(token, &known) {
                if seen.insert(lemma.clone()) {
                    lemmas.push(lemma);
                }
            }
        }
        lemmas
    }

    /// Lemma of one word, or `None` when it is not a Spanish content word
    ///
    /// `known` holds words attested in the surrounding list.
    pub fn lemmatize(&self, word: &str, known: &HashSet<String>) -> Option<String> {
        let mut current = self.normalize(word)?;
        let mut visited = HashSet::from([current.clone()]);

        for _ in 0..MAX_STEPS {
            match self.step(&current, known) {
                Some(next) if visited.insert(next.clone()) => {
                    debug!("{} -> {}", current, next);
                    current = next;
                }
                _ => break,
            }
        }

        if self.stop_words.contains(current.as_str()) {
            return None;
        }
        if self.strict && !self.lexicon.is_empty() && !self.lexicon.knows(&current) {
            return None;
        }
        Some(current)
    }

    /// Lowercased token if it looks like a Spanish content word
    fn normalize(&self, raw: &str) -> Option<String> {
        let word = raw.trim().to_lowercase();
        if word.chars().count() < 2 || !word.chars().all(is_spanish_letter) {
            return None;
        }
        if self.stop_words.contains(word.as_str()) {
            return None;
        }
        Some(word)
    }

    fn step(&self, word: &str, known: &HashSet<String>) -> Option<String> {
        if let Some(lemma) = self.lexicon.lemma_of(word) {
            return Some(lemma.to_string());
        }
        rules::candidates(word)
            .into_iter()
            .find(|candidate| self.is_attested(candidate, known))
    }

    fn is_attested(&self, candidate: &str, known: &HashSet<String>) -> bool {
        !self.stop_words.contains(candidate)
            && (known.contains(candidate) || self.lexicon.knows(candidate))
    }
}

fn is_spanish_letter(c: char) -> bool {
    c.is_ascii_lowercase() || matches!(c, 'á' | 'é' | 'í' | 'ó' | 'ú' | 'ü' | 'ñ')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_verb_forms_collapse_noun_kept() {
        let lemmatizer = Lemmatizer::default();
        let out = lemmatizer.lemmatize_all(&words(&["comer", "comiendo", "comida"]));
        assert_eq!(out, vec!["comer", "comida"]);
    }

    #[test]
    fn test_first_seen_order() {
        let lemmatizer = Lemmatizer::default();
        let out = lemmatizer.lemmatize_all(&words(&["casas", "perro", "casa", "perros"]));
        assert_eq!(out, vec!["casa", "perro"]);
    }

    #[test]
    fn test_unattested_candidates_are_not_invented() {
        let lemmatizer = Lemmatizer::default();
        let out = lemmatizer.lemmatize_all(&words(&["comando", "parte"]));
        assert_eq!(out, vec!["comando", "parte"]);
    }

    #[test]
    fn test_filters_invalid_and_function_words() {
        let lemmatizer = Lemmatizer::default();
        let out = lemmatizer.lemmatize_all(&words(&["el", "hello!", "42", "x", "de", "Niño", "co-op"]));
        assert_eq!(out, vec!["niño"]);
    }

    #[test]
    fn test_lexicon_wins() {
        let lexicon = Lexicon::parse("ser\tfue\nir\tfue\nir\tvamos\ncomer\tcomí\n");
        assert_eq!(lexicon.lemma_of("fue"), Some("ser"));

        let lemmatizer = Lemmatizer::new(lexicon);
        let out = lemmatizer.lemmatize_all(&words(&["fue", "vamos", "comí"]));
        assert_eq!(out, vec!["ser", "ir", "comer"]);
    }

    #[test]
    fn test_lexicon_lemma_enables_rules() {
        let lemmatizer = Lemmatizer::new(Lexicon::parse("hablar\thablar\n"));
        let out = lemmatizer.lemmatize_all(&words(&["hablándole"]));
        assert_eq!(out, vec!["hablar"]);
    }

    #[test]
    fn test_strict_drops_unknown_words() {
        let lexicon = Lexicon::parse("casa\tcasas\n");
        let lemmatizer = Lemmatizer::new(lexicon).strict(true);
        let out = lemmatizer.lemmatize_all(&words(&["casas", "blorf"]));
        assert_eq!(out, vec!["casa"]);
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let lemmatizer = Lemmatizer::new(Lexicon::parse("ser\tfue\n"));
        let raw = words(&[
            "comiendo", "comer", "casas", "casa", "hablándole", "hablar", "fue", "luces", "luz",
            "perro", "el", "comida",
        ]);
        let once = lemmatizer.lemmatize_all(&raw);
        let twice = lemmatizer.lemmatize_all(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_lexicon_cycle_terminates() {
        let lemmatizer = Lemmatizer::new(Lexicon::parse("bb\taa\naa\tbb\n"));
        let known = HashSet::new();
        assert_eq!(lemmatizer.lemmatize("aa", &known).as_deref(), Some("bb"));
    }
}
