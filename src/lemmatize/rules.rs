//! Suffix rules proposing lemma candidates for inflected Spanish forms.
//!
//! Rules only propose; the lemmatizer accepts a candidate when it is
//! attested elsewhere (lexicon or input list). That keeps nouns such as
//! `comando` or `parte` from being mangled into nonexistent verbs.

/// Object pronouns that attach to infinitives, gerunds and imperatives,
/// longest first so combined clitics are stripped whole
const CLITICS: &[&str] = &[
    "selos", "selas", "noslo", "nosla", "selo", "sela", "melo", "mela", "telo", "tela", "los",
    "las", "les", "nos", "lo", "la", "le", "me", "te", "se", "os",
];

const VERBAL_ENDINGS: &[&str] = &["ar", "er", "ir", "ando", "iendo", "yendo"];

/// Shortest stem left after stripping a clitic
const MIN_CLITIC_HOST: usize = 4;

/// Candidate lemmas for `word`, most specific first
pub fn candidates(word: &str) -> Vec<String> {
    let mut out = Vec::new();

    for host in strip_clitics(word) {
        out.extend(gerund_candidates(&host));
        out.push(host);
    }
    out.extend(gerund_candidates(word));
    out.extend(plural_candidates(word));

    out.dedup();
    out
}

/// Remove one enclitic pronoun group, restoring the unaccented host verb
fn strip_clitics(word: &str) -> Vec<String> {
    CLITICS
        .iter()
        .filter_map(|clitic| word.strip_suffix(clitic))
        .map(strip_accents)
        .filter(|host| host.chars().count() >= MIN_CLITIC_HOST)
        .filter(|host| VERBAL_ENDINGS.iter().any(|end| host.ends_with(end)))
        .collect()
}

/// Infinitives a gerund may come from
fn gerund_candidates(word: &str) -> Vec<String> {
    if word == "yendo" {
        return vec!["ir".to_string()];
    }

    if let Some(stem) = word.strip_suffix("ando") {
        if !stem.is_empty() {
            return vec![format!("{}ar", stem)];
        }
        return Vec::new();
    }

    let stem = match word
        .strip_suffix("iendo")
        .or_else(|| word.strip_suffix("yendo"))
    {
        Some(stem) if !stem.is_empty() => stem,
        _ => return Vec::new(),
    };

    let mut out = vec![format!("{}er", stem), format!("{}ir", stem)];
    // stem-changing -ir verbs: pidiendo -> pedir, durmiendo -> dormir
    for (from, to) in [('i', 'e'), ('u', 'o')] {
        if let Some(pos) = stem.rfind(from) {
            let mut changed = stem.to_string();
            changed.replace_range(pos..pos + from.len_utf8(), &to.to_string());
            out.push(format!("{}ir", changed));
        }
    }
    out
}

/// Singular forms a plural may come from
fn plural_candidates(word: &str) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(stem) = word.strip_suffix("ones") {
        out.push(format!("{}ón", stem));
    }
    if let Some(stem) = word.strip_suffix("ines") {
        out.push(format!("{}ín", stem));
    }
    if let Some(stem) = word.strip_suffix("ces") {
        out.push(format!("{}z", stem));
    }
    if let Some(stem) = word.strip_suffix("es") {
        out.push(stem.to_string());
    }
    if let Some(stem) = word.strip_suffix('s') {
        out.push(stem.to_string());
    }

    out.retain(|c| c.chars().count() >= 2);
    out
}

/// Drop acute accents (but not ü or ñ)
pub fn strip_accents(word: &str) -> String {
    word.chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            other => other,
        })
        .collect()
}
