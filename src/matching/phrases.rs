use regex::Regex;
use std::sync::LazyLock;

static PHRASE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[,;\n/]|\b(?:and|with|plus)\b").expect("phrase separator pattern is valid")
});

/// Split a free-text description into candidate symptom phrases.
///
/// Separators are commas, semicolons, newlines, slashes and the words
/// "and", "with", "plus". Empty pieces are dropped.
pub fn split_phrases(text: &str) -> Vec<String> {
    PHRASE_SEPARATOR
        .split(text)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}
