//! Procedure translation dictionary (sheet spelling -> protocol spelling).

use std::collections::HashMap;

use sap_normalization::{fuzzy_score, normalize_text};

/// Separator between alternative protocol names in one translation.
const ALTERNATIVE_SEPARATOR: char = '/';

/// Raw procedure names mapped to protocol names, keyed by normalized text.
#[derive(Debug, Clone, Default)]
pub struct TranslationDictionary {
    entries: HashMap<String, String>,
}

impl TranslationDictionary {
    /// Builds the dictionary, dropping blank keys and values. Later entries
    /// win when two raw names normalize to the same key.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .filter_map(|(raw, target)| {
                let key = normalize_text(raw.as_ref());
                let target = target.as_ref().trim();
                (!key.is_empty() && !target.is_empty()).then(|| (key, target.to_string()))
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw translation for a procedure name.
    pub fn lookup(&self, procedure: &str) -> Option<&str> {
        self.entries
            .get(&normalize_text(procedure))
            .map(String::as_str)
    }

    /// Alternatives of the translation for `procedure`, split on `/`.
    ///
    /// A translation without any non-blank alternative is returned whole.
    pub fn candidates(&self, procedure: &str) -> Vec<String> {
        let Some(translation) = self.lookup(procedure) else {
            return Vec::new();
        };
        let alternatives: Vec<String> = translation
            .split(ALTERNATIVE_SEPARATOR)
            .map(str::trim)
            .filter(|candidate| !candidate.is_empty())
            .map(str::to_string)
            .collect();
        if alternatives.is_empty() {
            vec![translation.to_string()]
        } else {
            alternatives
        }
    }
}

/// Whether a translated candidate is believable for the original name.
///
/// Accepts containment in either direction of the normalized forms, or a
/// fuzzy score at or above `threshold`.
pub fn is_plausible(original: &str, candidate: &str, threshold: f64) -> bool {
    let original = normalize_text(original);
    let candidate = normalize_text(candidate);
    if original.is_empty() || candidate.is_empty() {
        return false;
    }
    original.contains(&candidate)
        || candidate.contains(&original)
        || fuzzy_score(&original, &candidate) >= threshold
}
