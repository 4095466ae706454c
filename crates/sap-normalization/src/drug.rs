//! Drug name resolution against the configured drug dictionary.
//!
//! Resolution runs two passes in order and stops at the first one that finds
//! anything: alias substring matching over the normalized text, then a
//! character-similarity pass that recovers typos in long tokens.

use sap_model::DrugEntry;
use tracing::trace;

use crate::similarity::ratio;
use crate::text::normalize_text;

/// Minimum similarity for the fuzzy pass.
pub const FUZZY_DRUG_THRESHOLD: f64 = 0.84;

/// Tokens and aliases shorter than this never take part in the fuzzy pass.
pub const MIN_FUZZY_LEN: usize = 5;

#[derive(Debug, Clone)]
struct ResolvedDrug {
    name: String,
    /// Normalized aliases for the substring pass.
    aliases: Vec<String>,
    /// Space-free aliases long enough for the fuzzy pass.
    fuzzy_aliases: Vec<String>,
}

type Pass = fn(&DrugResolver, &str) -> Vec<String>;

/// Maps free text to canonical drug names.
#[derive(Debug, Clone)]
pub struct DrugResolver {
    drugs: Vec<ResolvedDrug>,
}

impl DrugResolver {
    /// Builds a resolver from dictionary entries, keeping their order.
    pub fn new(entries: &[DrugEntry]) -> Self {
        let drugs = entries
            .iter()
            .map(|entry| {
                let aliases: Vec<String> = entry
                    .aliases
                    .iter()
                    .map(|alias| normalize_text(alias))
                    .filter(|alias| !alias.is_empty())
                    .collect();
                let fuzzy_aliases = aliases
                    .iter()
                    .map(|alias| alias.replace(' ', ""))
                    .filter(|alias| alias.len() >= MIN_FUZZY_LEN)
                    .collect();
                ResolvedDrug {
                    name: entry.name.clone(),
                    aliases,
                    fuzzy_aliases,
                }
            })
            .collect();
        Self { drugs }
    }

    /// Canonical drugs found in `text`, each once, in detection order.
    pub fn resolve(&self, text: &str) -> Vec<String> {
        let normalized = normalize_text(text);
        if normalized.is_empty() {
            return Vec::new();
        }
        const PASSES: [(&str, Pass); 2] = [
            ("substring", DrugResolver::substring_pass),
            ("fuzzy", DrugResolver::fuzzy_pass),
        ];
        for (name, pass) in PASSES {
            let found = pass(self, &normalized);
            if !found.is_empty() {
                trace!(pass = name, count = found.len(), "drug names resolved");
                return found;
            }
        }
        Vec::new()
    }

    fn substring_pass(&self, normalized: &str) -> Vec<String> {
        self.drugs
            .iter()
            .filter(|drug| {
                drug.aliases
                    .iter()
                    .any(|alias| normalized.contains(alias.as_str()))
            })
            .map(|drug| drug.name.clone())
            .collect()
    }

    fn fuzzy_pass(&self, normalized: &str) -> Vec<String> {
        let mut tokens: Vec<String> = normalized
            .split(' ')
            .filter(|token| token.len() >= MIN_FUZZY_LEN)
            .map(str::to_string)
            .collect();
        let compact = normalized.replace(' ', "");
        if compact.len() >= MIN_FUZZY_LEN {
            tokens.push(compact);
        }

        self.drugs
            .iter()
            .filter(|drug| {
                drug.fuzzy_aliases.iter().any(|alias| {
                    tokens
                        .iter()
                        .any(|token| ratio(token, alias) >= FUZZY_DRUG_THRESHOLD)
                })
            })
            .map(|drug| drug.name.clone())
            .collect()
    }

    /// Canonical name for a single drug name as written in a protocol.
    ///
    /// Falls back to the upper-cased normalized text when no dictionary
    /// entry matches; returns `None` for blank input.
    pub fn canonical_name(&self, name: &str) -> Option<String> {
        let normalized = normalize_text(name);
        if normalized.is_empty() {
            return None;
        }
        if let Some(drug) = self.drugs.iter().find(|drug| {
            normalize_text(&drug.name) == normalized || drug.aliases.contains(&normalized)
        }) {
            return Some(drug.name.clone());
        }
        let resolved = self.resolve(name);
        match resolved.as_slice() {
            [single] => Some(single.clone()),
            _ => Some(normalized.to_uppercase()),
        }
    }
}
