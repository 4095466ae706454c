//! Immutable in-memory protocol rule repository.
//!
//! The repository is built once per run from the extracted rules and owned by
//! the caller. Every canonical name and alias is indexed under both its
//! normalized and its cleaned form, so exact lookups work for raw sheet text
//! and for protocol spellings alike.

use std::collections::{BTreeMap, HashMap};

use sap_model::ProtocolRule;
use sap_normalization::{clean_procedure_name, normalize_text};
use serde::Serialize;
use tracing::info;

use crate::error::RepositoryError;

/// Comparison forms of a rule's names, canonical name first.
#[derive(Debug, Clone, Default)]
pub struct RuleNames {
    pub normalized: Vec<String>,
    pub cleaned: Vec<String>,
}

/// Counts describing a loaded rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryStatistics {
    pub total_rules: usize,
    pub prophylaxis_required: usize,
    pub prophylaxis_not_required: usize,
    pub rules_by_section: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default)]
pub struct RuleRepository {
    rules: Vec<ProtocolRule>,
    names: Vec<RuleNames>,
    by_id: HashMap<String, usize>,
    procedure_index: HashMap<String, Vec<usize>>,
    alias_index: HashMap<String, Vec<usize>>,
}

impl RuleRepository {
    /// Validates and indexes a rule set.
    pub fn new(rules: Vec<ProtocolRule>) -> Result<Self, RepositoryError> {
        let mut repository = Self::default();
        for (position, mut rule) in rules.into_iter().enumerate() {
            if rule.rule_id.trim().is_empty() {
                return Err(RepositoryError::BlankRuleId { position });
            }
            if normalize_text(&rule.procedure).is_empty() {
                return Err(RepositoryError::BlankProcedure {
                    rule_id: rule.rule_id,
                });
            }
            if repository.by_id.contains_key(&rule.rule_id) {
                return Err(RepositoryError::DuplicateRuleId {
                    rule_id: rule.rule_id,
                });
            }
            if rule.procedure_normalized.trim().is_empty() {
                rule.procedure_normalized = normalize_text(&rule.procedure);
            }
            repository.insert(rule);
        }
        info!(rules = repository.len(), "rule repository built");
        Ok(repository)
    }

    fn insert(&mut self, rule: ProtocolRule) {
        let index = self.rules.len();
        let mut names = RuleNames::default();
        let canonical = [&rule.procedure, &rule.procedure_normalized];
        for name in canonical {
            add_forms(&mut self.procedure_index, &mut names, name, index);
        }
        for alias in &rule.aliases {
            add_forms(&mut self.alias_index, &mut names, alias, index);
        }
        self.by_id.insert(rule.rule_id.clone(), index);
        self.names.push(names);
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All rules in load order.
    pub fn rules(&self) -> &[ProtocolRule] {
        &self.rules
    }

    pub fn get(&self, rule_id: &str) -> Option<&ProtocolRule> {
        self.by_id.get(rule_id).map(|index| &self.rules[*index])
    }

    pub fn rule_at(&self, index: usize) -> Option<&ProtocolRule> {
        self.rules.get(index)
    }

    /// Comparison forms for the rule at `index`.
    pub fn names_at(&self, index: usize) -> Option<&RuleNames> {
        self.names.get(index)
    }

    /// Indices of rules whose canonical name equals `name` once normalized
    /// or cleaned, in load order.
    pub fn procedure_indices(&self, name: &str) -> Vec<usize> {
        lookup(&self.procedure_index, name)
    }

    /// Indices of rules with an alias equal to `name` once normalized or
    /// cleaned, in load order.
    pub fn alias_indices(&self, name: &str) -> Vec<usize> {
        lookup(&self.alias_index, name)
    }

    pub fn find_by_procedure(&self, name: &str) -> Vec<&ProtocolRule> {
        self.procedure_indices(name)
            .into_iter()
            .map(|index| &self.rules[index])
            .collect()
    }

    pub fn find_by_alias(&self, name: &str) -> Vec<&ProtocolRule> {
        self.alias_indices(name)
            .into_iter()
            .map(|index| &self.rules[index])
            .collect()
    }

    /// Canonical procedure names in load order.
    pub fn procedures(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.procedure.as_str()).collect()
    }

    pub fn statistics(&self) -> RepositoryStatistics {
        let mut stats = RepositoryStatistics {
            total_rules: self.rules.len(),
            ..RepositoryStatistics::default()
        };
        for rule in &self.rules {
            if rule.is_prophylaxis_required {
                stats.prophylaxis_required += 1;
            } else {
                stats.prophylaxis_not_required += 1;
            }
            let section = if rule.section.trim().is_empty() {
                "(sem secao)".to_string()
            } else {
                rule.section.trim().to_string()
            };
            *stats.rules_by_section.entry(section).or_default() += 1;
        }
        stats
    }
}

fn add_forms(
    index: &mut HashMap<String, Vec<usize>>,
    names: &mut RuleNames,
    raw: &str,
    rule_index: usize,
) {
    let normalized = normalize_text(raw);
    let cleaned = clean_procedure_name(raw);
    for key in [&normalized, &cleaned] {
        if key.is_empty() {
            continue;
        }
        let entry = index.entry(key.clone()).or_default();
        if !entry.contains(&rule_index) {
            entry.push(rule_index);
        }
    }
    if !normalized.is_empty() && !names.normalized.contains(&normalized) {
        names.normalized.push(normalized);
    }
    if !cleaned.is_empty() && !names.cleaned.contains(&cleaned) {
        names.cleaned.push(cleaned);
    }
}

fn lookup(index: &HashMap<String, Vec<usize>>, name: &str) -> Vec<usize> {
    let normalized = normalize_text(name);
    let cleaned = clean_procedure_name(name);
    let mut found = Vec::new();
    for key in [&normalized, &cleaned] {
        if let Some(indices) = index.get(key.as_str()) {
            for index in indices {
                if !found.contains(index) {
                    found.push(*index);
                }
            }
        }
    }
    found.sort_unstable();
    found
}
