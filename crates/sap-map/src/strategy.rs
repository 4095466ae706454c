//! Match strategies tried in order by the procedure matcher.
//!
//! Each strategy looks at one prepared name and answers with at most one
//! rule. The matcher runs the same list for translated candidates and for the
//! direct input; the stage only changes which name forms are compared and the
//! method tag that is reported.

use sap_model::MatchMethod;
use sap_normalization::{clean_procedure_name, fuzzy_score, normalize_text};

use crate::repository::{RuleNames, RuleRepository};

/// A resolved (or unresolved) procedure match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleMatch {
    /// Position of the rule in the repository; `None` when nothing matched.
    pub rule_index: Option<usize>,
    pub score: f64,
    pub method: MatchMethod,
}

impl RuleMatch {
    pub fn found(rule_index: usize, score: f64, method: MatchMethod) -> Self {
        Self {
            rule_index: Some(rule_index),
            score,
            method,
        }
    }

    /// No rule, score 0.
    pub fn none(method: MatchMethod) -> Self {
        Self {
            rule_index: None,
            score: 0.0,
            method,
        }
    }

    pub fn is_match(&self) -> bool {
        self.rule_index.is_some()
    }
}

/// Where the name being matched came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    /// A candidate taken from the translation dictionary.
    Translated,
    /// The procedure name as written in the sheet.
    Direct,
}

impl MatchStage {
    /// Comparison form of a name for this stage.
    pub fn prepare(self, name: &str) -> String {
        match self {
            MatchStage::Translated => normalize_text(name),
            MatchStage::Direct => clean_procedure_name(name),
        }
    }

    fn rule_names(self, names: &RuleNames) -> &[String] {
        match self {
            MatchStage::Translated => &names.normalized,
            MatchStage::Direct => &names.cleaned,
        }
    }
}

/// One way of resolving a prepared name to a rule.
pub trait MatchStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Method tag reported for a match found at `stage`.
    fn method(&self, stage: MatchStage) -> MatchMethod;

    /// Finds a rule for `name`, already prepared for `stage`.
    fn find(
        &self,
        name: &str,
        stage: MatchStage,
        repository: &RuleRepository,
        threshold: f64,
    ) -> Option<RuleMatch>;
}

/// Exact match against canonical procedure names.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactNameStrategy;

impl MatchStrategy for ExactNameStrategy {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn method(&self, stage: MatchStage) -> MatchMethod {
        match stage {
            MatchStage::Translated => MatchMethod::TranslatedExactMatch,
            MatchStage::Direct => MatchMethod::ExactMatch,
        }
    }

    fn find(
        &self,
        name: &str,
        stage: MatchStage,
        repository: &RuleRepository,
        _threshold: f64,
    ) -> Option<RuleMatch> {
        let index = *repository.procedure_indices(name).first()?;
        Some(RuleMatch::found(index, 1.0, self.method(stage)))
    }
}

/// Exact match against rule aliases.
#[derive(Debug, Clone, Copy, Default)]
pub struct AliasStrategy;

impl MatchStrategy for AliasStrategy {
    fn name(&self) -> &'static str {
        "alias"
    }

    fn method(&self, stage: MatchStage) -> MatchMethod {
        match stage {
            MatchStage::Translated => MatchMethod::TranslatedAliasMatch,
            MatchStage::Direct => MatchMethod::AliasMatch,
        }
    }

    fn find(
        &self,
        name: &str,
        stage: MatchStage,
        repository: &RuleRepository,
        _threshold: f64,
    ) -> Option<RuleMatch> {
        let index = *repository.alias_indices(name).first()?;
        Some(RuleMatch::found(index, 1.0, self.method(stage)))
    }
}

/// Best token-set score over canonical names and aliases.
///
/// Only a strictly higher score replaces the current best, so ties keep the
/// rule loaded first.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyStrategy;

impl MatchStrategy for FuzzyStrategy {
    fn name(&self) -> &'static str {
        "fuzzy"
    }

    fn method(&self, stage: MatchStage) -> MatchMethod {
        match stage {
            MatchStage::Translated => MatchMethod::TranslatedFuzzyMatch,
            MatchStage::Direct => MatchMethod::FuzzyMatch,
        }
    }

    fn find(
        &self,
        name: &str,
        stage: MatchStage,
        repository: &RuleRepository,
        threshold: f64,
    ) -> Option<RuleMatch> {
        if name.is_empty() {
            return None;
        }
        let mut best: Option<(usize, f64)> = None;
        for index in 0..repository.len() {
            let Some(names) = repository.names_at(index) else {
                continue;
            };
            let score = stage
                .rule_names(names)
                .iter()
                .map(|candidate| fuzzy_score(name, candidate))
                .fold(0.0_f64, f64::max);
            if score > 0.0
                && score >= threshold
                && best.is_none_or(|(_, best_score)| score > best_score)
            {
                best = Some((index, score));
            }
        }
        best.map(|(index, score)| RuleMatch::found(index, score, self.method(stage)))
    }
}

/// Strategies in the order they are tried.
pub fn default_strategies() -> Vec<Box<dyn MatchStrategy>> {
    vec![
        Box::new(ExactNameStrategy),
        Box::new(AliasStrategy),
        Box::new(FuzzyStrategy),
    ]
}
