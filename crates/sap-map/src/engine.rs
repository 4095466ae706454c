//! Procedure matcher: translation first, then direct matching.

use sap_model::{AuditConfig, MatchMethod, ProtocolRule};
use tracing::debug;

use crate::repository::RuleRepository;
use crate::strategy::{MatchStage, MatchStrategy, RuleMatch, default_strategies};
use crate::translation::{TranslationDictionary, is_plausible};

/// Thresholds used while matching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSettings {
    /// Minimum fuzzy score for a match (default 0.70).
    pub threshold: f64,
    /// Minimum fuzzy score for a translation to be believed (default 0.45).
    pub plausibility_threshold: f64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self::from_config(&AuditConfig::default())
    }
}

impl MatchSettings {
    pub fn from_config(config: &AuditConfig) -> Self {
        Self {
            threshold: config.match_threshold,
            plausibility_threshold: config.translation_plausibility_threshold,
        }
    }
}

/// Resolves free-text procedure names to protocol rules.
pub struct ProcedureMatcher<'a> {
    repository: &'a RuleRepository,
    translations: TranslationDictionary,
    strategies: Vec<Box<dyn MatchStrategy>>,
    settings: MatchSettings,
}

impl<'a> ProcedureMatcher<'a> {
    pub fn new(
        repository: &'a RuleRepository,
        translations: TranslationDictionary,
        settings: MatchSettings,
    ) -> Self {
        Self {
            repository,
            translations,
            strategies: default_strategies(),
            settings,
        }
    }

    /// Replaces the strategy list.
    #[must_use]
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn repository(&self) -> &'a RuleRepository {
        self.repository
    }

    pub fn settings(&self) -> MatchSettings {
        self.settings
    }

    /// Rule referenced by a match, if any.
    pub fn rule(&self, found: &RuleMatch) -> Option<&'a ProtocolRule> {
        found.rule_index.and_then(|index| self.repository.rule_at(index))
    }

    /// Matches a procedure name; the first stage that finds a rule wins.
    pub fn match_procedure(&self, procedure: &str) -> RuleMatch {
        if procedure.trim().is_empty() {
            return RuleMatch::none(MatchMethod::NoProcedure);
        }

        if let Some(found) = self.match_translated(procedure) {
            return found;
        }

        let cleaned = MatchStage::Direct.prepare(procedure);
        if let Some(found) = self.run_strategies(&cleaned, MatchStage::Direct) {
            return found;
        }

        debug!("no protocol rule matched");
        RuleMatch::none(MatchMethod::NoMatch)
    }

    fn match_translated(&self, procedure: &str) -> Option<RuleMatch> {
        let candidates = self.translations.candidates(procedure);
        if candidates.is_empty() {
            return None;
        }
        let mut rejected = 0usize;
        for candidate in &candidates {
            if !is_plausible(procedure, candidate, self.settings.plausibility_threshold) {
                rejected += 1;
                continue;
            }
            let prepared = MatchStage::Translated.prepare(candidate);
            if let Some(found) = self.run_strategies(&prepared, MatchStage::Translated) {
                return Some(found);
            }
        }
        debug!(
            candidates = candidates.len(),
            rejected, "translation did not resolve a rule"
        );
        None
    }

    fn run_strategies(&self, name: &str, stage: MatchStage) -> Option<RuleMatch> {
        if name.is_empty() {
            return None;
        }
        self.strategies.iter().find_map(|strategy| {
            let found = strategy.find(name, stage, self.repository, self.settings.threshold)?;
            if let Some(rule) = self.rule(&found) {
                debug!(
                    strategy = strategy.name(),
                    rule_id = %rule.rule_id,
                    score = found.score,
                    method = %found.method,
                    "procedure matched"
                );
            }
            Some(found)
        })
    }
}
