use serde::{Deserialize, Serialize};
use std::fmt;

/// How a surgery's procedure name was resolved to a protocol rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    TranslatedExactMatch,
    TranslatedAliasMatch,
    TranslatedFuzzyMatch,
    ExactMatch,
    AliasMatch,
    FuzzyMatch,
    #[default]
    NoMatch,
    NoProcedure,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::TranslatedExactMatch => "translated_exact_match",
            MatchMethod::TranslatedAliasMatch => "translated_alias_match",
            MatchMethod::TranslatedFuzzyMatch => "translated_fuzzy_match",
            MatchMethod::ExactMatch => "exact_match",
            MatchMethod::AliasMatch => "alias_match",
            MatchMethod::FuzzyMatch => "fuzzy_match",
            MatchMethod::NoMatch => "no_match",
            MatchMethod::NoProcedure => "no_procedure",
        }
    }

    /// Returns true when the method resolved a rule.
    pub fn is_match(&self) -> bool {
        !matches!(self, MatchMethod::NoMatch | MatchMethod::NoProcedure)
    }

    /// Returns true for methods that went through the translation dictionary.
    pub fn is_translated(&self) -> bool {
        matches!(
            self,
            MatchMethod::TranslatedExactMatch
                | MatchMethod::TranslatedAliasMatch
                | MatchMethod::TranslatedFuzzyMatch
        )
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
