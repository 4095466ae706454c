#![deny(unsafe_code)]

//! Protocol rule repository and procedure matching.

pub mod engine;
pub mod error;
pub mod repository;
pub mod strategy;
pub mod translation;

pub use engine::{MatchSettings, ProcedureMatcher};
pub use error::RepositoryError;
pub use repository::{RepositoryStatistics, RuleNames, RuleRepository};
pub use strategy::{
    AliasStrategy, ExactNameStrategy, FuzzyStrategy, MatchStage, MatchStrategy, RuleMatch,
    default_strategies,
};
pub use translation::{TranslationDictionary, is_plausible};
