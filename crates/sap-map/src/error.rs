//! Error types for building the rule repository.

/// Errors raised while indexing protocol rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("duplicate rule id: {rule_id}")]
    DuplicateRuleId { rule_id: String },

    #[error("rule {rule_id} has a blank procedure name")]
    BlankProcedure { rule_id: String },

    #[error("rule at position {position} has a blank rule id")]
    BlankRuleId { position: usize },
}
