pub mod config;
pub mod error;
pub mod matching;
pub mod reason;
pub mod result;
pub mod rule;
pub mod status;
pub mod surgery;

pub use config::{AuditConfig, DoseCap, DoseTolerance, DrugEntry};
pub use error::ConfigError;
pub use matching::MatchMethod;
pub use reason::{ReasonCode, join_codes, join_descriptions};
pub use result::{AuditDeltas, AuditResult, CriterionVerdict, FinalVerdict, ProtocolContext};
pub use rule::{DrugRecommendation, ProtocolRule, Recommendation};
pub use status::ConformityStatus;
pub use surgery::SurgeryRecord;
