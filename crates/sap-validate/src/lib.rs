//! Conformity evaluation of surgical antibiotic prophylaxis.
//!
//! An [`Auditor`] matches each record to a protocol rule, runs the choice,
//! dose, timing and redosing checks, and combines them into a final verdict.

#![deny(unsafe_code)]

pub mod auditor;
pub mod checks;
pub mod combine;
pub mod error;
pub mod statistics;

pub use auditor::Auditor;
pub use checks::CheckContext;
pub use combine::{CriterionSet, combine};
pub use error::EvaluationError;
pub use statistics::{AuditStatistics, CriteriaCounts, MatchQuality};
