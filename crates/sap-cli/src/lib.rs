//! CLI library components for the prophylaxis auditor.

pub mod logging;
pub mod report;
