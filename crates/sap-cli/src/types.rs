use std::path::PathBuf;

use sap_map::RepositoryStatistics;
use sap_model::AuditResult;
use sap_validate::AuditStatistics;

#[derive(Debug)]
pub struct AuditRun {
    pub rules_path: PathBuf,
    pub rules_sha256: String,
    pub results: Vec<AuditResult>,
    pub statistics: AuditStatistics,
    pub skipped_rows: usize,
    pub output: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RuleSummary {
    pub rules_path: PathBuf,
    pub rules_sha256: String,
    pub statistics: RepositoryStatistics,
}
