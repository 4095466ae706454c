//! JSON audit report written by `sap-audit audit --output`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use sap_model::AuditResult;
use sap_validate::AuditStatistics;

#[derive(Debug, Serialize)]
pub struct AuditReport<'a> {
    /// SHA256 of the rules file the audit ran against.
    pub rules_sha256: &'a str,
    pub skipped_rows: usize,
    pub statistics: &'a AuditStatistics,
    pub results: &'a [AuditResult],
}

impl AuditReport<'_> {
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("create report: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("write report: {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("flush report: {}", path.display()))?;
        Ok(())
    }
}
