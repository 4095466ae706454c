use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span, trace};

use sap_cli::logging::redact_value;
use sap_cli::report::AuditReport;
use sap_ingest::{RecordBuilder, load_rules, load_translations, read_surgery_csv};
use sap_map::{RuleRepository, TranslationDictionary};
use sap_model::AuditConfig;
use sap_validate::{AuditStatistics, Auditor};

use crate::cli::{AuditArgs, ConfigArgs, RulesArgs};
use crate::types::{AuditRun, RuleSummary};

const PROGRESS_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

fn load_config(path: Option<&std::path::Path>) -> Result<AuditConfig> {
    match path {
        Some(path) => AuditConfig::from_toml_path(path)
            .with_context(|| format!("load config: {}", path.display())),
        None => Ok(AuditConfig::default()),
    }
}

pub fn run_audit(args: &AuditArgs) -> Result<AuditRun> {
    let span = info_span!("audit", surgeries = %args.surgeries.display());
    let _guard = span.enter();
    let start = Instant::now();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(threshold) = args.match_threshold {
        config.match_threshold = threshold;
    }
    config.validate().context("validate config")?;

    let source = load_rules(&args.rules).context("load rules")?;
    let rules_sha256 = source.sha256.clone();
    let repository = RuleRepository::new(source.rules).context("build rule repository")?;
    let translations = match &args.translations {
        Some(path) => {
            TranslationDictionary::new(load_translations(path).context("load translations")?)
        }
        None => TranslationDictionary::default(),
    };
    info!(
        rules = repository.len(),
        translations = translations.len(),
        "protocol loaded"
    );

    let table = read_surgery_csv(&args.surgeries, &RecordBuilder::new(&config.drugs))
        .context("read surgeries")?;
    let auditor =
        Auditor::new(&repository, translations, config).context("initialize auditor")?;

    let progress = ProgressBar::new(table.records.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    progress.set_message("auditing");
    let results = auditor.audit_batch_with(&table.records, |result| {
        progress.inc(1);
        trace!(
            row = ?result.record.row_index,
            procedure = redact_value(&result.record.procedure),
            antibiotic = redact_value(&result.record.antibiotic_text),
            status = %result.final_verdict.status,
            "record result"
        );
    });
    progress.finish_and_clear();

    let statistics = AuditStatistics::from_results(&results);
    if let Some(path) = &args.output {
        AuditReport {
            rules_sha256: &rules_sha256,
            skipped_rows: table.skipped_rows,
            statistics: &statistics,
            results: &results,
        }
        .write_json(path)?;
        info!(path = %path.display(), "audit report written");
    }
    info!(
        records = results.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "audit complete"
    );

    Ok(AuditRun {
        rules_path: args.rules.clone(),
        rules_sha256,
        results,
        statistics,
        skipped_rows: table.skipped_rows,
        output: args.output.clone(),
    })
}

pub fn run_rules(args: &RulesArgs) -> Result<RuleSummary> {
    let source = load_rules(&args.rules).context("load rules")?;
    let rules_sha256 = source.sha256.clone();
    let repository = RuleRepository::new(source.rules).context("build rule repository")?;
    Ok(RuleSummary {
        rules_path: args.rules.clone(),
        rules_sha256,
        statistics: repository.statistics(),
    })
}

pub fn run_config(args: &ConfigArgs) -> Result<String> {
    let config = load_config(args.config.as_deref())?;
    config.to_toml_string().context("render config")
}
