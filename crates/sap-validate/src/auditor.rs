//! Single-record and batch auditing.

use sap_map::{MatchSettings, ProcedureMatcher, RuleRepository, TranslationDictionary};
use sap_model::{
    AuditConfig, AuditDeltas, AuditResult, ConfigError, ProtocolContext, ProtocolRule, ReasonCode,
    SurgeryRecord,
};
use sap_normalization::DrugResolver;
use tracing::{debug, info, warn};

use crate::checks::{self, CheckContext};
use crate::combine::{CriterionSet, combine};
use crate::error::EvaluationError;

/// Audits surgery records against one rule repository and configuration.
pub struct Auditor<'a> {
    matcher: ProcedureMatcher<'a>,
    resolver: DrugResolver,
    config: AuditConfig,
}

impl<'a> Auditor<'a> {
    /// Validates the configuration and prepares the matcher and drug resolver.
    pub fn new(
        repository: &'a RuleRepository,
        translations: TranslationDictionary,
        config: AuditConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let matcher =
            ProcedureMatcher::new(repository, translations, MatchSettings::from_config(&config));
        let resolver = DrugResolver::new(&config.drugs);
        Ok(Self {
            matcher,
            resolver,
            config,
        })
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn matcher(&self) -> &ProcedureMatcher<'a> {
        &self.matcher
    }

    pub fn resolver(&self) -> &DrugResolver {
        &self.resolver
    }

    /// Audits one record.
    pub fn audit_record(&self, record: &SurgeryRecord) -> Result<AuditResult, EvaluationError> {
        check_finite(record)?;

        let found = self.matcher.match_procedure(&record.procedure);
        let rule = self.matcher.rule(&found);

        let mut result = AuditResult::pending(record.clone());
        result.match_score = found.score;
        result.match_method = found.method;
        match rule {
            Some(rule) => {
                result.matched_rule_id = Some(rule.rule_id.clone());
                result.protocol = protocol_context(rule);
            }
            None => result.add_observation(ReasonCode::SemMatchProtocolo.description()),
        }

        let ctx = CheckContext::new(record, rule, &self.config, &self.resolver);
        let mut deltas = AuditDeltas::default();
        let criteria = CriterionSet {
            choice: checks::choice::check(&ctx),
            dose: checks::dose::check(&ctx, &mut deltas),
            timing: checks::timing::check(&ctx, &mut deltas),
            redosing: checks::redosing::check(&ctx, &mut deltas),
        };

        if record.antibiotic_given
            && let Ok(expected) = checks::dose::expected_dose(&ctx)
            && let Some(limit) = expected.capped_at
        {
            result.add_observation(format!("Dose esperada limitada a {limit:.0} mg"));
        }

        result.choice = criteria.choice;
        result.dose = criteria.dose;
        result.timing = criteria.timing;
        result.redosing = criteria.redosing;
        result.deltas = deltas;
        result.final_verdict = combine(&criteria, rule.is_some());

        debug!(
            row = ?record.row_index,
            rule_id = result.matched_rule_id.as_deref().unwrap_or("-"),
            method = %result.match_method,
            status = %result.final_verdict.status,
            "record audited"
        );
        Ok(result)
    }

    /// Audits every record, keeping input order.
    ///
    /// A record that cannot be evaluated yields an INDETERMINADO result with
    /// the error as an observation; the remaining records are still audited.
    pub fn audit_batch(&self, records: &[SurgeryRecord]) -> Vec<AuditResult> {
        self.audit_batch_with(records, |_| {})
    }

    /// Like [`Auditor::audit_batch`], calling `inspect` after each record.
    pub fn audit_batch_with<F>(
        &self,
        records: &[SurgeryRecord],
        mut inspect: F,
    ) -> Vec<AuditResult>
    where
        F: FnMut(&AuditResult),
    {
        info!(records = records.len(), "starting audit");
        let mut failed = 0usize;
        let results: Vec<AuditResult> = records
            .iter()
            .map(|record| {
                let result = self.audit_record(record).unwrap_or_else(|error| {
                    warn!(row = ?record.row_index, %error, "record could not be audited");
                    failed += 1;
                    AuditResult::failed(
                        record.clone(),
                        format!("{}: {error}", ReasonCode::ErroAuditoria.description()),
                    )
                });
                inspect(&result);
                result
            })
            .collect();
        info!(results = results.len(), failed, "audit finished");
        results
    }
}

fn protocol_context(rule: &ProtocolRule) -> ProtocolContext {
    ProtocolContext {
        section: rule.section.clone(),
        procedure: rule.procedure.clone(),
        prophylaxis_required: rule.is_prophylaxis_required,
        recommended_drugs: rule
            .primary_recommendation
            .usable_drugs()
            .map(|drug| drug.name.trim().to_string())
            .collect(),
        expected_dose: rule.expected_dose_text().map(str::to_string),
    }
}

fn check_finite(record: &SurgeryRecord) -> Result<(), EvaluationError> {
    let fields = [
        ("administered_dose_mg", record.administered_dose_mg),
        ("patient_weight_kg", record.patient_weight_kg),
    ];
    for (field, value) in fields {
        if let Some(value) = value
            && !value.is_finite()
        {
            return Err(EvaluationError::NonFinite {
                row: record
                    .row_index
                    .map_or_else(|| "?".to_string(), |row| row.to_string()),
                field,
                value,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_weight_names_row_and_field() {
        let record = SurgeryRecord {
            row_index: Some(7),
            patient_weight_kg: Some(f64::INFINITY),
            ..SurgeryRecord::new("Colecistectomia")
        };
        let error = check_finite(&record).unwrap_err();
        assert_eq!(
            error,
            EvaluationError::NonFinite {
                row: "7".to_string(),
                field: "patient_weight_kg",
                value: f64::INFINITY,
            }
        );
        assert_eq!(
            error.to_string(),
            "row 7: patient_weight_kg is not a finite number (inf)"
        );
    }

    #[test]
    fn missing_row_index_is_reported_as_unknown() {
        let record = SurgeryRecord {
            administered_dose_mg: Some(f64::NEG_INFINITY),
            ..SurgeryRecord::new("Colecistectomia")
        };
        let message = check_finite(&record).unwrap_err().to_string();
        assert!(message.starts_with("row ?: administered_dose_mg"), "{message}");
    }

    #[test]
    fn finite_values_pass() {
        let record = SurgeryRecord {
            row_index: Some(0),
            administered_dose_mg: Some(2000.0),
            patient_weight_kg: Some(70.0),
            ..SurgeryRecord::new("Colecistectomia")
        };
        assert!(check_finite(&record).is_ok());
    }
}
