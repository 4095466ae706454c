//! Audit results produced for each surgery record.

use serde::{Deserialize, Serialize};

use crate::matching::MatchMethod;
use crate::reason::{ReasonCode, join_codes};
use crate::status::ConformityStatus;
use crate::surgery::SurgeryRecord;

/// Status and reason of one audit criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionVerdict {
    pub status: ConformityStatus,
    pub reason: ReasonCode,
}

impl CriterionVerdict {
    pub fn new(status: ConformityStatus, reason: ReasonCode) -> Self {
        Self { status, reason }
    }

    pub fn conforme(reason: ReasonCode) -> Self {
        Self::new(ConformityStatus::Conforme, reason)
    }

    pub fn nao_conforme(reason: ReasonCode) -> Self {
        Self::new(ConformityStatus::NaoConforme, reason)
    }

    pub fn alerta(reason: ReasonCode) -> Self {
        Self::new(ConformityStatus::Alerta, reason)
    }

    pub fn indeterminado(reason: ReasonCode) -> Self {
        Self::new(ConformityStatus::Indeterminado, reason)
    }

    pub fn is(&self, status: ConformityStatus) -> bool {
        self.status == status
    }
}

/// Combined verdict over the four criteria.
///
/// `reasons` holds one code per non-conforming criterion, or exactly one code
/// for every other outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalVerdict {
    pub status: ConformityStatus,
    pub reasons: Vec<ReasonCode>,
}

impl FinalVerdict {
    pub fn single(status: ConformityStatus, reason: ReasonCode) -> Self {
        Self {
            status,
            reasons: vec![reason],
        }
    }

    /// Comma-joined reason codes.
    pub fn reason_text(&self) -> String {
        join_codes(&self.reasons)
    }
}

/// Protocol data copied from the matched rule for reporting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtocolContext {
    pub section: String,
    pub procedure: String,
    pub prophylaxis_required: bool,
    pub recommended_drugs: Vec<String>,
    pub expected_dose: Option<String>,
}

/// Numeric differences computed while evaluating the criteria.
///
/// A field is only set when its value was computed from real data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditDeltas {
    /// Administered minus expected dose.
    pub dose_diff_mg: Option<f64>,
    /// `dose_diff_mg` relative to the expected dose, in percent.
    pub dose_diff_pct: Option<f64>,
    /// Minutes from administration to incision.
    pub timing_diff_minutes: Option<i64>,
    /// Minutes from administration to redose.
    pub redose_diff_minutes: Option<i64>,
}

/// Outcome of auditing one surgery record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    pub record: SurgeryRecord,
    pub matched_rule_id: Option<String>,
    pub match_score: f64,
    pub match_method: MatchMethod,
    pub protocol: ProtocolContext,
    pub choice: CriterionVerdict,
    pub dose: CriterionVerdict,
    pub timing: CriterionVerdict,
    pub redosing: CriterionVerdict,
    pub final_verdict: FinalVerdict,
    pub deltas: AuditDeltas,
    pub observations: Vec<String>,
}

impl AuditResult {
    /// Creates a result with every criterion undecided.
    pub fn pending(record: SurgeryRecord) -> Self {
        let undecided = CriterionVerdict::indeterminado(ReasonCode::DadosInsuficientes);
        Self {
            record,
            matched_rule_id: None,
            match_score: 0.0,
            match_method: MatchMethod::NoMatch,
            protocol: ProtocolContext::default(),
            choice: undecided,
            dose: undecided,
            timing: undecided,
            redosing: undecided,
            final_verdict: FinalVerdict::single(
                ConformityStatus::Indeterminado,
                ReasonCode::DadosInsuficientes,
            ),
            deltas: AuditDeltas::default(),
            observations: Vec::new(),
        }
    }

    /// Result for a record whose evaluation failed.
    pub fn failed(record: SurgeryRecord, error: impl Into<String>) -> Self {
        let mut result = Self::pending(record);
        result.final_verdict =
            FinalVerdict::single(ConformityStatus::Indeterminado, ReasonCode::ErroAuditoria);
        result.add_observation(error);
        result
    }

    /// Appends an observation unless it is blank or already present.
    pub fn add_observation(&mut self, observation: impl Into<String>) {
        let observation = observation.into();
        if observation.trim().is_empty() || self.observations.contains(&observation) {
            return;
        }
        self.observations.push(observation);
    }

    /// Final status is CONFORME or ALERTA.
    pub fn is_conformant(&self) -> bool {
        self.final_verdict.status.is_acceptable()
    }

    pub fn is_non_conformant(&self) -> bool {
        self.final_verdict.status == ConformityStatus::NaoConforme
    }

    /// Criteria in report order.
    pub fn criteria(&self) -> [(&'static str, CriterionVerdict); 4] {
        [
            ("choice", self.choice),
            ("dose", self.dose),
            ("timing", self.timing),
            ("redosing", self.redosing),
        ]
    }
}
