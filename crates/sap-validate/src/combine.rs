//! Final verdict over the four criteria.
//!
//! Precedence, first hit wins:
//! 1. choice INDETERMINADO: ALERTA (no protocol match, or insufficient data);
//! 2. any NAO_CONFORME: NAO_CONFORME with every non-conforming reason in
//!    choice, dose, timing, redosing order;
//! 3. any ALERTA: ALERTA with the dose reason, else the choice reason, else a
//!    generic manual-review reason;
//! 4. CONFORME.
//!
//! INDETERMINADO dose, timing or redosing verdicts never change a CONFORME
//! final verdict.

use sap_model::{ConformityStatus, CriterionVerdict, FinalVerdict, ReasonCode};

/// The four criterion verdicts of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriterionSet {
    pub choice: CriterionVerdict,
    pub dose: CriterionVerdict,
    pub timing: CriterionVerdict,
    pub redosing: CriterionVerdict,
}

impl CriterionSet {
    fn in_order(&self) -> [CriterionVerdict; 4] {
        [self.choice, self.dose, self.timing, self.redosing]
    }
}

pub fn combine(criteria: &CriterionSet, has_rule: bool) -> FinalVerdict {
    if criteria.choice.is(ConformityStatus::Indeterminado) {
        let reason = if has_rule {
            ReasonCode::DadosInsuficientes
        } else {
            ReasonCode::SemMatchProtocolo
        };
        return FinalVerdict::single(ConformityStatus::Alerta, reason);
    }

    let non_conforming: Vec<ReasonCode> = criteria
        .in_order()
        .iter()
        .filter(|verdict| verdict.is(ConformityStatus::NaoConforme))
        .map(|verdict| verdict.reason)
        .collect();
    if !non_conforming.is_empty() {
        return FinalVerdict {
            status: ConformityStatus::NaoConforme,
            reasons: non_conforming,
        };
    }

    if criteria
        .in_order()
        .iter()
        .any(|verdict| verdict.is(ConformityStatus::Alerta))
    {
        let reason = [criteria.dose, criteria.choice]
            .into_iter()
            .find(|verdict| verdict.is(ConformityStatus::Alerta))
            .map_or(ReasonCode::AlertaValidacao, |verdict| verdict.reason);
        return FinalVerdict::single(ConformityStatus::Alerta, reason);
    }

    FinalVerdict::single(ConformityStatus::Conforme, ReasonCode::TodosCriteriosConformes)
}
