//! Administered dose against the reference dose.

use sap_model::{AuditDeltas, CriterionVerdict, ReasonCode};
use sap_normalization::{extract_dose_mg, parse_weight_based};

use super::CheckContext;

/// Expected dose for the reference drug, or the reason it is unknown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedDose {
    pub mg: f64,
    /// Set when a weight-based dose was lowered to the drug cap.
    pub capped_at: Option<f64>,
}

pub fn expected_dose(ctx: &CheckContext<'_>) -> Result<ExpectedDose, ReasonCode> {
    let reference = ctx.reference_drug().ok_or(ReasonCode::DoseSemReferencia)?;
    let spec = reference
        .recommendation
        .dose_text()
        .ok_or(ReasonCode::DoseSemReferencia)?;

    if let Some(per_kg) = parse_weight_based(spec) {
        let weight = ctx
            .record
            .reported_weight_kg()
            .ok_or(ReasonCode::DoseSemReferenciaPeso)?;
        let uncapped = per_kg.expected_mg(weight);
        let limit = ctx
            .config
            .dose_cap(&reference.canonical)
            .map(|cap| cap.limit_for(weight))
            .filter(|limit| uncapped > *limit);
        let mg = limit.unwrap_or(uncapped);
        if mg <= 0.0 {
            return Err(ReasonCode::DoseSemReferencia);
        }
        return Ok(ExpectedDose {
            mg,
            capped_at: limit,
        });
    }

    extract_dose_mg(spec)
        .filter(|mg| *mg > 0.0)
        .map(|mg| ExpectedDose {
            mg,
            capped_at: None,
        })
        .ok_or(ReasonCode::DoseSemReferencia)
}

pub fn check(ctx: &CheckContext<'_>, deltas: &mut AuditDeltas) -> CriterionVerdict {
    if !ctx.record.antibiotic_given {
        return CriterionVerdict::indeterminado(ReasonCode::DoseNaoInformada);
    }

    let expected = match expected_dose(ctx) {
        Ok(expected) => expected,
        Err(reason) => return CriterionVerdict::indeterminado(reason),
    };
    let Some(administered) = ctx.record.reported_dose_mg() else {
        return CriterionVerdict::indeterminado(ReasonCode::DoseNaoInformada);
    };

    let diff_mg = administered - expected.mg;
    let diff_pct = diff_mg / expected.mg * 100.0;
    deltas.dose_diff_mg = Some(diff_mg);
    deltas.dose_diff_pct = Some(diff_pct);

    classify(diff_pct, ctx)
}

fn classify(diff_pct: f64, ctx: &CheckContext<'_>) -> CriterionVerdict {
    let tolerance = &ctx.config.dose_tolerance;
    let magnitude = diff_pct.abs();
    if magnitude <= tolerance.alert_pct {
        CriterionVerdict::conforme(ReasonCode::DoseCorreta)
    } else if magnitude <= tolerance.standard_pct {
        CriterionVerdict::alerta(ReasonCode::DosePequenaDiferenca)
    } else if magnitude <= tolerance.hard_pct {
        CriterionVerdict::alerta(ReasonCode::DoseForaReferencia)
    } else if diff_pct < -tolerance.standard_pct {
        CriterionVerdict::nao_conforme(ReasonCode::DoseMuitoBaixa)
    } else {
        CriterionVerdict::nao_conforme(ReasonCode::DoseMuitoAlta)
    }
}
