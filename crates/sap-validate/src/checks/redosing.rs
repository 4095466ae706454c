//! Redose time against the drug's redosing interval.

use sap_model::{AuditDeltas, CriterionVerdict, ReasonCode};
use sap_normalization::minutes_between;

use super::CheckContext;

pub fn check(ctx: &CheckContext<'_>, deltas: &mut AuditDeltas) -> CriterionVerdict {
    let record = ctx.record;
    if !record.redose_performed {
        return CriterionVerdict::conforme(ReasonCode::RepiqueNaoAplicavel);
    }

    let drug = ctx
        .detected()
        .next()
        .or_else(|| ctx.recommended.first().map(|drug| drug.canonical.clone()));
    let Some(drug) = drug else {
        return CriterionVerdict::indeterminado(ReasonCode::AtbNaoIdentificado);
    };

    let Some(interval) = ctx.config.redosing_interval(&drug) else {
        return CriterionVerdict::conforme(ReasonCode::RepiqueNaoAplicavel);
    };

    let (Some(administration), Some(redose)) = (record.administration_time, record.redose_time)
    else {
        return CriterionVerdict::indeterminado(ReasonCode::RepiqueHorariosNaoInformados);
    };

    let elapsed = minutes_between(administration, redose);
    deltas.redose_diff_minutes = Some(elapsed);

    let interval = i64::from(interval);
    let tolerance = ctx.config.redosing_tolerance_minutes;
    if (interval - tolerance..=interval + tolerance).contains(&elapsed) {
        CriterionVerdict::conforme(ReasonCode::RepiqueNoIntervalo)
    } else {
        CriterionVerdict::nao_conforme(ReasonCode::RepiqueForaIntervalo)
    }
}
