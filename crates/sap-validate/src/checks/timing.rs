//! Administration time relative to the incision.

use sap_model::{AuditDeltas, CriterionVerdict, ReasonCode};
use sap_normalization::minutes_between;

use super::CheckContext;

pub fn check(ctx: &CheckContext<'_>, deltas: &mut AuditDeltas) -> CriterionVerdict {
    let record = ctx.record;
    if !record.antibiotic_given {
        return CriterionVerdict::conforme(ReasonCode::CriterioNaoAplicavel);
    }
    let (Some(administration), Some(incision)) = (record.administration_time, record.incision_time)
    else {
        return CriterionVerdict::indeterminado(ReasonCode::HorariosNaoInformados);
    };

    let before_incision = minutes_between(administration, incision);
    deltas.timing_diff_minutes = Some(before_incision);

    if before_incision < 0 {
        CriterionVerdict::nao_conforme(ReasonCode::TimingAposIncisao)
    } else if before_incision <= ctx.config.timing_window_minutes {
        CriterionVerdict::conforme(ReasonCode::TimingCorreto)
    } else {
        CriterionVerdict::nao_conforme(ReasonCode::TimingForaJanela)
    }
}
