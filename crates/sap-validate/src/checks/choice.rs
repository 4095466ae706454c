//! Antibiotic choice against the protocol recommendation.

use sap_model::{CriterionVerdict, ReasonCode};

use super::CheckContext;

pub fn check(ctx: &CheckContext<'_>) -> CriterionVerdict {
    let required = ctx.rule.is_some_and(|rule| rule.is_prophylaxis_required);

    if !ctx.record.antibiotic_given {
        return match ctx.rule {
            None => CriterionVerdict::conforme(ReasonCode::SemMatchSemAtb),
            Some(_) if !required => CriterionVerdict::conforme(ReasonCode::ProfilaxiaNaoRequerida),
            Some(_) => CriterionVerdict::nao_conforme(ReasonCode::AtbNaoAdministrado),
        };
    }

    if ctx.rule.is_none() {
        return CriterionVerdict::indeterminado(ReasonCode::SemMatchProtocolo);
    }

    if ctx.recommended.is_empty() {
        return if required {
            CriterionVerdict::indeterminado(ReasonCode::AtbSemReferenciaProtocolo)
        } else {
            CriterionVerdict::alerta(ReasonCode::ProfilaxiaPotencialSemIndicacao)
        };
    }

    if !ctx.has_detected_drug() {
        return CriterionVerdict::indeterminado(ReasonCode::AtbNaoIdentificado);
    }

    if ctx.detected().any(|drug| ctx.is_recommended(&drug)) {
        CriterionVerdict::conforme(ReasonCode::AtbRecomendado)
    } else if required {
        CriterionVerdict::nao_conforme(ReasonCode::AtbNaoRecomendado)
    } else {
        CriterionVerdict::alerta(ReasonCode::AtbNaoRecomendado)
    }
}
