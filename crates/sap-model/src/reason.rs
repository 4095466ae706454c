//! Reason codes attached to criterion and final verdicts.
//!
//! Codes are serialized with the snake_case vocabulary already used by the
//! infection-control team; [`ReasonCode::description`] is the lookup table
//! for display text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of reasons a verdict can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    // Choice
    AtbRecomendado,
    AtbNaoRecomendado,
    ProfilaxiaNaoRequerida,
    ProfilaxiaPotencialSemIndicacao,
    AtbSemReferenciaProtocolo,
    AtbNaoIdentificado,
    AtbNaoAdministrado,
    SemMatchProtocolo,
    SemMatchSemAtb,

    // Dose
    DoseCorreta,
    DosePequenaDiferenca,
    DoseForaReferencia,
    DoseMuitoBaixa,
    DoseMuitoAlta,
    DoseSemReferencia,
    DoseSemReferenciaPeso,
    DoseNaoInformada,

    // Timing
    TimingCorreto,
    TimingAposIncisao,
    TimingForaJanela,
    HorariosNaoInformados,
    CriterioNaoAplicavel,

    // Redosing
    RepiqueNaoAplicavel,
    RepiqueHorariosNaoInformados,
    RepiqueNoIntervalo,
    RepiqueForaIntervalo,

    // Final
    DadosInsuficientes,
    AlertaValidacao,
    TodosCriteriosConformes,
    ErroAuditoria,
}

impl ReasonCode {
    /// Returns the snake_case code.
    pub fn code(&self) -> &'static str {
        match self {
            ReasonCode::AtbRecomendado => "atb_recomendado",
            ReasonCode::AtbNaoRecomendado => "atb_nao_recomendado",
            ReasonCode::ProfilaxiaNaoRequerida => "profilaxia_nao_requerida",
            ReasonCode::ProfilaxiaPotencialSemIndicacao => "profilaxia_potencial_sem_indicacao",
            ReasonCode::AtbSemReferenciaProtocolo => "atb_sem_referencia_protocolo",
            ReasonCode::AtbNaoIdentificado => "atb_nao_identificado",
            ReasonCode::AtbNaoAdministrado => "atb_nao_administrado",
            ReasonCode::SemMatchProtocolo => "sem_match_protocolo",
            ReasonCode::SemMatchSemAtb => "sem_match_sem_atb",
            ReasonCode::DoseCorreta => "dose_correta",
            ReasonCode::DosePequenaDiferenca => "dose_pequena_diferenca",
            ReasonCode::DoseForaReferencia => "dose_fora_referencia",
            ReasonCode::DoseMuitoBaixa => "dose_muito_baixa",
            ReasonCode::DoseMuitoAlta => "dose_muito_alta",
            ReasonCode::DoseSemReferencia => "dose_sem_referencia",
            ReasonCode::DoseSemReferenciaPeso => "dose_sem_referencia_peso",
            ReasonCode::DoseNaoInformada => "dose_nao_informada",
            ReasonCode::TimingCorreto => "timing_correto",
            ReasonCode::TimingAposIncisao => "timing_apos_incisao",
            ReasonCode::TimingForaJanela => "timing_fora_janela",
            ReasonCode::HorariosNaoInformados => "horarios_nao_informados",
            ReasonCode::CriterioNaoAplicavel => "criterio_nao_aplicavel",
            ReasonCode::RepiqueNaoAplicavel => "repique_nao_aplicavel",
            ReasonCode::RepiqueHorariosNaoInformados => "repique_horarios_nao_informados",
            ReasonCode::RepiqueNoIntervalo => "repique_no_intervalo",
            ReasonCode::RepiqueForaIntervalo => "repique_fora_intervalo",
            ReasonCode::DadosInsuficientes => "dados_insuficientes",
            ReasonCode::AlertaValidacao => "alerta_validacao",
            ReasonCode::TodosCriteriosConformes => "todos_criterios_conformes",
            ReasonCode::ErroAuditoria => "erro_auditoria",
        }
    }

    /// Display text for reports.
    pub fn description(&self) -> &'static str {
        match self {
            ReasonCode::AtbRecomendado => "Antibiotico recomendado pelo protocolo",
            ReasonCode::AtbNaoRecomendado => "Antibiotico nao recomendado pelo protocolo",
            ReasonCode::ProfilaxiaNaoRequerida => "Profilaxia nao requerida para o procedimento",
            ReasonCode::ProfilaxiaPotencialSemIndicacao => {
                "Profilaxia potencialmente sem indicacao no protocolo"
            }
            ReasonCode::AtbSemReferenciaProtocolo => {
                "Protocolo sem antibiotico de referencia para validar escolha"
            }
            ReasonCode::AtbNaoIdentificado => "Antibiotico administrado nao identificado",
            ReasonCode::AtbNaoAdministrado => "Antibiotico nao foi administrado",
            ReasonCode::SemMatchProtocolo => "Procedimento nao encontrado no protocolo",
            ReasonCode::SemMatchSemAtb => "Procedimento sem match e sem antibiotico administrado",
            ReasonCode::DoseCorreta => "Dose dentro da tolerancia",
            ReasonCode::DosePequenaDiferenca => "Pequena diferenca de dose detectada (revisar)",
            ReasonCode::DoseForaReferencia => "Dose fora da referencia, requer revisao",
            ReasonCode::DoseMuitoBaixa => "Dose significativamente abaixo da recomendada",
            ReasonCode::DoseMuitoAlta => "Dose significativamente acima da recomendada",
            ReasonCode::DoseSemReferencia => "Protocolo sem dose de referencia",
            ReasonCode::DoseSemReferenciaPeso => {
                "Nao foi possivel validar dose (falta peso do paciente)"
            }
            ReasonCode::DoseNaoInformada => "Dose administrada nao informada",
            ReasonCode::TimingCorreto => "Antibiotico administrado dentro da janela",
            ReasonCode::TimingAposIncisao => "Antibiotico administrado apos a incisao",
            ReasonCode::TimingForaJanela => "Antibiotico administrado fora da janela de 1 hora",
            ReasonCode::HorariosNaoInformados => "Horarios de incisao/antibiotico nao informados",
            ReasonCode::CriterioNaoAplicavel => "Criterio nao aplicavel para o caso",
            ReasonCode::RepiqueNaoAplicavel => "Repique nao aplicavel para este antibiotico",
            ReasonCode::RepiqueHorariosNaoInformados => "Horarios de repique nao informados",
            ReasonCode::RepiqueNoIntervalo => "Repique realizado dentro do intervalo recomendado",
            ReasonCode::RepiqueForaIntervalo => "Repique fora do intervalo recomendado",
            ReasonCode::DadosInsuficientes => "Dados insuficientes para avaliar conformidade",
            ReasonCode::AlertaValidacao => "Caso com alerta para validacao manual",
            ReasonCode::TodosCriteriosConformes => "Todos os criterios conformes",
            ReasonCode::ErroAuditoria => "Erro na auditoria",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Joins reason codes the way reports expect them (`a, b, c`).
pub fn join_codes(reasons: &[ReasonCode]) -> String {
    reasons
        .iter()
        .map(ReasonCode::code)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Joins reason descriptions with `; ` for human-readable columns.
pub fn join_descriptions(reasons: &[ReasonCode]) -> String {
    reasons
        .iter()
        .map(ReasonCode::description)
        .collect::<Vec<_>>()
        .join("; ")
}
