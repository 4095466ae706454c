use chrono::NaiveTime;
use proptest::prelude::*;

use sap_map::{RuleRepository, TranslationDictionary};
use sap_model::{
    AuditConfig, AuditResult, ConformityStatus, DoseTolerance, DrugRecommendation, MatchMethod,
    ProtocolRule, ReasonCode, Recommendation, SurgeryRecord,
};
use sap_validate::{AuditStatistics, Auditor};

fn rule(id: &str, procedure: &str, required: bool, drugs: &[(&str, &str)]) -> ProtocolRule {
    ProtocolRule {
        rule_id: id.to_string(),
        section: "Cirurgia Geral".to_string(),
        procedure: procedure.to_string(),
        is_prophylaxis_required: required,
        primary_recommendation: Recommendation::with_drugs(
            drugs
                .iter()
                .map(|(name, dose)| DrugRecommendation::new(*name, *dose))
                .collect(),
        ),
        allergy_recommendation: Recommendation::with_drugs(vec![DrugRecommendation::new(
            "Clindamicina",
            "900mg",
        )]),
        ..ProtocolRule::default()
    }
}

fn repository() -> RuleRepository {
    RuleRepository::new(vec![
        rule("R1", "Colecistectomia", true, &[("Cefazolina", "2g")]),
        rule(
            "R2",
            "Artroplastia de quadril",
            true,
            &[("Cefazolina", "30mg/kg")],
        ),
        ProtocolRule {
            allergy_recommendation: Recommendation::default(),
            ..rule("R3", "Hernioplastia inguinal", false, &[])
        },
    ])
    .expect("build repository")
}

fn auditor(repo: &RuleRepository) -> Auditor<'_> {
    Auditor::new(repo, TranslationDictionary::default(), AuditConfig::default())
        .expect("default config is valid")
}

fn time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M").ok()
}

/// Cefazolina given 30 minutes before incision.
fn given(procedure: &str, dose_mg: f64) -> SurgeryRecord {
    SurgeryRecord {
        antibiotic_given: true,
        antibiotic_text: "KEFAZOL".to_string(),
        detected_drugs: vec!["CEFAZOLINA".to_string()],
        administered_dose_mg: Some(dose_mg),
        administration_time: time("07:30"),
        incision_time: time("08:00"),
        ..SurgeryRecord::new(procedure)
    }
}

fn audit(record: &SurgeryRecord) -> AuditResult {
    let repo = repository();
    auditor(&repo).audit_record(record).expect("record audited")
}

#[test]
fn conformant_record() {
    let result = audit(&given("Colecistectomia", 2000.0));

    assert_eq!(result.matched_rule_id.as_deref(), Some("R1"));
    assert_eq!(result.match_method, MatchMethod::ExactMatch);
    assert_eq!(result.protocol.recommended_drugs, vec!["Cefazolina"]);
    assert_eq!(result.protocol.expected_dose.as_deref(), Some("2g"));
    assert_eq!(result.choice.reason, ReasonCode::AtbRecomendado);
    assert_eq!(result.dose.reason, ReasonCode::DoseCorreta);
    assert_eq!(result.timing.reason, ReasonCode::TimingCorreto);
    assert_eq!(result.redosing.reason, ReasonCode::RepiqueNaoAplicavel);
    assert_eq!(result.final_verdict.status, ConformityStatus::Conforme);
    assert_eq!(result.final_verdict.reason_text(), "todos_criterios_conformes");
    assert_eq!(result.deltas.timing_diff_minutes, Some(30));
    assert_eq!(result.deltas.dose_diff_mg, Some(0.0));
    assert!(result.observations.is_empty());
}

#[test]
fn unmatched_procedure_with_antibiotic_is_alert() {
    let result = audit(&given("Craniotomia descompressiva", 2000.0));

    assert!(result.matched_rule_id.is_none());
    assert_eq!(result.match_score, 0.0);
    assert_eq!(result.match_method, MatchMethod::NoMatch);
    assert_eq!(result.choice.status, ConformityStatus::Indeterminado);
    assert_eq!(result.final_verdict.status, ConformityStatus::Alerta);
    assert_eq!(result.final_verdict.reasons, vec![ReasonCode::SemMatchProtocolo]);
    assert_eq!(
        result.observations,
        vec![ReasonCode::SemMatchProtocolo.description()]
    );
}

#[test]
fn unmatched_procedure_without_antibiotic_is_conformant() {
    let result = audit(&SurgeryRecord::new("Craniotomia descompressiva"));

    assert_eq!(result.choice.status, ConformityStatus::Conforme);
    assert_eq!(result.choice.reason, ReasonCode::SemMatchSemAtb);
    assert_eq!(result.dose.status, ConformityStatus::Indeterminado);
    assert_eq!(result.dose.reason, ReasonCode::DoseNaoInformada);
    assert_eq!(result.timing.reason, ReasonCode::CriterioNaoAplicavel);
    assert_eq!(result.final_verdict.status, ConformityStatus::Conforme);
}

#[test]
fn required_prophylaxis_not_given() {
    let result = audit(&SurgeryRecord::new("Colecistectomia"));

    assert_eq!(result.final_verdict.status, ConformityStatus::NaoConforme);
    assert_eq!(result.final_verdict.reasons, vec![ReasonCode::AtbNaoAdministrado]);
}

#[test]
fn dose_not_administered_is_not_reported() {
    let result = audit(&SurgeryRecord::new("Colecistectomia"));

    assert_eq!(result.dose.status, ConformityStatus::Indeterminado);
    assert_eq!(result.dose.reason, ReasonCode::DoseNaoInformada);
    assert!(result.deltas.dose_diff_pct.is_none());
}

#[test]
fn given_without_reported_dose_is_indeterminate() {
    let record = SurgeryRecord {
        administered_dose_mg: None,
        ..given("Colecistectomia", 0.0)
    };
    let result = audit(&record);

    assert_eq!(result.dose.status, ConformityStatus::Indeterminado);
    assert_eq!(result.dose.reason, ReasonCode::DoseNaoInformada);
    assert_eq!(result.final_verdict.status, ConformityStatus::Conforme);
}

#[test]
fn small_dose_difference_is_alert() {
    let result = audit(&given("Colecistectomia", 2250.0));

    assert_eq!(result.dose.status, ConformityStatus::Alerta);
    assert_eq!(result.dose.reason, ReasonCode::DosePequenaDiferenca);
    assert_eq!(result.deltas.dose_diff_pct, Some(12.5));
    assert_eq!(result.final_verdict.status, ConformityStatus::Alerta);
    assert_eq!(
        result.final_verdict.reasons,
        vec![ReasonCode::DosePequenaDiferenca]
    );
}

#[test]
fn dose_far_below_reference_is_too_low() {
    let repo = repository();
    let config = AuditConfig {
        dose_tolerance: DoseTolerance {
            hard_pct: 50.0,
            ..DoseTolerance::default()
        },
        ..AuditConfig::default()
    };
    let auditor = Auditor::new(&repo, TranslationDictionary::default(), config).unwrap();

    let result = auditor.audit_record(&given("Colecistectomia", 800.0)).unwrap();
    assert_eq!(result.dose.status, ConformityStatus::NaoConforme);
    assert_eq!(result.dose.reason, ReasonCode::DoseMuitoBaixa);
    let pct = result.deltas.dose_diff_pct.unwrap();
    assert!((pct + 60.0).abs() < 1e-9);
    assert_eq!(result.final_verdict.status, ConformityStatus::NaoConforme);
    assert_eq!(result.final_verdict.reason_text(), "dose_muito_baixa");
}

#[test]
fn administration_long_before_incision_is_outside_window() {
    let record = SurgeryRecord {
        administration_time: time("06:30"),
        incision_time: time("08:00"),
        ..given("Colecistectomia", 2000.0)
    };
    let result = audit(&record);

    assert_eq!(result.timing.status, ConformityStatus::NaoConforme);
    assert_eq!(result.timing.reason, ReasonCode::TimingForaJanela);
    assert_eq!(result.deltas.timing_diff_minutes, Some(90));
    assert_eq!(result.final_verdict.status, ConformityStatus::NaoConforme);
    assert_eq!(result.final_verdict.reasons, vec![ReasonCode::TimingForaJanela]);
}

#[test]
fn unrecommended_drug_when_prophylaxis_required() {
    let record = SurgeryRecord {
        antibiotic_text: "VANCOMICINA 1G".to_string(),
        detected_drugs: vec!["VANCOMICINA".to_string()],
        ..given("Colecistectomia", 2000.0)
    };
    let result = audit(&record);

    assert_eq!(result.choice.status, ConformityStatus::NaoConforme);
    assert_eq!(result.choice.reason, ReasonCode::AtbNaoRecomendado);
    assert_eq!(result.final_verdict.status, ConformityStatus::NaoConforme);
    assert_eq!(result.final_verdict.reasons, vec![ReasonCode::AtbNaoRecomendado]);
}

#[test]
fn unrecommended_drug_when_prophylaxis_optional() {
    let repo = RuleRepository::new(vec![rule(
        "R9",
        "Mastectomia simples",
        false,
        &[("Cefazolina", "2g")],
    )])
    .unwrap();
    let record = SurgeryRecord {
        antibiotic_text: "VANCOMICINA 1G".to_string(),
        detected_drugs: vec!["VANCOMICINA".to_string()],
        ..given("Mastectomia simples", 2000.0)
    };
    let result = auditor(&repo).audit_record(&record).unwrap();

    assert_eq!(result.choice.status, ConformityStatus::Alerta);
    assert_eq!(result.choice.reason, ReasonCode::AtbNaoRecomendado);
    assert_eq!(result.final_verdict.status, ConformityStatus::Alerta);
    assert_eq!(result.final_verdict.reasons, vec![ReasonCode::AtbNaoRecomendado]);
}

#[test]
fn unidentified_drug_on_matched_rule_needs_review() {
    let record = SurgeryRecord {
        antibiotic_text: "ANTIBIOTICO".to_string(),
        detected_drugs: Vec::new(),
        ..given("Colecistectomia", 2000.0)
    };
    let result = audit(&record);

    assert_eq!(result.matched_rule_id.as_deref(), Some("R1"));
    assert_eq!(result.choice.status, ConformityStatus::Indeterminado);
    assert_eq!(result.choice.reason, ReasonCode::AtbNaoIdentificado);
    assert_eq!(result.final_verdict.status, ConformityStatus::Alerta);
    assert_eq!(result.final_verdict.reasons, vec![ReasonCode::DadosInsuficientes]);
}

#[test]
fn weight_based_dose_bands() {
    let repo = repository();
    let auditor = auditor(&repo);
    let record = |dose| SurgeryRecord {
        patient_weight_kg: Some(50.0),
        ..given("Artroplastia de quadril", dose)
    };

    let result = auditor.audit_record(&record(2100.0)).unwrap();
    assert_eq!(result.matched_rule_id.as_deref(), Some("R2"));
    assert_eq!(result.dose.status, ConformityStatus::Alerta);
    assert_eq!(result.final_verdict.status, ConformityStatus::Alerta);
    assert_eq!(result.final_verdict.reasons, vec![ReasonCode::DoseForaReferencia]);
    let pct = result.deltas.dose_diff_pct.unwrap();
    assert!((pct - 40.0).abs() < 1e-9);

    let result = auditor.audit_record(&record(3100.0)).unwrap();
    assert_eq!(result.final_verdict.status, ConformityStatus::NaoConforme);
    assert_eq!(result.final_verdict.reasons, vec![ReasonCode::DoseMuitoAlta]);
}

#[test]
fn weight_based_dose_without_weight_is_indeterminate() {
    let result = audit(&given("Artroplastia de quadril", 2000.0));

    assert_eq!(result.dose.status, ConformityStatus::Indeterminado);
    assert_eq!(result.dose.reason, ReasonCode::DoseSemReferenciaPeso);
    assert!(result.deltas.dose_diff_mg.is_none());
    assert!(result.deltas.dose_diff_pct.is_none());
    assert_eq!(result.final_verdict.status, ConformityStatus::Conforme);
}

#[test]
fn cefazolina_cap_applies_to_heavy_patients() {
    let repo = repository();
    let auditor = auditor(&repo);

    let standard = SurgeryRecord {
        patient_weight_kg: Some(100.0),
        ..given("Artroplastia de quadril", 2000.0)
    };
    let result = auditor.audit_record(&standard).unwrap();
    assert_eq!(result.dose.reason, ReasonCode::DoseCorreta);
    assert_eq!(result.observations, vec!["Dose esperada limitada a 2000 mg"]);

    let heavy = SurgeryRecord {
        patient_weight_kg: Some(130.0),
        ..given("Artroplastia de quadril", 3000.0)
    };
    let result = auditor.audit_record(&heavy).unwrap();
    assert_eq!(result.dose.reason, ReasonCode::DoseCorreta);
    assert_eq!(result.deltas.dose_diff_mg, Some(0.0));
}

#[test]
fn redose_within_and_outside_interval() {
    let repo = repository();
    let auditor = auditor(&repo);
    let record = |redose: &str| SurgeryRecord {
        administration_time: time("08:00"),
        incision_time: time("08:20"),
        redose_performed: true,
        redose_time: time(redose),
        ..given("Colecistectomia", 2000.0)
    };

    let result = auditor.audit_record(&record("12:10")).unwrap();
    assert_eq!(result.redosing.reason, ReasonCode::RepiqueNoIntervalo);
    assert_eq!(result.deltas.redose_diff_minutes, Some(250));
    assert_eq!(result.final_verdict.status, ConformityStatus::Conforme);

    let result = auditor.audit_record(&record("13:00")).unwrap();
    assert_eq!(result.redosing.status, ConformityStatus::NaoConforme);
    assert_eq!(result.final_verdict.status, ConformityStatus::NaoConforme);
    assert_eq!(
        result.final_verdict.reasons,
        vec![ReasonCode::RepiqueForaIntervalo]
    );
}

#[test]
fn redose_without_times_is_indeterminate() {
    let record = SurgeryRecord {
        redose_performed: true,
        ..given("Colecistectomia", 2000.0)
    };
    let result = audit(&record);
    assert_eq!(result.redosing.reason, ReasonCode::RepiqueHorariosNaoInformados);
    assert!(result.deltas.redose_diff_minutes.is_none());
    assert_eq!(result.final_verdict.status, ConformityStatus::Conforme);
}

#[test]
fn non_conformity_beats_alert() {
    let record = SurgeryRecord {
        administration_time: time("08:10"),
        incision_time: time("08:00"),
        ..given("Colecistectomia", 1000.0)
    };
    let result = audit(&record);

    assert_eq!(result.dose.status, ConformityStatus::Alerta);
    assert_eq!(result.timing.reason, ReasonCode::TimingAposIncisao);
    assert_eq!(result.deltas.timing_diff_minutes, Some(-10));
    assert_eq!(result.final_verdict.status, ConformityStatus::NaoConforme);
    assert_eq!(result.final_verdict.reason_text(), "timing_apos_incisao");
}

#[test]
fn timing_across_midnight() {
    let record = SurgeryRecord {
        administration_time: time("23:40"),
        incision_time: time("00:10"),
        ..given("Colecistectomia", 2000.0)
    };
    let result = audit(&record);
    assert_eq!(result.deltas.timing_diff_minutes, Some(30));
    assert_eq!(result.timing.reason, ReasonCode::TimingCorreto);
}

#[test]
fn allergy_alternative_is_recommended() {
    let record = SurgeryRecord {
        detected_drugs: vec!["CLINDAMICINA".to_string()],
        administered_dose_mg: Some(900.0),
        ..given("Colecistectomia", 0.0)
    };
    let result = audit(&record);
    assert_eq!(result.choice.reason, ReasonCode::AtbRecomendado);
    assert_eq!(result.dose.reason, ReasonCode::DoseCorreta);
}

#[test]
fn rule_without_drugs_and_not_required_is_alert() {
    let result = audit(&given("Hernioplastia inguinal", 2000.0));
    assert_eq!(
        result.choice.reason,
        ReasonCode::ProfilaxiaPotencialSemIndicacao
    );
    assert_eq!(result.dose.reason, ReasonCode::DoseSemReferencia);
    assert_eq!(result.final_verdict.status, ConformityStatus::Alerta);
    assert_eq!(
        result.final_verdict.reasons,
        vec![ReasonCode::ProfilaxiaPotencialSemIndicacao]
    );
}

#[test]
fn batch_keeps_order_and_survives_bad_records() {
    let repo = repository();
    let auditor = auditor(&repo);
    let records = vec![
        SurgeryRecord {
            row_index: Some(0),
            ..given("Colecistectomia", 2000.0)
        },
        SurgeryRecord {
            row_index: Some(1),
            ..given("Colecistectomia", f64::NAN)
        },
        SurgeryRecord {
            row_index: Some(2),
            ..SurgeryRecord::new("Colecistectomia")
        },
    ];

    let results = auditor.audit_batch(&records);
    assert_eq!(results.len(), 3);
    let rows: Vec<_> = results.iter().map(|r| r.record.row_index).collect();
    assert_eq!(rows, vec![Some(0), Some(1), Some(2)]);

    let failed = &results[1];
    assert_eq!(failed.final_verdict.status, ConformityStatus::Indeterminado);
    assert_eq!(failed.final_verdict.reasons, vec![ReasonCode::ErroAuditoria]);
    assert_eq!(failed.observations.len(), 1);
    assert!(failed.observations[0].contains("administered_dose_mg"));

    let stats = AuditStatistics::from_results(&results);
    assert_eq!(stats.conforme, 1);
    assert_eq!(stats.nao_conforme, 1);
    assert_eq!(stats.indeterminado, 1);
}

#[test]
fn invalid_config_is_rejected() {
    let repo = repository();
    let config = AuditConfig {
        match_threshold: 1.5,
        ..AuditConfig::default()
    };
    assert!(Auditor::new(&repo, TranslationDictionary::default(), config).is_err());
}

#[test]
fn result_serializes_with_status_codes() {
    let result = audit(&given("Colecistectomia", 2000.0));
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["final_verdict"]["status"], "CONFORME");
    assert_eq!(json["choice"]["reason"], "atb_recomendado");
    assert_eq!(json["record"]["administration_time"], "07:30");
}

proptest! {
    #[test]
    fn unmatched_records_are_never_non_conformant(
        given_flag in any::<bool>(),
        dose in proptest::option::of(0.0f64..5000.0),
        admin in 0u32..1440,
        incision in 0u32..1440,
    ) {
        let repo = repository();
        let auditor = auditor(&repo);
        let record = SurgeryRecord {
            antibiotic_given: given_flag,
            detected_drugs: vec!["CEFAZOLINA".to_string()],
            administered_dose_mg: dose,
            administration_time: NaiveTime::from_hms_opt(admin / 60, admin % 60, 0),
            incision_time: NaiveTime::from_hms_opt(incision / 60, incision % 60, 0),
            ..SurgeryRecord::new("Transplante renal")
        };
        let result = auditor.audit_record(&record).unwrap();
        prop_assert!(result.matched_rule_id.is_none());
        prop_assert_ne!(result.final_verdict.status, ConformityStatus::NaoConforme);
        prop_assert_ne!(result.final_verdict.status, ConformityStatus::Indeterminado);
    }
}
