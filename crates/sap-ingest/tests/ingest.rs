use std::io::Write;
use std::path::Path;

use sap_ingest::{IngestError, RecordBuilder, load_rules, load_translations, read_surgery_csv};
use sap_model::AuditConfig;
use tempfile::NamedTempFile;

fn write_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

fn builder() -> RecordBuilder {
    RecordBuilder::new(&AuditConfig::default().drugs)
}

#[test]
fn reads_institutional_sheet() {
    let file = write_file(
        "Dt Cirurgia;Cirurgia;Especialidade;Hr Incisão;Administração de Antibiotico;Antibiótico;Hr Antibiótico;Repique;Hora Repique;Peso (kg)\n\
         15/03/2024;Colecistectomia;Cirurgia Geral;08:00;SIM;KEFAZOL 2G;07:30;NAO;;72,5\n\
         16/03/2024;;Ortopedia;09:00;SIM;;;NAO;;\n\
         16/03/2024;Artroplastia de quadril;Ortopedia;0930;S;CEFAZOLINA 2G + VANCOMICINA 1G;0900;SIM;13:00;130\n",
    );

    let table = read_surgery_csv(file.path(), &builder()).unwrap();
    assert_eq!(table.records.len(), 2);
    assert_eq!(table.skipped_rows, 1);

    let first = &table.records[0];
    assert_eq!(first.row_index, Some(0));
    assert_eq!(first.specialty, "Cirurgia Geral");
    assert_eq!(first.patient_weight_kg, Some(72.5));
    assert_eq!(first.detected_drugs, vec!["CEFAZOLINA"]);
    assert_eq!(first.administered_dose_mg, Some(2000.0));

    let second = &table.records[1];
    assert_eq!(second.row_index, Some(2));
    assert!(second.redose_performed);
    assert_eq!(second.detected_drugs, vec!["CEFAZOLINA", "VANCOMICINA"]);
    assert_eq!(second.administered_dose_mg, Some(2000.0));
    assert_eq!(
        second.redose_time.map(|t| t.to_string()).as_deref(),
        Some("13:00:00")
    );
}

#[test]
fn comma_delimited_sheet_with_only_required_column() {
    let file = write_file("\u{feff}CIRURGIA,Observacao\nHerniorrafia inguinal,ok\n");
    let table = read_surgery_csv(file.path(), &builder()).unwrap();
    assert_eq!(table.records.len(), 1);
    let record = &table.records[0];
    assert_eq!(record.procedure, "Herniorrafia inguinal");
    assert!(!record.antibiotic_given);
    assert!(record.detected_drugs.is_empty());
    assert_eq!(record.administered_dose_mg, None);
}

#[test]
fn invalid_utf8_cell_keeps_the_sheet() {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(
        b"Cirurgia;Antibi\xc3\xb3tico\n\
          Colecistectomia;KEFAZOL 2G\n\
          Herniorrafia inguinal;KEF\xffZOL 2G\n\
          Mastectomia;CEFAZOLINA 2G\n",
    )
    .expect("write temp file");

    let table = read_surgery_csv(file.path(), &builder()).unwrap();
    assert_eq!(table.records.len(), 3);
    assert_eq!(table.skipped_rows, 0);

    let damaged = &table.records[1];
    assert_eq!(damaged.row_index, Some(1));
    assert_eq!(damaged.procedure, "Herniorrafia inguinal");
    assert!(damaged.antibiotic_text.contains('\u{fffd}'));
    assert_eq!(damaged.administered_dose_mg, Some(2000.0));
    assert_eq!(table.records[2].detected_drugs, vec!["CEFAZOLINA"]);
}

#[test]
fn missing_procedure_column_is_an_error() {
    let file = write_file("Dt Cirurgia;Especialidade\n15/03/2024;Ortopedia\n");
    let err = read_surgery_csv(file.path(), &builder()).unwrap_err();
    match err {
        IngestError::MissingColumn { column, .. } => assert_eq!(column, "Cirurgia"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_file_is_reported() {
    let err = read_surgery_csv(Path::new("/nonexistent/cirurgias.csv"), &builder()).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn loads_rules_with_digest() {
    let file = write_file(
        r#"[
            {
                "rule_id": "R1",
                "section": "Cirurgia Geral",
                "procedure": "Colecistectomia",
                "is_prophylaxis_required": true,
                "primary_recommendation": {
                    "drugs": [{ "name": "Cefazolina", "dose": "2g", "route": "EV" }]
                }
            },
            { "rule_id": "R2", "procedure": "Herniorrafia inguinal" }
        ]"#,
    );

    let source = load_rules(file.path()).unwrap();
    assert_eq!(source.rules.len(), 2);
    assert_eq!(source.rules[0].primary_recommendation.drugs[0].name, "Cefazolina");
    assert!(!source.rules[1].is_prophylaxis_required);
    assert_eq!(source.sha256.len(), 64);

    let again = load_rules(file.path()).unwrap();
    assert_eq!(again.sha256, source.sha256);
}

#[test]
fn malformed_rules_are_a_json_error() {
    let file = write_file(r#"{"rule_id": "R1"}"#);
    let err = load_rules(file.path()).unwrap_err();
    assert!(matches!(err, IngestError::Json { .. }));
}

#[test]
fn loads_translations() {
    let file = write_file(
        r#"{
            "COLECISTECTOMIA VIDEO": "Colecistectomia videolaparoscopica",
            "HERNIA": "Herniorrafia inguinal / Herniorrafia umbilical"
        }"#,
    );
    let translations = load_translations(file.path()).unwrap();
    assert_eq!(translations.len(), 2);
    assert_eq!(
        translations.get("HERNIA").map(String::as_str),
        Some("Herniorrafia inguinal / Herniorrafia umbilical")
    );
}
