//! Surgery record building and cell coercion.

use chrono::{Datelike, Days, NaiveDate};
use sap_model::{DrugEntry, SurgeryRecord};
use sap_normalization::{DrugResolver, extract_dose_mg, parse_time};

/// Procedure names shorter than this are treated as empty rows.
pub const MIN_PROCEDURE_LEN: usize = 3;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d/%m/%y", "%d-%m-%Y"];

/// Four-digit year formats also accept two digits; such dates are rejected
/// so the two-digit format can apply.
const MIN_YEAR: i32 = 1900;

/// Day zero of spreadsheet serial dates.
const SERIAL_DATE_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Raw cell text of one sheet row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSurgeryRow {
    pub date: String,
    pub procedure: String,
    pub specialty: String,
    pub incision_time: String,
    pub antibiotic_given: String,
    pub antibiotic: String,
    pub antibiotic_time: String,
    pub redose: String,
    pub redose_time: String,
    pub patient_weight: String,
}

/// Builds [`SurgeryRecord`]s from raw rows.
///
/// Detected drugs and the administered dose are derived from the raw
/// antibiotic text with the configured drug dictionary.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    resolver: DrugResolver,
}

impl RecordBuilder {
    pub fn new(drugs: &[DrugEntry]) -> Self {
        Self {
            resolver: DrugResolver::new(drugs),
        }
    }

    /// Builds a record, or `None` when the procedure is blank or too short.
    pub fn build(&self, row_index: usize, row: &RawSurgeryRow) -> Option<SurgeryRecord> {
        let procedure = row.procedure.trim();
        if procedure.chars().count() < MIN_PROCEDURE_LEN {
            return None;
        }

        let antibiotic_text = row.antibiotic.trim().to_string();
        let (detected_drugs, administered_dose_mg) = if antibiotic_text.is_empty() {
            (Vec::new(), None)
        } else {
            (
                self.resolver.resolve(&antibiotic_text),
                extract_dose_mg(&antibiotic_text),
            )
        };

        Some(SurgeryRecord {
            row_index: Some(row_index),
            date: parse_date(&row.date),
            procedure: procedure.to_string(),
            specialty: row.specialty.trim().to_string(),
            antibiotic_given: parse_yes_no(&row.antibiotic_given),
            antibiotic_text,
            detected_drugs,
            administered_dose_mg,
            incision_time: parse_time(&row.incision_time),
            administration_time: parse_time(&row.antibiotic_time),
            redose_time: parse_time(&row.redose_time),
            redose_performed: parse_yes_no(&row.redose),
            patient_weight_kg: parse_weight(&row.patient_weight),
        })
    }
}

/// SIM, S, YES and Y (any case) are true; everything else is false.
pub fn parse_yes_no(value: &str) -> bool {
    matches!(
        value.trim().to_uppercase().as_str(),
        "SIM" | "S" | "YES" | "Y"
    )
}

/// Parses a surgery date.
///
/// Accepts ISO, day-first slash and dash formats, and spreadsheet serial
/// day numbers.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    // Timestamps exported with a time part keep only the date.
    let date_part = value.split_whitespace().next().unwrap_or(value);
    DATE_FORMATS
        .iter()
        .find_map(|format| {
            NaiveDate::parse_from_str(date_part, format)
                .ok()
                .filter(|date| date.year() >= MIN_YEAR)
        })
        .or_else(|| parse_serial_date(value))
}

fn parse_serial_date(value: &str) -> Option<NaiveDate> {
    let serial: f64 = value.parse().ok()?;
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let (year, month, day) = SERIAL_DATE_EPOCH;
    NaiveDate::from_ymd_opt(year, month, day)?.checked_add_days(Days::new(serial.trunc() as u64))
}

/// Parses a weight in kilograms; a decimal comma is accepted.
pub fn parse_weight(value: &str) -> Option<f64> {
    let normalized = value.trim().replace(',', ".");
    let normalized = normalized
        .trim_end_matches(|c: char| c.is_alphabetic() || c.is_whitespace())
        .trim();
    normalized
        .parse::<f64>()
        .ok()
        .filter(|weight| weight.is_finite())
}
