//! Surgery records consumed by the audit.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One performed surgery, as resolved by the ingestion layer.
///
/// Times are clock times without a date; differences between them are
/// computed with day-wrap correction by the time utilities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurgeryRecord {
    /// Zero-based row in the source sheet, when known.
    #[serde(default)]
    pub row_index: Option<usize>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Free-text procedure name.
    pub procedure: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub antibiotic_given: bool,
    /// Raw antibiotic text (e.g., "KEFAZOL 2G").
    #[serde(default)]
    pub antibiotic_text: String,
    /// Canonical drug names detected in `antibiotic_text`, first occurrence first.
    #[serde(default)]
    pub detected_drugs: Vec<String>,
    #[serde(default)]
    pub administered_dose_mg: Option<f64>,
    #[serde(default, with = "clock_time")]
    pub incision_time: Option<NaiveTime>,
    #[serde(default, with = "clock_time")]
    pub administration_time: Option<NaiveTime>,
    #[serde(default, with = "clock_time")]
    pub redose_time: Option<NaiveTime>,
    #[serde(default)]
    pub redose_performed: bool,
    #[serde(default)]
    pub patient_weight_kg: Option<f64>,
}

impl SurgeryRecord {
    /// Creates a record with only a procedure name.
    pub fn new(procedure: impl Into<String>) -> Self {
        Self {
            procedure: procedure.into(),
            ..Self::default()
        }
    }

    /// Administered dose when reported and positive.
    pub fn reported_dose_mg(&self) -> Option<f64> {
        self.administered_dose_mg.filter(|dose| *dose > 0.0)
    }

    /// Patient weight when reported and positive.
    pub fn reported_weight_kg(&self) -> Option<f64> {
        self.patient_weight_kg.filter(|weight| *weight > 0.0)
    }
}

/// Serializes optional clock times as `HH:MM`.
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveTime::parse_from_str(text, FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
