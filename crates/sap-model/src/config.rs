//! Typed audit configuration.
//!
//! Every field has a default matching the institutional protocol. A TOML file
//! may override any subset of keys; maps and the drug list are replaced as a
//! whole when present.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Percent bands used by the dose check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoseTolerance {
    /// At or below this difference the dose is conformant.
    pub alert_pct: f64,
    /// At or below this difference the dose is a small-difference alert.
    pub standard_pct: f64,
    /// At or below this difference the dose is an out-of-reference alert.
    pub hard_pct: f64,
}

impl Default for DoseTolerance {
    fn default() -> Self {
        Self {
            alert_pct: 10.0,
            standard_pct: 15.0,
            hard_pct: 100.0,
        }
    }
}

/// Maximum dose for a weight-based drug.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoseCap {
    pub standard_mg: f64,
    /// Cap applied when the patient weighs at least `heavy_weight_kg`.
    pub heavy_mg: f64,
    pub heavy_weight_kg: f64,
}

impl DoseCap {
    /// Cap that applies to a patient of the given weight.
    pub fn limit_for(&self, weight_kg: f64) -> f64 {
        if weight_kg >= self.heavy_weight_kg {
            self.heavy_mg
        } else {
            self.standard_mg
        }
    }
}

/// Canonical drug name and the spellings that identify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugEntry {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl DrugEntry {
    pub fn new(name: &str, aliases: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|alias| (*alias).to_string()).collect(),
        }
    }
}

/// Thresholds, tolerances and reference tables for one audit run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Minimum fuzzy score for a procedure match.
    pub match_threshold: f64,
    /// Minimum similarity between a translation and the original name.
    pub translation_plausibility_threshold: f64,
    /// Maximum minutes between administration and incision.
    pub timing_window_minutes: i64,
    /// Allowed deviation from the redosing interval, in minutes.
    pub redosing_tolerance_minutes: i64,
    pub dose_tolerance: DoseTolerance,
    /// Redosing interval in minutes per canonical drug; 0 means no redosing.
    pub redosing_intervals: BTreeMap<String, u32>,
    pub dose_caps: BTreeMap<String, DoseCap>,
    /// Drug dictionary in scan order.
    pub drugs: Vec<DrugEntry>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.70,
            translation_plausibility_threshold: 0.45,
            timing_window_minutes: 60,
            redosing_tolerance_minutes: 30,
            dose_tolerance: DoseTolerance::default(),
            redosing_intervals: default_redosing_intervals(),
            dose_caps: default_dose_caps(),
            drugs: default_drug_dictionary(),
        }
    }
}

fn default_redosing_intervals() -> BTreeMap<String, u32> {
    [
        ("CEFAZOLINA", 240),
        ("CEFUROXIMA", 240),
        ("CEFOXITINA", 120),
        ("CLINDAMICINA", 360),
        ("VANCOMICINA", 0),
        ("GENTAMICINA", 0),
        ("CIPROFLOXACINO", 0),
    ]
    .into_iter()
    .map(|(drug, minutes)| (drug.to_string(), minutes))
    .collect()
}

fn default_dose_caps() -> BTreeMap<String, DoseCap> {
    BTreeMap::from([(
        "CEFAZOLINA".to_string(),
        DoseCap {
            standard_mg: 2000.0,
            heavy_mg: 3000.0,
            heavy_weight_kg: 120.0,
        },
    )])
}

fn default_drug_dictionary() -> Vec<DrugEntry> {
    vec![
        DrugEntry::new("CEFAZOLINA", &["KEFAZOL", "CEFAZOLINA", "ANCEF"]),
        DrugEntry::new("CEFUROXIMA", &["ZINACEF", "CEFUROXIMA"]),
        DrugEntry::new("CEFTRIAXONE", &["ROCEFIN", "CEFTRIAXONA", "CEFTRIAXONE"]),
        DrugEntry::new("CEFOXITINA", &["MEFOXIN", "CEFOXITINA"]),
        DrugEntry::new("GENTAMICINA", &["GENTAMICINA", "GARAMICINA"]),
        DrugEntry::new("AMICACINA", &["AMICACINA", "NOVAMIN"]),
        DrugEntry::new("VANCOMICINA", &["VANCOMICINA", "VANCOCINA"]),
        DrugEntry::new("CIPROFLOXACINO", &["CIPROFLOXACINO", "CIPRO"]),
        DrugEntry::new(
            "AMOXICILINA_CLAVULANATO",
            &["CLAVULIN", "AMOXICILINA+CLAVULANATO"],
        ),
        DrugEntry::new("AMPICILINA_SULBACTAM", &["UNASYN", "AMPICILINA+SULBACTAM"]),
        DrugEntry::new("METRONIDAZOL", &["METRONIDAZOL", "FLAGYL"]),
        DrugEntry::new("CLINDAMICINA", &["CLINDAMICINA", "DALACIN"]),
    ]
}

impl AuditConfig {
    /// Parses a TOML document; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML config file.
    pub fn from_toml_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Rejects configurations that would make the audit meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit_interval("match_threshold", self.match_threshold)?;
        check_unit_interval(
            "translation_plausibility_threshold",
            self.translation_plausibility_threshold,
        )?;

        let tolerance = &self.dose_tolerance;
        let bands = [
            ("alert_pct", tolerance.alert_pct),
            ("standard_pct", tolerance.standard_pct),
            ("hard_pct", tolerance.hard_pct),
        ];
        for (name, value) in bands {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::DoseTolerance {
                    message: format!("{name} must be finite and non-negative, got {value}"),
                });
            }
        }
        if tolerance.alert_pct > tolerance.standard_pct
            || tolerance.standard_pct > tolerance.hard_pct
        {
            return Err(ConfigError::DoseTolerance {
                message: format!(
                    "bands must satisfy alert <= standard <= hard, got {} / {} / {}",
                    tolerance.alert_pct, tolerance.standard_pct, tolerance.hard_pct
                ),
            });
        }

        if self.timing_window_minutes <= 0 {
            return Err(ConfigError::Minutes {
                field: "timing_window_minutes",
                expected: "positive",
                value: self.timing_window_minutes,
            });
        }
        if self.redosing_tolerance_minutes < 0 {
            return Err(ConfigError::Minutes {
                field: "redosing_tolerance_minutes",
                expected: "non-negative",
                value: self.redosing_tolerance_minutes,
            });
        }

        for (drug, cap) in &self.dose_caps {
            let values = [cap.standard_mg, cap.heavy_mg, cap.heavy_weight_kg];
            if values.iter().any(|value| !value.is_finite() || *value <= 0.0) {
                return Err(ConfigError::DoseCap {
                    drug: drug.clone(),
                    message: "all values must be finite and positive".to_string(),
                });
            }
        }

        for entry in &self.drugs {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::Drug {
                    drug: entry.name.clone(),
                    message: "canonical name is blank".to_string(),
                });
            }
            if entry.aliases.iter().all(|alias| alias.trim().is_empty()) {
                return Err(ConfigError::Drug {
                    drug: entry.name.clone(),
                    message: "at least one alias is required".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Redosing interval for a canonical drug; `None` when it is not redosed.
    pub fn redosing_interval(&self, drug: &str) -> Option<u32> {
        self.redosing_intervals
            .get(&drug.to_uppercase())
            .copied()
            .filter(|minutes| *minutes > 0)
    }

    pub fn dose_cap(&self, drug: &str) -> Option<&DoseCap> {
        self.dose_caps.get(&drug.to_uppercase())
    }
}

fn check_unit_interval(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Threshold { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AuditConfig::default();
        config.validate().unwrap();
        assert_eq!(config.redosing_interval("cefazolina"), Some(240));
        assert_eq!(config.redosing_interval("VANCOMICINA"), None);
        assert_eq!(config.redosing_interval("UNKNOWN"), None);
        assert_eq!(config.drugs.first().map(|d| d.name.as_str()), Some("CEFAZOLINA"));
    }

    #[test]
    fn cefazolin_cap_depends_on_weight() {
        let config = AuditConfig::default();
        let cap = config.dose_cap("CEFAZOLINA").unwrap();
        assert_eq!(cap.limit_for(80.0), 2000.0);
        assert_eq!(cap.limit_for(120.0), 3000.0);
    }
}
