//! Dose extraction from free text.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Gram doses ("2G", "1.5 GR", "2 GRAMAS"). The leading group stands in for a
/// "not preceded by a letter or digit" boundary.
static GRAM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^A-Z0-9])(\d+(?:\.\d+)?)\s*(?:G|GR|GRAMA|GRAMAS)\b")
        .expect("Invalid gram dose regex")
});

static MILLIGRAM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^A-Z0-9])(\d+(?:\.\d+)?)\s*MG\b").expect("Invalid milligram dose regex")
});

static WEIGHT_BASED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(MG|G)\s*/\s*KG").expect("Invalid weight-based dose regex")
});

/// Mass unit of a weight-based dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoseUnit {
    Milligram,
    Gram,
}

impl DoseUnit {
    pub fn to_mg_factor(self) -> f64 {
        match self {
            DoseUnit::Milligram => 1.0,
            DoseUnit::Gram => 1000.0,
        }
    }
}

impl fmt::Display for DoseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoseUnit::Milligram => f.write_str("mg"),
            DoseUnit::Gram => f.write_str("g"),
        }
    }
}

/// A per-kilogram dose such as "30 mg/kg".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightBasedDose {
    pub coefficient: f64,
    pub unit: DoseUnit,
}

impl WeightBasedDose {
    /// Milligrams per kilogram.
    pub fn mg_per_kg(&self) -> f64 {
        self.coefficient * self.unit.to_mg_factor()
    }

    /// Uncapped dose for a patient weight.
    pub fn expected_mg(&self, weight_kg: f64) -> f64 {
        self.mg_per_kg() * weight_kg
    }
}

/// Extracts a dose in milligrams from free text.
///
/// Decimal commas are accepted. When several doses appear (combination
/// regimens) the largest one is returned.
pub fn extract_dose_mg(text: &str) -> Option<f64> {
    let text = text.to_uppercase().replace(',', ".");
    let grams = GRAM_REGEX
        .captures_iter(&text)
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .map(|value| value * 1000.0);
    let milligrams = MILLIGRAM_REGEX
        .captures_iter(&text)
        .filter_map(|caps| caps[1].parse::<f64>().ok());
    grams
        .chain(milligrams)
        .filter(|value| value.is_finite())
        .reduce(f64::max)
}

/// Parses a per-kilogram dose specification.
pub fn parse_weight_based(text: &str) -> Option<WeightBasedDose> {
    let caps = WEIGHT_BASED_REGEX.captures(text)?;
    let coefficient = caps[1]
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())?;
    let unit = if caps[2].eq_ignore_ascii_case("G") {
        DoseUnit::Gram
    } else {
        DoseUnit::Milligram
    };
    Some(WeightBasedDose { coefficient, unit })
}
