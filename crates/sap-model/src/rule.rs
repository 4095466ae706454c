//! Protocol rule definitions.
//!
//! Rules are produced by the protocol extraction pipeline and loaded once per
//! run. They are never mutated after the repository is built.

use serde::{Deserialize, Serialize};

/// A single recommended drug inside a recommendation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrugRecommendation {
    /// Drug name as written in the protocol (e.g., "Cefazolina").
    pub name: String,
    /// Dose specification text (e.g., "2g", "30mg/kg").
    #[serde(default)]
    pub dose: Option<String>,
    /// Route of administration (e.g., "EV").
    #[serde(default)]
    pub route: Option<String>,
    /// Timing text (e.g., "na inducao anestesica").
    #[serde(default)]
    pub timing: Option<String>,
}

impl DrugRecommendation {
    /// Creates a recommendation with a name and dose text.
    pub fn new(name: impl Into<String>, dose: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dose: Some(dose.into()),
            route: None,
            timing: None,
        }
    }

    /// Returns true when the drug name is usable for comparison.
    pub fn is_usable(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Returns the dose text when present and non-blank.
    pub fn dose_text(&self) -> Option<&str> {
        self.dose
            .as_deref()
            .map(str::trim)
            .filter(|dose| !dose.is_empty())
    }
}

/// Ordered list of drugs recommended for one scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub drugs: Vec<DrugRecommendation>,
    /// Original table text the drugs were extracted from.
    #[serde(default)]
    pub raw_text: String,
    #[serde(default)]
    pub notes: String,
}

impl Recommendation {
    /// Creates a recommendation from a drug list.
    pub fn with_drugs(drugs: Vec<DrugRecommendation>) -> Self {
        Self {
            drugs,
            ..Self::default()
        }
    }

    /// Iterates the drugs with a usable name.
    pub fn usable_drugs(&self) -> impl Iterator<Item = &DrugRecommendation> {
        self.drugs.iter().filter(|drug| drug.is_usable())
    }
}

/// One row of the institutional prophylaxis protocol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtocolRule {
    pub rule_id: String,
    /// Protocol section (specialty heading).
    #[serde(default)]
    pub section: String,
    /// Canonical procedure name.
    pub procedure: String,
    /// Normalized form of `procedure`; filled by the repository when empty.
    #[serde(default)]
    pub procedure_normalized: String,
    /// Alternative procedure names.
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub is_prophylaxis_required: bool,
    #[serde(default)]
    pub primary_recommendation: Recommendation,
    #[serde(default)]
    pub allergy_recommendation: Recommendation,
    #[serde(default)]
    pub notes: String,
}

impl ProtocolRule {
    /// Iterates primary then allergy drugs with a usable name.
    pub fn recommended_drugs(&self) -> impl Iterator<Item = &DrugRecommendation> {
        self.primary_recommendation
            .usable_drugs()
            .chain(self.allergy_recommendation.usable_drugs())
    }

    /// Returns true when at least one usable drug is recommended.
    pub fn has_recommended_drug(&self) -> bool {
        self.recommended_drugs().next().is_some()
    }

    /// Dose text of the first primary drug, used for report context.
    pub fn expected_dose_text(&self) -> Option<&str> {
        self.primary_recommendation
            .usable_drugs()
            .next()
            .and_then(DrugRecommendation::dose_text)
    }
}
