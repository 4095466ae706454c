//! Criterion checks.
//!
//! Each check reads one [`CheckContext`] and returns a verdict. Checks never
//! fail: missing or unparseable inputs become INDETERMINADO verdicts.

pub mod choice;
pub mod dose;
pub mod redosing;
pub mod timing;

use sap_model::{AuditConfig, DrugRecommendation, ProtocolRule, SurgeryRecord};
use sap_normalization::DrugResolver;

/// A recommended drug with its canonical name.
#[derive(Debug, Clone)]
pub struct RecommendedDrug<'a> {
    /// Upper-cased canonical drug name.
    pub canonical: String,
    pub recommendation: &'a DrugRecommendation,
    /// False for allergy alternatives.
    pub primary: bool,
}

/// Inputs shared by the four checks for one record.
#[derive(Debug)]
pub struct CheckContext<'a> {
    pub record: &'a SurgeryRecord,
    pub rule: Option<&'a ProtocolRule>,
    pub config: &'a AuditConfig,
    /// Usable recommended drugs, primary first, then allergy alternatives.
    pub recommended: Vec<RecommendedDrug<'a>>,
}

impl<'a> CheckContext<'a> {
    pub fn new(
        record: &'a SurgeryRecord,
        rule: Option<&'a ProtocolRule>,
        config: &'a AuditConfig,
        resolver: &DrugResolver,
    ) -> Self {
        let recommended = rule
            .map(|rule| {
                let primary = rule
                    .primary_recommendation
                    .usable_drugs()
                    .map(|drug| (drug, true));
                let allergy = rule
                    .allergy_recommendation
                    .usable_drugs()
                    .map(|drug| (drug, false));
                primary
                    .chain(allergy)
                    .filter_map(|(drug, primary)| {
                        resolver
                            .canonical_name(&drug.name)
                            .map(|canonical| RecommendedDrug {
                                canonical: canonical.to_uppercase(),
                                recommendation: drug,
                                primary,
                            })
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            record,
            rule,
            config,
            recommended,
        }
    }

    /// Detected drugs, upper-cased for comparison with canonical names.
    pub fn detected(&self) -> impl Iterator<Item = String> + '_ {
        self.record
            .detected_drugs
            .iter()
            .map(|drug| drug.trim().to_uppercase())
            .filter(|drug| !drug.is_empty())
    }

    pub fn has_detected_drug(&self) -> bool {
        self.detected().next().is_some()
    }

    /// Whether a canonical drug name is among the recommendations.
    pub fn is_recommended(&self, canonical: &str) -> bool {
        self.recommended
            .iter()
            .any(|drug| drug.canonical == canonical)
    }

    /// Recommended drug used as the dose reference.
    ///
    /// Prefers a recommendation matching a detected drug, then the first
    /// primary drug, then the first allergy alternative.
    pub fn reference_drug(&self) -> Option<&RecommendedDrug<'a>> {
        self.detected()
            .find_map(|detected| {
                self.recommended
                    .iter()
                    .find(|drug| drug.canonical == detected)
            })
            .or_else(|| self.recommended.iter().find(|drug| drug.primary))
            .or_else(|| self.recommended.first())
    }
}
