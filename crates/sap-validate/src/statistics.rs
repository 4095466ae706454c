//! Aggregate statistics over audit results.

use std::fmt;

use serde::Serialize;

use sap_model::{AuditResult, ConformityStatus};

/// Match score at or above which a match counts as perfect.
pub const PERFECT_MATCH_SCORE: f64 = 0.9;
/// Match score at or above which a match counts as good.
pub const GOOD_MATCH_SCORE: f64 = 0.7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchQuality {
    pub perfect: usize,
    pub good: usize,
    pub weak: usize,
    pub none: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CriteriaCounts {
    pub choice_conforme: usize,
    pub dose_conforme: usize,
    pub dose_alerta: usize,
    pub timing_conforme: usize,
    pub redosing_conforme: usize,
}

/// Counts and rates for one audit run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditStatistics {
    pub total: usize,
    pub conforme: usize,
    pub alerta: usize,
    pub nao_conforme: usize,
    pub indeterminado: usize,
    pub criteria: CriteriaCounts,
    pub match_quality: MatchQuality,
    /// CONFORME plus ALERTA over all records, in percent.
    pub conformity_rate_pct: f64,
    /// CONFORME only over all records, in percent.
    pub strict_rate_pct: f64,
}

impl AuditStatistics {
    pub fn from_results(results: &[AuditResult]) -> Self {
        let mut stats = Self {
            total: results.len(),
            ..Self::default()
        };

        for result in results {
            match result.final_verdict.status {
                ConformityStatus::Conforme => stats.conforme += 1,
                ConformityStatus::Alerta => stats.alerta += 1,
                ConformityStatus::NaoConforme => stats.nao_conforme += 1,
                ConformityStatus::Indeterminado => stats.indeterminado += 1,
            }

            let criteria = &mut stats.criteria;
            criteria.choice_conforme += usize::from(result.choice.is(ConformityStatus::Conforme));
            criteria.dose_conforme += usize::from(result.dose.is(ConformityStatus::Conforme));
            criteria.dose_alerta += usize::from(result.dose.is(ConformityStatus::Alerta));
            criteria.timing_conforme += usize::from(result.timing.is(ConformityStatus::Conforme));
            criteria.redosing_conforme +=
                usize::from(result.redosing.is(ConformityStatus::Conforme));

            let quality = &mut stats.match_quality;
            match result.match_score {
                score if score >= PERFECT_MATCH_SCORE => quality.perfect += 1,
                score if score >= GOOD_MATCH_SCORE => quality.good += 1,
                score if score > 0.0 => quality.weak += 1,
                _ => quality.none += 1,
            }
        }

        stats.conformity_rate_pct = percentage(stats.conforme + stats.alerta, stats.total);
        stats.strict_rate_pct = percentage(stats.conforme, stats.total);
        stats
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

impl fmt::Display for AuditStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Records: {}", self.total)?;
        writeln!(f, "  CONFORME: {}", self.conforme)?;
        writeln!(f, "  ALERTA: {}", self.alerta)?;
        writeln!(f, "  NAO_CONFORME: {}", self.nao_conforme)?;
        writeln!(f, "  INDETERMINADO: {}", self.indeterminado)?;
        writeln!(f, "Conformity rate: {:.1}%", self.conformity_rate_pct)?;
        writeln!(f, "Strict rate: {:.1}%", self.strict_rate_pct)?;
        let quality = &self.match_quality;
        write!(
            f,
            "Matches: {} perfect, {} good, {} weak, {} none",
            quality.perfect, quality.good, quality.weak, quality.none
        )
    }
}
