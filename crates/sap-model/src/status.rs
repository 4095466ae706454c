//! Conformity status shared by every audit criterion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of a single criterion or of the whole audit.
///
/// The serialized form is the institutional vocabulary used by the
/// infection-control reports (`CONFORME`, `NAO_CONFORME`, `ALERTA`,
/// `INDETERMINADO`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConformityStatus {
    /// Practice matches the protocol.
    #[serde(rename = "CONFORME")]
    Conforme,
    /// Practice deviates from the protocol.
    #[serde(rename = "NAO_CONFORME")]
    NaoConforme,
    /// Needs manual review.
    #[serde(rename = "ALERTA")]
    Alerta,
    /// Not enough data to decide.
    #[serde(rename = "INDETERMINADO")]
    Indeterminado,
}

impl ConformityStatus {
    /// All statuses in report order.
    pub const ALL: [ConformityStatus; 4] = [
        ConformityStatus::Conforme,
        ConformityStatus::Alerta,
        ConformityStatus::NaoConforme,
        ConformityStatus::Indeterminado,
    ];

    /// Returns the institutional code for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConformityStatus::Conforme => "CONFORME",
            ConformityStatus::NaoConforme => "NAO_CONFORME",
            ConformityStatus::Alerta => "ALERTA",
            ConformityStatus::Indeterminado => "INDETERMINADO",
        }
    }

    /// Human-readable description used in summaries.
    pub fn description(&self) -> &'static str {
        match self {
            ConformityStatus::Conforme => "Procedimento em conformidade com o protocolo",
            ConformityStatus::NaoConforme => "Procedimento nao conforme - requer acao corretiva",
            ConformityStatus::Alerta => "Pequena diferenca detectada - revisar",
            ConformityStatus::Indeterminado => "Nao foi possivel determinar conformidade",
        }
    }

    /// Returns true for statuses counted as conformant in the total rate.
    pub fn is_acceptable(&self) -> bool {
        matches!(self, ConformityStatus::Conforme | ConformityStatus::Alerta)
    }
}

impl fmt::Display for ConformityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConformityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CONFORME" => Ok(ConformityStatus::Conforme),
            "NAO_CONFORME" | "NAO CONFORME" => Ok(ConformityStatus::NaoConforme),
            "ALERTA" => Ok(ConformityStatus::Alerta),
            "INDETERMINADO" => Ok(ConformityStatus::Indeterminado),
            _ => Err(format!("Unknown conformity status: {s}")),
        }
    }
}
