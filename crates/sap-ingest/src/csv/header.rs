//! Surgery sheet columns and header resolution.

use std::fmt;

use sap_normalization::normalize_text;

/// Columns of the institutional surgery sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurgeryColumn {
    Date,
    Procedure,
    Specialty,
    IncisionTime,
    AntibioticGiven,
    Antibiotic,
    AntibioticTime,
    Redose,
    RedoseTime,
    PatientWeight,
}

impl SurgeryColumn {
    pub const ALL: [SurgeryColumn; 10] = [
        SurgeryColumn::Date,
        SurgeryColumn::Procedure,
        SurgeryColumn::Specialty,
        SurgeryColumn::IncisionTime,
        SurgeryColumn::AntibioticGiven,
        SurgeryColumn::Antibiotic,
        SurgeryColumn::AntibioticTime,
        SurgeryColumn::Redose,
        SurgeryColumn::RedoseTime,
        SurgeryColumn::PatientWeight,
    ];

    /// Header text as exported by the hospital system.
    pub const fn header(&self) -> &'static str {
        match self {
            Self::Date => "Dt Cirurgia",
            Self::Procedure => "Cirurgia",
            Self::Specialty => "Especialidade",
            Self::IncisionTime => "Hr Incisão",
            Self::AntibioticGiven => "Administração de Antibiotico",
            Self::Antibiotic => "Antibiótico",
            Self::AntibioticTime => "Hr Antibiótico",
            Self::Redose => "Repique",
            Self::RedoseTime => "Hora Repique",
            Self::PatientWeight => "Peso (kg)",
        }
    }

    pub const fn is_required(&self) -> bool {
        matches!(self, Self::Procedure)
    }
}

impl fmt::Display for SurgeryColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Position of each known column in a header row.
///
/// Headers are compared by normalized text, so accents, case and
/// punctuation differences do not matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: [Option<usize>; SurgeryColumn::ALL.len()],
}

impl ColumnIndex {
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let normalized: Vec<String> = headers
            .into_iter()
            .map(|header| normalize_text(header.trim_start_matches('\u{feff}')))
            .collect();
        let mut index = Self::default();
        for (slot, column) in SurgeryColumn::ALL.iter().enumerate() {
            let wanted = normalize_text(column.header());
            index.positions[slot] = normalized.iter().position(|header| *header == wanted);
        }
        index
    }

    pub fn position(&self, column: SurgeryColumn) -> Option<usize> {
        SurgeryColumn::ALL
            .iter()
            .position(|candidate| *candidate == column)
            .and_then(|slot| self.positions[slot])
    }

    /// First required column absent from the header row.
    pub fn missing_required(&self) -> Option<SurgeryColumn> {
        SurgeryColumn::ALL
            .into_iter()
            .find(|column| column.is_required() && self.position(*column).is_none())
    }

    /// Known columns absent from the header row.
    pub fn missing(&self) -> Vec<SurgeryColumn> {
        SurgeryColumn::ALL
            .into_iter()
            .filter(|column| self.position(*column).is_none())
            .collect()
    }
}
