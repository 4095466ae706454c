//! Surgery sheet CSV reading.

use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use sap_model::SurgeryRecord;
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};
use crate::record::{RawSurgeryRow, RecordBuilder};

use super::header::{ColumnIndex, SurgeryColumn};

/// Records read from one surgery sheet.
#[derive(Debug, Clone, Default)]
pub struct SurgeryTable {
    pub records: Vec<SurgeryRecord>,
    /// Data rows dropped for a blank or too short procedure, or unreadable.
    pub skipped_rows: usize,
}

/// Picks `;` when the header row has more semicolons than commas.
fn detect_delimiter(content: &[u8]) -> u8 {
    let first_line = content.split(|b| *b == b'\n').next().unwrap_or_default();
    let commas = first_line.iter().filter(|b| **b == b',').count();
    let semicolons = first_line.iter().filter(|b| **b == b';').count();
    if semicolons > commas { b';' } else { b',' }
}

/// Reads a surgery sheet exported as CSV.
///
/// Headers are matched by normalized text and only `Cirurgia` is required;
/// other missing columns read as empty cells. Row indices are zero-based
/// positions among the data rows. Cells are decoded lossily and a row the
/// parser rejects is skipped with a warning.
pub fn read_surgery_csv(path: &Path, builder: &RecordBuilder) -> Result<SurgeryTable> {
    let content = std::fs::read(path).map_err(|e| IngestError::read(path, e))?;
    let content = content
        .strip_prefix(b"\xEF\xBB\xBF")
        .unwrap_or(content.as_slice());
    let delimiter = detect_delimiter(content);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content);
    let csv_error = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(csv_error)?.clone();
    if headers.iter().all(|header| header.trim().is_empty()) {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    let index = ColumnIndex::from_headers(headers.iter());
    if let Some(column) = index.missing_required() {
        return Err(IngestError::MissingColumn {
            column: column.header().to_string(),
            path: path.to_path_buf(),
        });
    }
    let missing = index.missing();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(SurgeryColumn::header).collect();
        warn!(path = %path.display(), columns = ?names, "optional columns not found");
    }
    debug!(delimiter = %char::from(delimiter), "reading surgery sheet");

    let mut table = SurgeryTable::default();
    for (row_index, row) in reader.byte_records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(error) => {
                warn!(row = row_index, %error, "skipping unreadable row");
                table.skipped_rows += 1;
                continue;
            }
        };
        let raw = raw_row(&index, &row);
        match builder.build(row_index, &raw) {
            Some(record) => table.records.push(record),
            None => {
                debug!(row = row_index, "skipping row without procedure");
                table.skipped_rows += 1;
            }
        }
    }

    info!(
        path = %path.display(),
        records = table.records.len(),
        skipped = table.skipped_rows,
        "loaded surgery records"
    );
    Ok(table)
}

fn raw_row(index: &ColumnIndex, row: &ByteRecord) -> RawSurgeryRow {
    let cell = |column: SurgeryColumn| {
        index
            .position(column)
            .and_then(|position| row.get(position))
            .map(|value| String::from_utf8_lossy(value).trim().to_string())
            .unwrap_or_default()
    };
    RawSurgeryRow {
        date: cell(SurgeryColumn::Date),
        procedure: cell(SurgeryColumn::Procedure),
        specialty: cell(SurgeryColumn::Specialty),
        incision_time: cell(SurgeryColumn::IncisionTime),
        antibiotic_given: cell(SurgeryColumn::AntibioticGiven),
        antibiotic: cell(SurgeryColumn::Antibiotic),
        antibiotic_time: cell(SurgeryColumn::AntibioticTime),
        redose: cell(SurgeryColumn::Redose),
        redose_time: cell(SurgeryColumn::RedoseTime),
        patient_weight: cell(SurgeryColumn::PatientWeight),
    }
}
