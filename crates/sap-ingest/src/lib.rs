//! Loading of audit inputs.
//!
//! Protocol rules and the procedure translation dictionary come from JSON
//! files produced upstream; surgery records come from the hospital sheet
//! exported as CSV.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use sap_ingest::{RecordBuilder, load_rules, read_surgery_csv};
//! use sap_model::AuditConfig;
//!
//! let config = AuditConfig::default();
//! let rules = load_rules(Path::new("rules.json"))?;
//! let table = read_surgery_csv(Path::new("cirurgias.csv"), &RecordBuilder::new(&config.drugs))?;
//! ```

mod csv;
mod error;
mod record;
mod rules;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{ColumnIndex, SurgeryColumn, SurgeryTable, read_surgery_csv};

// === Record Building ===
pub use record::{
    MIN_PROCEDURE_LEN, RawSurgeryRow, RecordBuilder, parse_date, parse_weight, parse_yes_no,
};

// === JSON Inputs ===
pub use rules::{RuleSource, load_rules, load_translations};
