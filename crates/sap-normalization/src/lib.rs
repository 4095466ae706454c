//! Normalization primitives for prophylaxis audits.
//!
//! Everything here is a pure function or an immutable lookup built once per
//! run: text canonicalization, similarity scoring, drug name resolution,
//! dose extraction and clock time arithmetic. Parse failures are reported as
//! `None`, never as errors.

pub mod dose;
pub mod drug;
pub mod similarity;
pub mod text;
pub mod time;

pub use dose::{DoseUnit, WeightBasedDose, extract_dose_mg, parse_weight_based};
pub use drug::DrugResolver;
pub use similarity::{MAX_INEXACT_SCORE, fuzzy_score, ratio, token_set_ratio};
pub use text::{clean_procedure_name, compact, normalize_text};
pub use time::{format_time, minutes_between, parse_time, time_diff_minutes};
