/// A record that cannot be evaluated at all.
///
/// Batch auditing turns these into INDETERMINADO results instead of stopping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("row {row}: {field} is not a finite number ({value})")]
    NonFinite {
        row: String,
        field: &'static str,
        value: f64,
    },
}
