use std::path::PathBuf;

/// Invalid or unreadable audit configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render TOML config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("{field} must be a finite value in [0, 1], got {value}")]
    Threshold { field: &'static str, value: f64 },

    #[error("invalid dose tolerance: {message}")]
    DoseTolerance { message: String },

    #[error("{field} must be {expected}, got {value}")]
    Minutes {
        field: &'static str,
        expected: &'static str,
        value: i64,
    },

    #[error("invalid dose cap for {drug}: {message}")]
    DoseCap { drug: String, message: String },

    #[error("invalid drug dictionary entry {drug:?}: {message}")]
    Drug { drug: String, message: String },
}
