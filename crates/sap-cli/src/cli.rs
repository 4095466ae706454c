//! CLI argument definitions for the prophylaxis auditor.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sap-audit",
    version,
    about = "Surgical antibiotic prophylaxis auditor",
    long_about = "Audit surgical antibiotic prophylaxis against the institutional protocol.\n\n\
                  Each surgery is matched to a protocol rule and judged on antibiotic\n\
                  choice, dose, timing before incision and redosing."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow procedure names and antibiotic text in logs.
    ///
    /// Row-level values are redacted unless this flag is set.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Audit a surgery sheet against the protocol rules.
    Audit(AuditArgs),

    /// Show statistics of a protocol rules file.
    Rules(RulesArgs),

    /// Print the effective configuration as TOML.
    Config(ConfigArgs),
}

#[derive(Parser)]
pub struct AuditArgs {
    /// Surgery sheet exported as CSV.
    #[arg(value_name = "SURGERIES_CSV")]
    pub surgeries: PathBuf,

    /// Protocol rules JSON file.
    #[arg(value_name = "RULES_JSON")]
    pub rules: PathBuf,

    /// Procedure translation dictionary (JSON object).
    #[arg(long = "translations", value_name = "FILE")]
    pub translations: Option<PathBuf>,

    /// Audit configuration TOML file.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the audit results as JSON.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Minimum fuzzy score for a procedure match (overrides the config file).
    #[arg(long = "match-threshold", value_name = "X")]
    pub match_threshold: Option<f64>,
}

#[derive(Parser)]
pub struct RulesArgs {
    /// Protocol rules JSON file.
    #[arg(value_name = "RULES_JSON")]
    pub rules: PathBuf,
}

#[derive(Parser)]
pub struct ConfigArgs {
    /// Configuration TOML file merged over the defaults.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
