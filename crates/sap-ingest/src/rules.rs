//! Protocol rule and translation dictionary loading.

use std::collections::BTreeMap;
use std::path::Path;

use sap_model::ProtocolRule;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{IngestError, Result};

/// Rules loaded from one JSON file.
#[derive(Debug, Clone)]
pub struct RuleSource {
    pub rules: Vec<ProtocolRule>,
    /// Hex SHA256 of the file bytes, reported alongside audit results.
    pub sha256: String,
}

/// Loads a JSON array of protocol rules.
pub fn load_rules(path: &Path) -> Result<RuleSource> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::read(path, e))?;
    let sha256 = hex::encode(Sha256::digest(&bytes));
    let rules: Vec<ProtocolRule> = parse_json(path, &bytes)?;
    info!(path = %path.display(), rules = rules.len(), "loaded protocol rules");
    debug!(sha256 = %sha256, "rules digest");
    Ok(RuleSource { rules, sha256 })
}

/// Loads a JSON object mapping raw procedure names to protocol names.
///
/// Values may list alternatives separated by "/".
pub fn load_translations(path: &Path) -> Result<BTreeMap<String, String>> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::read(path, e))?;
    let translations: BTreeMap<String, String> = parse_json(path, &bytes)?;
    info!(
        path = %path.display(),
        entries = translations.len(),
        "loaded procedure translations"
    );
    Ok(translations)
}

fn parse_json<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<T> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    serde_json::from_slice(bytes).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })
}
