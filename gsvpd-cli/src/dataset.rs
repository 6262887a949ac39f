//! Panorama id datasets.
//!
//! A dataset is a JSON array of identifier strings:
//!
//! ```json
//! ["CAoSLEFGMVFpcE...", "AF1QipN...", "..."]
//! ```

use crate::error::CliError;
use std::path::Path;

/// Reads the identifiers in `path`, keeping the first `limit` when given.
///
/// A limit of 0 keeps every identifier.
pub fn load_dataset(path: &Path, limit: Option<usize>) -> Result<Vec<String>, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::Dataset {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut ids: Vec<String> = serde_json::from_str(&content).map_err(|e| CliError::Dataset {
        path: path.display().to_string(),
        reason: format!("expected a JSON array of strings: {}", e),
    })?;

    if let Some(limit) = limit.filter(|&n| n > 0) {
        ids.truncate(limit);
    }

    Ok(ids)
}
