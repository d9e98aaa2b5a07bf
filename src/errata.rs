use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::translate::TranslationMap;

/// Hand-maintained corrections for identifiers the extraction gets wrong,
/// mostly merged header cells whose text lives in the first cell only and
/// therefore extract as `_none`. Loaded once, never mutated.
const DEFAULT_ERRATA_JSON: &str = include_str!("../errata.json");

/// Loads the errata table from `path`, or the built-in table when no path is
/// given.
pub fn load(path: Option<&Path>) -> Result<TranslationMap> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read errata: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse errata: {}", path.display()))
        }
        None => serde_json::from_str(DEFAULT_ERRATA_JSON).context("built-in errata is invalid"),
    }
}
