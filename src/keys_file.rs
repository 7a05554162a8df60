// 📂 Key file loading - plain text (one key per line) or CSV with a `key` column

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct KeyRecord {
    key: String,
}

/// Load keys in file order. Files ending in `.csv` are read as CSV with a
/// `key` header; anything else is one key per line, blank lines and
/// `#` comments skipped.
pub fn load_keys(path: &Path) -> Result<Vec<String>> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        load_csv(path)
    } else {
        load_lines(path)
    }
}

fn load_csv(path: &Path) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path))?;

    let mut keys = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        let record: KeyRecord =
            result.with_context(|| format!("Failed to read CSV record {}", line + 1))?;
        if !record.key.is_empty() {
            keys.push(record.key);
        }
    }

    Ok(keys)
}

fn load_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read keys file: {:?}", path))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}
