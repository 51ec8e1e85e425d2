// JSON exports: dated files written to the export directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tracing::info;

/// File name prefixes for each kind of export.
pub const CLAIMS_PREFIX: &str = "all-claims";
pub const SERVER_CLAIMS_PREFIX: &str = "claims-export";
pub const INSIGHTS_PREFIX: &str = "insights-export";
pub const SOURCES_PREFIX: &str = "sources-analysis";
pub const DETAILED_PREFIX: &str = "detailed-analysis";

/// `<prefix>-<YYYY-MM-DD>.json`
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}.json", prefix, date.format("%Y-%m-%d"))
}

/// Write `document` as pretty-printed JSON under `dir`, named for today.
/// Creates `dir` if needed and returns the written path.
pub fn write_export(dir: &Path, prefix: &str, document: &Value) -> Result<PathBuf> {
    write_export_dated(dir, prefix, document, Utc::now().date_naive())
}

pub fn write_export_dated(
    dir: &Path,
    prefix: &str,
    document: &Value,
    date: NaiveDate,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(export_file_name(prefix, date));
    let json = serde_json::to_string_pretty(document).context("Failed to serialize export")?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write export to {}", path.display()))?;

    info!(path = %path.display(), "Export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name(INSIGHTS_PREFIX, date), "insights-export-2024-03-07.json");
    }

    #[test]
    fn writes_pretty_json() {
        let dir = std::env::temp_dir().join(format!("claimdesk-export-{}", std::process::id()));
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let path =
            write_export_dated(&dir, CLAIMS_PREFIX, &json!({"claims": []}), date).unwrap();

        assert!(path.ends_with("all-claims-2024-01-02.json"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n"));
        let parsed: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, json!({"claims": []}));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
