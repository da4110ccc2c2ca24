use crate::constants::{ACCOUNTS_FILE, NETWORK_STATS_FILE};
use crate::error::Result;
use crate::types::{AccountsSnapshot, NetworkStats};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Generation time in the form the stats artifact carries.
pub fn stats_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Generation time in the form the accounts artifact carries.
pub fn accounts_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn write_network_stats(stats: &NetworkStats, output_dir: &Path) -> Result<PathBuf> {
    write_artifact(output_dir, NETWORK_STATS_FILE, stats)
}

pub fn write_accounts(snapshot: &AccountsSnapshot, output_dir: &Path) -> Result<PathBuf> {
    write_artifact(output_dir, ACCOUNTS_FILE, snapshot)
}

/// Writes to a sibling temp file and renames it over the target, so a
/// reader never observes a half-written artifact.
fn write_artifact<T: serde::Serialize>(
    output_dir: &Path,
    filename: &str,
    value: &T,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(filename);
    let tmp_path = output_dir.join(format!("{filename}.tmp"));

    let json_content = serde_json::to_string_pretty(value)?;
    fs::write(&tmp_path, json_content)?;
    fs::rename(&tmp_path, &path)?;

    info!("Wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountRecord;
    use std::collections::BTreeMap;

    #[test]
    fn writes_replace_previous_content() {
        let dir = tempfile::tempdir().unwrap();

        let mut stats: NetworkStats = BTreeMap::new();
        stats.insert("timestamp".to_string(), "2024-01-01T00:00:00".to_string());
        stats.insert("Total Blocks".to_string(), "1".to_string());
        write_network_stats(&stats, dir.path()).unwrap();

        stats.insert("Total Blocks".to_string(), "2".to_string());
        let path = write_network_stats(&stats, dir.path()).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let parsed: NetworkStats = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.get("Total Blocks").map(String::as_str), Some("2"));
        // no temp file left behind
        assert!(!dir.path().join("network_stats.json.tmp").exists());
    }

    #[test]
    fn placeholder_records_serialize_as_account_and_status_only() {
        let snapshot = AccountsSnapshot {
            timestamp: "2024-01-01 00:00:00".to_string(),
            data: vec![AccountRecord::placeholder(0, 3)],
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        let record = &json["data"][0];
        assert_eq!(record["account"], "placeholder_0");
        assert_eq!(record["status"], "Out of top 3");
        assert!(record.get("rank").is_none());
        assert!(record.get("total_blocks").is_none());
    }
}
