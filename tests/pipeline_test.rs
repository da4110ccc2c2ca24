use anyhow::Result;
use hashhead::config::{FieldDefaults, OverflowMode};
use hashhead::pipeline::materialize::materialize;
use hashhead::pipeline::normalize::normalize_record;
use hashhead::pipeline::reconcile::reconcile;
use hashhead::snapshot;
use hashhead::types::AccountsSnapshot;
use serde_json::json;
use std::collections::HashMap;
use tempfile::tempdir;

/// Primary has accounts A and B; the secondary feed knows A's hash rate
/// and brings an account C ranked far outside the cutoff. The published
/// universe of 3 must be [A with hash rate, B, placeholder_2].
#[tokio::test]
async fn two_source_run_produces_contracted_artifacts() -> Result<()> {
    let defaults = FieldDefaults::default();

    let primary: Vec<_> = [
        json!({"rank": "1", "account": "A", "total_blocks": "1,000", "super_blocks": "10"}),
        json!({"rank": "2", "account": "B", "total_blocks": "900", "super_blocks": "5"}),
    ]
    .iter()
    .map(|raw| normalize_record(raw, &defaults).unwrap())
    .collect();

    let secondary: Vec<_> = [
        json!({"rank": "1", "account": "A", "total_blocks": "1,000", "super_blocks": "10", "hash_rate": "10 H/s"}),
        json!({"rank": "25500", "account": "C", "total_blocks": "1", "super_blocks": "0", "hash_rate": "1 H/s"}),
    ]
    .iter()
    .map(|raw| normalize_record(raw, &defaults).unwrap())
    .collect();

    let reconciled = reconcile(primary, secondary, &HashMap::new(), 25000, "0");
    assert_eq!(reconciled.len(), 2, "C is ranked beyond the cutoff");
    assert_eq!(reconciled[0].account, "A");
    assert_eq!(reconciled[0].hash_rate.as_deref(), Some("10 H/s"));
    assert_eq!(reconciled[0].total_blocks, Some(1000));
    assert_eq!(reconciled[1].account, "B");
    assert_eq!(reconciled[1].hash_rate.as_deref(), Some("N/A"));

    let records = materialize(reconciled, 3, OverflowMode::Mark);
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].account, "placeholder_2");
    assert_eq!(records[2].status.as_deref(), Some("Out of top 3"));

    // write real artifacts and read them back
    let dir = tempdir()?;
    let accounts = AccountsSnapshot {
        timestamp: snapshot::accounts_timestamp(),
        data: records,
    };
    let path = snapshot::write_accounts(&accounts, dir.path())?;

    let content = std::fs::read_to_string(path)?;
    let parsed: serde_json::Value = serde_json::from_str(&content)?;
    let data = parsed["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["account"], "A");
    assert_eq!(data[0]["hash_rate"], "10 H/s");
    assert_eq!(data[0]["xuni_count"], "0");
    // placeholders publish only account and status
    assert_eq!(
        data[2].as_object().unwrap().keys().collect::<Vec<_>>(),
        vec!["account", "status"]
    );
    assert!(parsed["timestamp"].as_str().unwrap().len() == 19);

    Ok(())
}

/// A run that finds zero valid rows still publishes a fully padded
/// snapshot of the contracted length.
#[tokio::test]
async fn zero_row_run_still_writes_padded_snapshot() -> Result<()> {
    let reconciled = reconcile(vec![], vec![], &HashMap::new(), 25000, "(Coming Soon)");
    let records = materialize(reconciled, 5, OverflowMode::Mark);
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.is_placeholder()));

    let dir = tempdir()?;
    let accounts = AccountsSnapshot {
        timestamp: snapshot::accounts_timestamp(),
        data: records,
    };
    let path = snapshot::write_accounts(&accounts, dir.path())?;
    let parsed: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    assert_eq!(parsed["data"].as_array().unwrap().len(), 5);

    Ok(())
}
