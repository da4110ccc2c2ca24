use crate::types::AccountRecord;
use std::collections::HashMap;
use tracing::debug;

/// Merges the primary and secondary record sets into one canonical,
/// order-preserving sequence keyed by account identity.
///
/// The primary feed owns rank, block counts and daily activity; the
/// secondary feed owns hash rate. On overlap only the secondary-owned
/// field is taken, so a conflicting secondary block count can never
/// displace the primary's. Accounts seen only on the secondary feed are
/// admitted when their rank is within `rank_cutoff` and appended after
/// all primary rows in the secondary feed's order.
///
/// Account keys are compared exactly, case-sensitively.
pub fn reconcile(
    primary: Vec<AccountRecord>,
    secondary: Vec<AccountRecord>,
    xuni_counts: &HashMap<String, u64>,
    rank_cutoff: u32,
    xuni_default: &str,
) -> Vec<AccountRecord> {
    let mut merged = primary;
    let mut index: HashMap<String, usize> = merged
        .iter()
        .enumerate()
        .map(|(i, record)| (record.account.clone(), i))
        .collect();

    for record in secondary {
        match index.get(&record.account) {
            Some(&i) => {
                if record.hash_rate.is_some() {
                    merged[i].hash_rate = record.hash_rate;
                }
            }
            None => {
                let within_cutoff = record.rank.map(|r| r <= rank_cutoff).unwrap_or(false);
                if within_cutoff {
                    index.insert(record.account.clone(), merged.len());
                    merged.push(record);
                } else {
                    debug!(
                        "Dropping secondary-only account {} ranked outside cutoff {}",
                        record.account, rank_cutoff
                    );
                }
            }
        }
    }

    for record in &mut merged {
        record.xuni_count = Some(match xuni_counts.get(&record.account) {
            Some(count) => count.to_string(),
            None => xuni_default.to_string(),
        });
    }

    merged
}
