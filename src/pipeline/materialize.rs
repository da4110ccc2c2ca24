use crate::config::OverflowMode;
use crate::types::AccountRecord;
use std::cmp::Ordering;

/// Forces the record sequence to the contracted universe shape.
///
/// Short input is padded with synthetic placeholders up to exactly
/// `universe_size`. Long input is either hard-truncated or kept with the
/// overflow re-emitted as status-tagged markers after the prefix,
/// depending on `mode`. Exact-length input comes back unchanged.
pub fn materialize(
    mut records: Vec<AccountRecord>,
    universe_size: usize,
    mode: OverflowMode,
) -> Vec<AccountRecord> {
    match records.len().cmp(&universe_size) {
        Ordering::Equal => records,
        Ordering::Less => {
            for i in records.len()..universe_size {
                records.push(AccountRecord::placeholder(i, universe_size));
            }
            records
        }
        Ordering::Greater => match mode {
            OverflowMode::Truncate => {
                records.truncate(universe_size);
                records
            }
            OverflowMode::Mark => {
                let overflow: Vec<AccountRecord> = records
                    .drain(universe_size..)
                    .map(|r| AccountRecord::out_of_range(r.account, universe_size))
                    .collect();
                records.extend(overflow);
                records
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entrant(rank: u32, account: &str) -> AccountRecord {
        AccountRecord {
            rank: Some(rank),
            account: account.to_string(),
            total_blocks: Some(10),
            super_blocks: Some(1),
            daily_blocks: Some("Sub-500 Rank".to_string()),
            hash_rate: Some("N/A".to_string()),
            xuni_count: Some("0".to_string()),
            status: None,
        }
    }

    fn entrants(n: usize) -> Vec<AccountRecord> {
        (0..n).map(|i| entrant(i as u32 + 1, &format!("acct_{i}"))).collect()
    }

    #[test]
    fn pads_short_input_to_exact_length() {
        let out = materialize(entrants(2), 5, OverflowMode::Mark);
        assert_eq!(out.len(), 5);
        assert_eq!(out[2].account, "placeholder_2");
        assert_eq!(out[4].account, "placeholder_4");
        assert_eq!(out[2].status.as_deref(), Some("Out of top 5"));
        assert!(out[2].rank.is_none());
    }

    #[test]
    fn exact_length_input_is_unchanged() {
        let input = entrants(4);
        let out = materialize(input.clone(), 4, OverflowMode::Mark);
        assert_eq!(out, input);
    }

    #[test]
    fn truncate_mode_hard_cuts() {
        let out = materialize(entrants(8), 5, OverflowMode::Truncate);
        assert_eq!(out.len(), 5);
        assert_eq!(out[4].account, "acct_4");
        assert!(out.iter().all(|r| r.status.is_none()));
    }

    #[test]
    fn mark_mode_tags_overflow_after_prefix() {
        let out = materialize(entrants(8), 5, OverflowMode::Mark);
        assert_eq!(out.len(), 8);
        // kept prefix is intact and untagged
        assert!(out[..5].iter().all(|r| r.status.is_none()));
        // overflow rows keep their account but carry only the status
        assert_eq!(out[5].account, "acct_5");
        assert_eq!(out[5].status.as_deref(), Some("Out of top 5"));
        assert!(out[5].total_blocks.is_none());
    }

    #[test]
    fn non_overflow_prefix_is_min_of_input_and_universe() {
        for k in [0usize, 3, 5, 9] {
            let out = materialize(entrants(k), 5, OverflowMode::Mark);
            let prefix = out.iter().take_while(|r| !r.is_placeholder()).count();
            assert_eq!(prefix, k.min(5));
        }
    }

    #[test]
    fn padding_is_inverse_adjacent_to_input() {
        let input = entrants(4);
        let mut out = materialize(input.clone(), 5, OverflowMode::Mark);
        let appended = out.pop().unwrap();
        assert!(appended.is_placeholder());
        assert_eq!(out, input);
    }
}
