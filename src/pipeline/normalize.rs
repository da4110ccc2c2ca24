use crate::config::FieldDefaults;
use crate::error::{Result, ScraperError};
use crate::types::{AccountRecord, RawRecord};
use serde_json::Value;

/// Converts one raw row into a structurally complete [`AccountRecord`].
///
/// Rows missing any of the four required fields (rank, account,
/// total_blocks, super_blocks) are rejected rather than coerced; a short
/// row means the source markup changed and must not silently corrupt the
/// dataset. Callers treat the error as row-level: skip, log, count.
pub fn normalize_record(raw: &RawRecord, defaults: &FieldDefaults) -> Result<AccountRecord> {
    let account = required_string(raw, "account")?;
    let rank = integer_field(raw, "rank")?;
    let rank = u32::try_from(rank).map_err(|_| ScraperError::MalformedNumber {
        field: "rank",
        value: rank.to_string(),
    })?;
    let total_blocks = integer_field(raw, "total_blocks")?;
    let super_blocks = integer_field(raw, "super_blocks")?;

    let daily_blocks =
        optional_string(raw, "daily_blocks").unwrap_or_else(|| defaults.daily_blocks.clone());
    let hash_rate =
        optional_string(raw, "hash_rate").unwrap_or_else(|| defaults.hash_rate.clone());

    Ok(AccountRecord {
        rank: Some(rank),
        account,
        total_blocks: Some(total_blocks),
        super_blocks: Some(super_blocks),
        daily_blocks: Some(daily_blocks),
        hash_rate: Some(hash_rate),
        // populated during reconciliation, from the xuni feed
        xuni_count: None,
        status: None,
    })
}

/// Strips grouping separators and parses a base-10 integer.
pub fn parse_count(field: &'static str, text: &str) -> Result<u64> {
    let cleaned = text.trim().replace(',', "");
    cleaned
        .parse::<u64>()
        .map_err(|_| ScraperError::MalformedNumber {
            field,
            value: text.to_string(),
        })
}

fn integer_field(raw: &RawRecord, field: &'static str) -> Result<u64> {
    match raw.get(field) {
        None | Some(Value::Null) => Err(ScraperError::MissingField(field.to_string())),
        Some(Value::Number(n)) => n.as_u64().ok_or_else(|| ScraperError::MalformedNumber {
            field,
            value: n.to_string(),
        }),
        Some(Value::String(s)) => parse_count(field, s),
        Some(other) => Err(ScraperError::MalformedNumber {
            field,
            value: other.to_string(),
        }),
    }
}

fn required_string(raw: &RawRecord, field: &str) -> Result<String> {
    let value = raw
        .get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .ok_or_else(|| ScraperError::MissingField(field.to_string()))?;
    if value.is_empty() {
        return Err(ScraperError::MissingField(field.to_string()));
    }
    Ok(value)
}

fn optional_string(raw: &RawRecord, field: &str) -> Option<String> {
    raw.get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> FieldDefaults {
        FieldDefaults::default()
    }

    #[test]
    fn strips_grouping_separators() {
        let raw = json!({
            "rank": "1",
            "account": "0xabc",
            "total_blocks": "12,345",
            "super_blocks": "67"
        });
        let record = normalize_record(&raw, &defaults()).unwrap();
        assert_eq!(record.total_blocks, Some(12345));
        assert_eq!(record.super_blocks, Some(67));
        assert_eq!(record.rank, Some(1));
    }

    #[test]
    fn rejects_malformed_numbers() {
        let raw = json!({
            "rank": "1",
            "account": "0xabc",
            "total_blocks": "12a45",
            "super_blocks": "0"
        });
        let err = normalize_record(&raw, &defaults()).unwrap_err();
        assert!(matches!(
            err,
            ScraperError::MalformedNumber {
                field: "total_blocks",
                ..
            }
        ));
    }

    #[test]
    fn rejects_short_rows() {
        // only three of the four required fields present
        let raw = json!({
            "rank": "1",
            "account": "0xabc",
            "total_blocks": "10"
        });
        let err = normalize_record(&raw, &defaults()).unwrap_err();
        assert!(matches!(err, ScraperError::MissingField(_)));
    }

    #[test]
    fn rejects_blank_account() {
        let raw = json!({
            "rank": "1",
            "account": "   ",
            "total_blocks": "10",
            "super_blocks": "2"
        });
        let err = normalize_record(&raw, &defaults()).unwrap_err();
        assert!(matches!(err, ScraperError::MissingField(_)));
    }

    #[test]
    fn accepts_numeric_json_values() {
        // the JSON API reports numbers, not strings
        let raw = json!({
            "rank": 7,
            "account": "0xdef",
            "total_blocks": 1000,
            "super_blocks": 3
        });
        let record = normalize_record(&raw, &defaults()).unwrap();
        assert_eq!(record.rank, Some(7));
        assert_eq!(record.total_blocks, Some(1000));
    }

    #[test]
    fn fills_defaults_for_unreported_fields() {
        let raw = json!({
            "rank": "500",
            "account": "0xabc",
            "total_blocks": "10",
            "super_blocks": "0"
        });
        let record = normalize_record(&raw, &defaults()).unwrap();
        assert_eq!(record.daily_blocks.as_deref(), Some("Sub-500 Rank"));
        assert_eq!(record.hash_rate.as_deref(), Some("N/A"));
        assert_eq!(record.xuni_count, None);
    }

    #[test]
    fn keeps_reported_optional_fields() {
        let raw = json!({
            "rank": "2",
            "account": "0xabc",
            "total_blocks": "10",
            "super_blocks": "0",
            "daily_blocks": "120",
            "hash_rate": "10 H/s"
        });
        let record = normalize_record(&raw, &defaults()).unwrap();
        assert_eq!(record.daily_blocks.as_deref(), Some("120"));
        assert_eq!(record.hash_rate.as_deref(), Some("10 H/s"));
    }
}
