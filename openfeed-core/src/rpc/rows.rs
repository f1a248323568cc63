//! Decoding of `circles_query` result pages.
//!
//! Results are column-major: a `columns` name array plus one value array
//! per row. Decoding is deliberately lenient. The indexer has changed its
//! numeric representation before (numbers vs decimal strings), and a row
//! that fails to decode cleanly should degrade field by field instead of
//! poisoning the page.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// A decoded row as a name-to-value map, in column order.
pub type Record = serde_json::Map<String, Value>;

/// One result page. A response missing either field (or carrying a null
/// result) decodes as an empty page rather than an error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    /// Pair each row's values with the column names.
    ///
    /// Values past the end of the column list are dropped; short rows simply
    /// omit their trailing fields.
    pub fn records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row.iter())
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect()
            })
            .collect()
    }
}

/// One transfer row with its fields coerced into stable types.
///
/// `amount` stays a decimal string in base units end to end. It can exceed
/// u128 and nothing here does arithmetic on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
    pub block_number: i64,
    pub timestamp: i64,
    pub transaction_index: i64,
    pub log_index: i64,
    pub transaction_hash: String,
    pub on_behalf: String,
    pub sender: String,
    pub recipient: String,
    pub amount: String,
    pub inflationary_amount: Option<String>,
    pub data: Option<String>,
}

impl TransferEvent {
    pub fn from_record(record: &Record) -> Self {
        Self {
            block_number: to_i64(record.get("blockNumber")),
            timestamp: to_i64(record.get("timestamp")),
            transaction_index: to_i64(record.get("transactionIndex")),
            log_index: to_i64(record.get("logIndex")),
            transaction_hash: field_string(record.get("transactionHash")),
            on_behalf: field_string(record.get("onBehalf")),
            sender: field_string(record.get("sender")),
            recipient: field_string(record.get("recipient")),
            amount: opt_string(record.get("amount"))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "0".to_string()),
            inflationary_amount: opt_string(record.get("inflationaryAmount")),
            data: opt_string(record.get("data")),
        }
    }
}

/// Numeric fields arrive as JSON numbers or numeric strings depending on
/// the node version. Anything else coerces to 0.
fn to_i64(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// String fields: absent and null become the empty string.
fn field_string(value: Option<&Value>) -> String {
    opt_string(value).unwrap_or_default()
}

/// Nullable string fields: null and absent stay `None`, scalars are
/// stringified.
fn opt_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => None,
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    }
}

/// Decode a transfer's hex `data` payload into readable text.
///
/// Returns `None` for anything that does not decode cleanly: empty input,
/// malformed hex, payloads that are not UTF-8, or text that is empty once
/// trailing NUL padding is stripped. Never fails the row.
pub fn decode_data_field(raw: &str) -> Option<String> {
    let hex_str = raw.strip_prefix("0x").unwrap_or(raw);
    if hex_str.is_empty() {
        return None;
    }

    let bytes = match hex::decode(hex_str) {
        Ok(bytes) => bytes,
        Err(error) => {
            warn!(error = %error, "transfer data field is not valid hex");
            return None;
        }
    };

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(error) => {
            warn!(error = %error, "transfer data field is not valid UTF-8");
            return None;
        }
    };

    let trimmed = text.trim_end_matches('\0');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(columns: &[&str], rows: Vec<Vec<Value>>) -> RowSet {
        RowSet {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn test_records_zip_rows_against_columns() {
        let set = page(
            &["blockNumber", "sender"],
            vec![vec![json!(12), json!("0xaa")], vec![json!(13), json!("0xbb")]],
        );

        let records = set.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("blockNumber"), Some(&json!(12)));
        assert_eq!(records[1].get("sender"), Some(&json!("0xbb")));
    }

    #[test]
    fn test_short_and_long_rows_degrade_quietly() {
        let set = page(
            &["blockNumber", "sender"],
            vec![
                vec![json!(12)],
                vec![json!(13), json!("0xbb"), json!("surplus")],
            ],
        );

        let records = set.records();
        assert_eq!(records[0].get("sender"), None);
        assert_eq!(records[1].len(), 2);
    }

    #[test]
    fn test_malformed_page_decodes_as_empty() {
        let set: RowSet = serde_json::from_value(json!({ "unexpected": true })).unwrap_or_default();
        assert!(set.records().is_empty());

        let set: RowSet = serde_json::from_value(json!(null)).unwrap_or_default();
        assert!(set.records().is_empty());
    }

    #[test]
    fn test_numeric_fields_coerce_from_numbers_and_strings() {
        let mut record = Record::new();
        record.insert("blockNumber".to_string(), json!(42));
        record.insert("transactionIndex".to_string(), json!("7"));
        record.insert("logIndex".to_string(), json!("not a number"));

        let event = TransferEvent::from_record(&record);
        assert_eq!(event.block_number, 42);
        assert_eq!(event.transaction_index, 7);
        assert_eq!(event.log_index, 0);
        assert_eq!(event.timestamp, 0);
    }

    #[test]
    fn test_amount_falls_back_to_zero() {
        let mut record = Record::new();
        record.insert("amount".to_string(), json!(null));
        assert_eq!(TransferEvent::from_record(&record).amount, "0");

        record.insert("amount".to_string(), json!(""));
        assert_eq!(TransferEvent::from_record(&record).amount, "0");

        record.insert("amount".to_string(), json!("250000000000000000000"));
        assert_eq!(
            TransferEvent::from_record(&record).amount,
            "250000000000000000000"
        );
    }

    #[test]
    fn test_optional_fields_keep_null_distinct_from_empty() {
        let mut record = Record::new();
        record.insert("data".to_string(), json!(null));
        let event = TransferEvent::from_record(&record);
        assert_eq!(event.data, None);
        assert_eq!(event.inflationary_amount, None);
        assert_eq!(event.sender, "");
    }

    #[test]
    fn test_data_field_decodes_prefixed_hex() {
        assert_eq!(
            decode_data_field("0x68656c6c6f"),
            Some("hello".to_string())
        );
        assert_eq!(decode_data_field("68656c6c6f"), Some("hello".to_string()));
    }

    #[test]
    fn test_data_field_round_trips_utf8() {
        let original = "tip for the $OPEN feed ✌";
        let encoded = format!("0x{}", hex::encode(original.as_bytes()));
        assert_eq!(decode_data_field(&encoded), Some(original.to_string()));
    }

    #[test]
    fn test_data_field_strips_trailing_nul_padding() {
        assert_eq!(decode_data_field("0x68690000"), Some("hi".to_string()));
        assert_eq!(decode_data_field("0x0000"), None);
    }

    #[test]
    fn test_undecodable_data_becomes_none() {
        assert_eq!(decode_data_field(""), None);
        assert_eq!(decode_data_field("0x"), None);
        assert_eq!(decode_data_field("0xzz"), None);
        assert_eq!(decode_data_field("0xf"), None);
        // 0xff is not valid UTF-8 on its own.
        assert_eq!(decode_data_field("0xff"), None);
    }
}
