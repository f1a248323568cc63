//! Notification type definitions.
//!
//! Subscribers receive each transfer as one flat JSON object. The camelCase
//! field names are part of the wire contract; renaming one breaks every
//! connected client.

use crate::rpc::rows::{TransferEvent, decode_data_field};
use crate::utils::timestamp;
use serde::Serialize;

/// One transfer, as pushed to every connected subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferNotification {
    pub sender: String,
    pub recipient: String,
    pub amount: String,
    /// Attached payload decoded to text, when it decodes cleanly.
    pub data: Option<String>,
    /// The payload exactly as the row carried it.
    pub raw_data: Option<String>,
    pub block_number: i64,
    pub transaction_hash: String,
    pub transaction_index: i64,
    pub log_index: i64,
    pub inflationary_amount: Option<String>,
    pub on_behalf: String,
    /// `{namespace}_{table}` of the feed the event came from.
    pub table: String,
    /// RFC 3339. Rows without a usable timestamp get the wall clock at
    /// broadcast time.
    pub timestamp: String,
}

impl TransferNotification {
    /// Build the outgoing message for one decoded transfer event.
    pub fn from_event(event: &TransferEvent, table_label: &str) -> Self {
        Self {
            sender: event.sender.clone(),
            recipient: event.recipient.clone(),
            amount: event.amount.clone(),
            data: event.data.as_deref().and_then(decode_data_field),
            raw_data: event.data.clone(),
            block_number: event.block_number,
            transaction_hash: event.transaction_hash.clone(),
            transaction_index: event.transaction_index,
            log_index: event.log_index,
            inflationary_amount: event.inflationary_amount.clone(),
            on_behalf: event.on_behalf.clone(),
            table: table_label.to_string(),
            timestamp: timestamp::iso_or_now(event.timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event() -> TransferEvent {
        TransferEvent {
            block_number: 41,
            timestamp: 1_700_000_000,
            transaction_index: 2,
            log_index: 5,
            transaction_hash: "0xabc".to_string(),
            on_behalf: "0xbehalf".to_string(),
            sender: "0xsender".to_string(),
            recipient: "0xrecipient".to_string(),
            amount: "250000000000000000000".to_string(),
            inflationary_amount: Some("260000000000000000000".to_string()),
            data: Some("0x68656c6c6f".to_string()),
        }
    }

    #[test]
    fn test_serializes_with_the_wire_field_names() {
        let note =
            TransferNotification::from_event(&event(), "CrcV2_OIC_OpenMiddlewareTransfer");

        let encoded = serde_json::to_value(&note).ok();
        assert_eq!(
            encoded,
            Some(json!({
                "sender": "0xsender",
                "recipient": "0xrecipient",
                "amount": "250000000000000000000",
                "data": "hello",
                "rawData": "0x68656c6c6f",
                "blockNumber": 41,
                "transactionHash": "0xabc",
                "transactionIndex": 2,
                "logIndex": 5,
                "inflationaryAmount": "260000000000000000000",
                "onBehalf": "0xbehalf",
                "table": "CrcV2_OIC_OpenMiddlewareTransfer",
                "timestamp": "2023-11-14T22:13:20Z"
            }))
        );
    }

    #[test]
    fn test_missing_timestamp_falls_back_to_the_wall_clock() {
        let mut source = event();
        source.timestamp = 0;

        let note = TransferNotification::from_event(&source, "CrcV2_OIC_OpenMiddlewareTransfer");
        assert!(note.timestamp.contains('T'));
    }

    #[test]
    fn test_undecodable_payload_keeps_the_raw_form() {
        let mut source = event();
        source.data = Some("0xff".to_string());

        let note = TransferNotification::from_event(&source, "CrcV2_OIC_OpenMiddlewareTransfer");
        assert_eq!(note.data, None);
        assert_eq!(note.raw_data, Some("0xff".to_string()));
    }
}
