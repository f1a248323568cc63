//! Request types for `circles_query`.
//!
//! The query endpoint takes PascalCase parameter objects, so every struct
//! here serializes with the wire casing rather than the Rust one.

use serde::Serialize;
use serde_json::Value;

/// Columns requested for transfer rows, in the order rows carry them.
pub const TRANSFER_COLUMNS: [&str; 11] = [
    "blockNumber",
    "timestamp",
    "transactionIndex",
    "logIndex",
    "transactionHash",
    "onBehalf",
    "sender",
    "recipient",
    "amount",
    "inflationaryAmount",
    "data",
];

/// Columns requested for group membership rows.
pub const MEMBERSHIP_COLUMNS: [&str; 6] = [
    "group",
    "member",
    "expiryTime",
    "memberType",
    "blockNumber",
    "timestamp",
];

/// Sort direction, spelled the way the endpoint expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortOrder {
    #[serde(rename = "ASC")]
    Ascending,
    #[serde(rename = "DESC")]
    Descending,
}

/// One entry of the `Order` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderBy {
    pub column: &'static str,
    pub sort_order: SortOrder,
}

/// One entry of the `Filter` clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilterPredicate {
    #[serde(rename = "Type")]
    kind: &'static str,
    pub filter_type: &'static str,
    pub column: &'static str,
    pub value: Value,
}

impl FilterPredicate {
    pub fn greater_than(column: &'static str, value: impl Into<Value>) -> Self {
        Self {
            kind: "FilterPredicate",
            filter_type: "GreaterThan",
            column,
            value: value.into(),
        }
    }

    pub fn equals(column: &'static str, value: impl Into<Value>) -> Self {
        Self {
            kind: "FilterPredicate",
            filter_type: "Equals",
            column,
            value: value.into(),
        }
    }
}

/// The positional parameter object of a `circles_query` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryParams {
    pub namespace: String,
    pub table: String,
    pub columns: Vec<&'static str>,
    pub order: Vec<OrderBy>,
    pub limit: u32,
    pub filter: Vec<FilterPredicate>,
}

impl QueryParams {
    /// Query a page of transfer rows, sorted by
    /// `(blockNumber, transactionIndex, logIndex)` in `direction`.
    pub fn transfers(
        namespace: &str,
        table: &str,
        limit: u32,
        direction: SortOrder,
        filter: Vec<FilterPredicate>,
    ) -> Self {
        Self {
            namespace: namespace.to_string(),
            table: table.to_string(),
            columns: TRANSFER_COLUMNS.to_vec(),
            order: vec![
                OrderBy {
                    column: "blockNumber",
                    sort_order: direction,
                },
                OrderBy {
                    column: "transactionIndex",
                    sort_order: direction,
                },
                OrderBy {
                    column: "logIndex",
                    sort_order: direction,
                },
            ],
            limit,
            filter,
        }
    }

    /// Query the newest group membership rows for one member address,
    /// optionally narrowed to one group.
    ///
    /// Addresses are lowercased; the membership view stores them that way.
    pub fn group_memberships(member: &str, group: Option<&str>, limit: u32) -> Self {
        let mut filter = vec![FilterPredicate::equals("member", member.to_lowercase())];
        if let Some(group) = group {
            filter.push(FilterPredicate::equals("group", group.to_lowercase()));
        }
        Self {
            namespace: "V_CrcV2".to_string(),
            table: "GroupMemberships".to_string(),
            columns: MEMBERSHIP_COLUMNS.to_vec(),
            order: vec![
                OrderBy {
                    column: "blockNumber",
                    sort_order: SortOrder::Descending,
                },
                OrderBy {
                    column: "transactionIndex",
                    sort_order: SortOrder::Descending,
                },
                OrderBy {
                    column: "logIndex",
                    sort_order: SortOrder::Descending,
                },
            ],
            limit,
            filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_params_match_the_wire_format() {
        let params = QueryParams::transfers(
            "CrcV2_OIC",
            "OpenMiddlewareTransfer",
            200,
            SortOrder::Ascending,
            vec![FilterPredicate::greater_than("blockNumber", 41)],
        );

        let encoded = serde_json::to_value(&params).ok();
        assert_eq!(
            encoded,
            Some(serde_json::json!({
                "Namespace": "CrcV2_OIC",
                "Table": "OpenMiddlewareTransfer",
                "Columns": [
                    "blockNumber",
                    "timestamp",
                    "transactionIndex",
                    "logIndex",
                    "transactionHash",
                    "onBehalf",
                    "sender",
                    "recipient",
                    "amount",
                    "inflationaryAmount",
                    "data"
                ],
                "Order": [
                    { "Column": "blockNumber", "SortOrder": "ASC" },
                    { "Column": "transactionIndex", "SortOrder": "ASC" },
                    { "Column": "logIndex", "SortOrder": "ASC" }
                ],
                "Limit": 200,
                "Filter": [
                    {
                        "Type": "FilterPredicate",
                        "FilterType": "GreaterThan",
                        "Column": "blockNumber",
                        "Value": 41
                    }
                ]
            }))
        );
    }

    #[test]
    fn test_membership_params_lowercase_addresses() {
        let params = QueryParams::group_memberships("0xAbCd", Some("0xEF01"), 5);

        assert_eq!(params.namespace, "V_CrcV2");
        assert_eq!(params.table, "GroupMemberships");
        assert_eq!(
            params.filter,
            vec![
                FilterPredicate::equals("member", "0xabcd"),
                FilterPredicate::equals("group", "0xef01"),
            ]
        );
    }

    #[test]
    fn test_membership_group_filter_is_optional() {
        let params = QueryParams::group_memberships("0xAbCd", None, 5);
        assert_eq!(
            params.filter,
            vec![FilterPredicate::equals("member", "0xabcd")]
        );
    }
}
