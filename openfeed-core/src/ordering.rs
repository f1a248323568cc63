//! Total ordering of transfer events.
//!
//! Every row carries `(blockNumber, transactionIndex, logIndex)`, which
//! places it exactly where it executed on chain. The monitor keeps the
//! greatest key it has consumed (the watermark) and treats everything at
//! or below it as already seen.

use crate::rpc::rows::TransferEvent;

/// Position of one event in the chain's execution order.
///
/// Comparison is lexicographic: block first, then transaction index, then
/// log index within the transaction. The derived `Ord` follows field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderingKey {
    pub block: i64,
    pub tx_index: i64,
    pub log_index: i64,
}

impl OrderingKey {
    /// Key of a decoded transfer row.
    pub fn from_event(event: &TransferEvent) -> Self {
        Self {
            block: event.block_number,
            tx_index: event.transaction_index,
            log_index: event.log_index,
        }
    }

    /// Whether this key comes strictly after the watermark.
    ///
    /// An empty watermark accepts everything. A key equal to the watermark
    /// is the row consumed last cycle, not a new one.
    pub fn is_newer_than(self, watermark: Option<OrderingKey>) -> bool {
        match watermark {
            None => true,
            Some(mark) => self > mark,
        }
    }
}

impl std::fmt::Display for OrderingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.block, self.tx_index, self.log_index)
    }
}

/// Greatest key consumed so far.
///
/// Held in memory by the monitor task and never persisted; a restart starts
/// empty and the first cycle re-reads one page of history.
#[derive(Debug, Default)]
pub struct Watermark {
    last: Option<OrderingKey>,
}

impl Watermark {
    pub fn new() -> Self {
        Self { last: None }
    }

    pub fn get(&self) -> Option<OrderingKey> {
        self.last
    }

    /// Record `key` as the greatest consumed key.
    ///
    /// Overwrites without comparing: the single writer only calls this with
    /// the maximum of a batch that already passed `is_newer_than`.
    pub fn advance(&mut self, key: OrderingKey) {
        self.last = Some(key);
    }
}
