//! Records already materialised on the client, keyed by transaction hash.

use std::collections::HashMap;

use crate::record::SteganographyRecord;

/// Cache of fetched records.
///
/// Filled by the bulk load and by search hits. A record present here is
/// never fetched again to be displayed. Nothing survives the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordCache {
    by_transaction: HashMap<String, SteganographyRecord>,
}

impl RecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record`, replacing any entry with the same transaction hash.
    pub fn insert(&mut self, record: SteganographyRecord) {
        self.by_transaction
            .insert(record.transaction_hash.clone(), record);
    }

    /// Stores every record of a bulk load.
    pub fn extend<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = SteganographyRecord>,
    {
        for record in records {
            self.insert(record);
        }
    }

    pub fn get(&self, transaction_hash: &str) -> Option<&SteganographyRecord> {
        self.by_transaction.get(transaction_hash)
    }

    pub fn contains(&self, transaction_hash: &str) -> bool {
        self.by_transaction.contains_key(transaction_hash)
    }

    pub fn len(&self) -> usize {
        self.by_transaction.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_transaction.is_empty()
    }
}
