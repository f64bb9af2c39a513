// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use cipherwell_core::SurveyRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One decrypted submission with the timestamps the caller needs to render
/// a history entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptedRecord {
    pub record: SurveyRecord,
    pub submitted_at: i64,
    pub retrieved_at: i64,
}

impl DecryptedRecord {
    /// A zero ledger timestamp means the vault stored no time for this
    /// entry; the retrieval time stands in for it.
    pub fn new(record: SurveyRecord, ledger_timestamp: u64, retrieved_at: i64) -> Self {
        let submitted_at = match ledger_timestamp {
            0 => retrieved_at,
            ts => i64::try_from(ts).unwrap_or(retrieved_at),
        };
        Self {
            record,
            submitted_at,
            retrieved_at,
        }
    }
}

/// Per-index cache of successful decryptions for the current session.
///
/// An index is written at most once per completed decrypt; a failed decrypt
/// never touches it.
#[derive(Clone, Debug, Default)]
pub struct RecordCache {
    records: HashMap<u64, DecryptedRecord>,
}

impl RecordCache {
    pub fn get(&self, index: u64) -> Option<&DecryptedRecord> {
        self.records.get(&index)
    }

    pub fn insert(&mut self, index: u64, record: DecryptedRecord) {
        self.records.insert(index, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
