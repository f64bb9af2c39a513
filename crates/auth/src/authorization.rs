// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// A signed grant that lets its holder decrypt ciphertexts belonging to
/// `user_address` under the listed contracts for a bounded time window.
///
/// `contract_addresses` is kept sorted and deduplicated so two grants over
/// the same set compare equal regardless of the order the caller supplied.
/// The signature is stored exactly as the wallet produced it, 0x-prefixed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionAuthorization {
    pub private_key: String,
    pub public_key: String,
    pub signature: String,
    pub contract_addresses: Vec<Address>,
    pub user_address: Address,
    pub start_timestamp: i64,
    pub duration_days: u64,
}

impl DecryptionAuthorization {
    pub fn new(
        private_key: impl Into<String>,
        public_key: impl Into<String>,
        signature: impl Into<String>,
        contract_addresses: Vec<Address>,
        user_address: Address,
        start_timestamp: i64,
        duration_days: u64,
    ) -> Self {
        let mut contract_addresses = contract_addresses;
        contract_addresses.sort();
        contract_addresses.dedup();
        Self {
            private_key: private_key.into(),
            public_key: public_key.into(),
            signature: signature.into(),
            contract_addresses,
            user_address,
            start_timestamp,
            duration_days,
        }
    }

    /// Whether the grant covers the given unix second.
    ///
    /// A zero-day window is never valid, not even at its own start.
    pub fn is_valid_at(&self, now: i64) -> bool {
        if self.duration_days == 0 {
            return false;
        }
        let window = self.duration_days.saturating_mul(SECONDS_PER_DAY);
        let end = self.start_timestamp.saturating_add_unsigned(window);
        self.start_timestamp <= now && now < end
    }

    pub fn covers_contract(&self, contract: &Address) -> bool {
        self.contract_addresses.binary_search(contract).is_ok()
    }

    /// First unix second at which the grant is no longer valid.
    pub fn expires_at(&self) -> i64 {
        self.start_timestamp
            .saturating_add_unsigned(self.duration_days.saturating_mul(SECONDS_PER_DAY))
    }
}

impl fmt::Debug for DecryptionAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptionAuthorization")
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .field("signature", &self.signature)
            .field("contract_addresses", &self.contract_addresses)
            .field("user_address", &self.user_address)
            .field("start_timestamp", &self.start_timestamp)
            .field("duration_days", &self.duration_days)
            .finish()
    }
}
