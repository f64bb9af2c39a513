// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Opaque ciphertext handles.

use std::fmt;

use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// 32-byte on-ledger identifier of one encrypted field value.
///
/// Handles are opaque: the engine compares and forwards them but never
/// interprets their contents.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CiphertextHandle(B256);

impl CiphertextHandle {
    pub fn new(inner: B256) -> Self {
        Self(inner)
    }

    pub fn inner(&self) -> B256 {
        self.0
    }

    /// Hex form without a `0x` prefix, as decryption services expect
    /// handles on the wire.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<B256> for CiphertextHandle {
    fn from(inner: B256) -> Self {
        Self(inner)
    }
}

impl From<[u8; 32]> for CiphertextHandle {
    fn from(bytes: [u8; 32]) -> Self {
        Self(B256::from(bytes))
    }
}

impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CiphertextHandle({})", self.0)
    }
}

/// A handle together with the contract it was written by. Decryption
/// requests are made in these units so the oracle can check the handle
/// against the authorized contract set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleContractPair {
    pub handle: CiphertextHandle,
    pub contract_address: Address,
}

impl HandleContractPair {
    pub fn new(handle: CiphertextHandle, contract_address: Address) -> Self {
        Self {
            handle,
            contract_address,
        }
    }
}
