// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use async_trait::async_trait;
use cipherwell_core::{CiphertextHandle, HandleContractPair};
use std::collections::HashMap;
use thiserror::Error;

/// One authorized decryption call as the oracle expects it.
///
/// The signature is passed WITHOUT its `0x` prefix; the keypair and window
/// fields are copied verbatim from the authorization that was signed over
/// them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserDecryptRequest {
    pub pairs: Vec<HandleContractPair>,
    pub private_key: String,
    pub public_key: String,
    pub signature: String,
    pub user_address: Address,
    pub start_timestamp: i64,
    pub duration_days: u64,
    pub contract_addresses: Vec<Address>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OracleError {
    /// The oracle processed the request and said no.
    #[error("decryption request rejected: {0}")]
    Rejected(String),
    /// The oracle could not be reached at all.
    #[error("decryption oracle unreachable: {0}")]
    Unreachable(String),
}

/// External collaborator performing the actual homomorphic user-decrypt.
///
/// A successful call returns a plaintext for every requested handle; a
/// failed call returns nothing at all.
#[async_trait]
pub trait DecryptionOracle: Send + Sync + 'static {
    async fn user_decrypt(
        &self,
        request: &UserDecryptRequest,
    ) -> Result<HashMap<CiphertextHandle, u64>, OracleError>;
}
