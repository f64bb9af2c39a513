// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::{keccak256, Address, Bytes, U256};
use alloy::signers::{local::PrivateKeySigner, SignerSync};
use alloy::sol_types::SolValue;
use async_trait::async_trait;
use thiserror::Error;

/// What the user's wallet signs when granting a decryption authorization.
///
/// Encoded via `abi.encodePacked(publicKey, contracts, startTimestamp,
/// durationDays)` so a verifier can reconstruct the same digest from the
/// stored authorization fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationPayload {
    pub public_key: String,
    pub contract_addresses: Vec<Address>,
    pub start_timestamp: i64,
    pub duration_days: u64,
}

impl AuthorizationPayload {
    pub fn new(
        public_key: impl Into<String>,
        contract_addresses: Vec<Address>,
        start_timestamp: i64,
        duration_days: u64,
    ) -> Self {
        let mut contract_addresses = contract_addresses;
        contract_addresses.sort();
        contract_addresses.dedup();
        Self {
            public_key: public_key.into(),
            contract_addresses,
            start_timestamp,
            duration_days,
        }
    }

    /// Compute the keccak256 digest of the canonical encoding.
    pub fn digest(&self) -> [u8; 32] {
        let mut contract_bytes =
            Vec::with_capacity(self.contract_addresses.len() * Address::len_bytes());
        for contract in &self.contract_addresses {
            contract_bytes.extend_from_slice(contract.as_slice());
        }

        let encoded = (
            Bytes::copy_from_slice(self.public_key.as_bytes()),
            Bytes::from(contract_bytes),
            U256::try_from(self.start_timestamp)
                .expect("start timestamp should be a valid U256"),
            U256::from(self.duration_days),
        )
            .abi_encode_packed();

        keccak256(&encoded).into()
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SignerError {
    /// No signer can be reached at all. Terminal for the operation; the
    /// request is not retried.
    #[error("signer unavailable: {0}")]
    Unavailable(String),
    /// The signer was reached but declined or failed to sign.
    #[error("signature request rejected: {0}")]
    Rejected(String),
}

/// External collaborator that produces the authorization signature, usually
/// by prompting the user's wallet. Implementations must treat every call as
/// one interactive prompt.
#[async_trait]
pub trait AuthorizationSigner: Send + Sync + 'static {
    /// Sign the payload digest, returning a 0x-prefixed hex signature.
    async fn sign_authorization(
        &self,
        payload: &AuthorizationPayload,
    ) -> Result<String, SignerError>;
}

/// In-process signer over a raw private key, for tests and local tooling.
///
/// Signs the payload digest as an EIP-191 personal message, matching what
/// a browser wallet produces for the same bytes.
pub struct LocalAuthorizationSigner {
    signer: PrivateKeySigner,
}

impl LocalAuthorizationSigner {
    pub fn new(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }

    pub fn from_private_key(private_key: &str) -> Result<Self, SignerError> {
        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|err| SignerError::Unavailable(format!("invalid private key: {err}")))?;
        Ok(Self::new(signer))
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

#[async_trait]
impl AuthorizationSigner for LocalAuthorizationSigner {
    async fn sign_authorization(
        &self,
        payload: &AuthorizationPayload,
    ) -> Result<String, SignerError> {
        let digest = payload.digest();
        let signature = self
            .signer
            .sign_message_sync(&digest)
            .map_err(|err| SignerError::Rejected(err.to_string()))?;
        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }
}
