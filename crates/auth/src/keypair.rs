// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::signers::local::PrivateKeySigner;
use rand::{CryptoRng, RngCore};
use std::fmt;
use zeroize::Zeroizing;

/// Ephemeral keypair minted per authorization and handed to the decryption
/// oracle. Both keys are 0x-prefixed hex; the private key is wiped from
/// memory when the keypair is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct Keypair {
    public_key: String,
    private_key: Zeroizing<String>,
}

impl Keypair {
    /// Generate a fresh secp256k1 keypair from the given rng.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let mut secret = Zeroizing::new([0u8; 32]);
            rng.fill_bytes(secret.as_mut());
            // Out-of-range scalars are rejected and redrawn.
            if let Ok(signer) = PrivateKeySigner::from_slice(secret.as_ref()) {
                return Self::from_signer(&signer);
            }
        }
    }

    fn from_signer(signer: &PrivateKeySigner) -> Self {
        let public_key = hex::encode(signer.credential().verifying_key().to_sec1_bytes());
        let private_key = Zeroizing::new(format!("0x{}", hex::encode(signer.to_bytes())));
        Self {
            public_key: format!("0x{public_key}"),
            private_key,
        }
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
