// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use chrono::Utc;
use cipherwell_core::EngineError;
use cipherwell_store::DataStore;
use rand::rngs::OsRng;
use tracing::{debug, info};

use crate::{
    AuthorizationPayload, AuthorizationSigner, DecryptionAuthorization, Keypair, SignerError,
};

pub struct StoreKeys;

impl StoreKeys {
    /// Key for the cached authorization of one user over one contract set.
    /// The set is sorted so the key is independent of the caller's order.
    pub fn authorization(user: &Address, contracts: &[Address]) -> String {
        let mut set = contracts.to_vec();
        set.sort();
        set.dedup();
        let set = set
            .iter()
            .map(|contract| hex::encode(contract.as_slice()))
            .collect::<Vec<_>>()
            .join("-");
        format!("//authorization/{}/{}", hex::encode(user.as_slice()), set)
    }
}

/// Caches signed decryption authorizations and mints new ones on demand.
///
/// Minting costs exactly one interactive signature. A cached grant that is
/// still valid is returned without touching the signer at all.
pub struct AuthorizationManager<S: DataStore> {
    store: S,
    duration_days: u64,
}

impl<S: DataStore> AuthorizationManager<S> {
    pub fn new(store: S, duration_days: u64) -> Self {
        Self {
            store,
            duration_days,
        }
    }

    pub async fn load_or_sign(
        &mut self,
        signer: &dyn AuthorizationSigner,
        user: Address,
        contracts: &[Address],
    ) -> Result<DecryptionAuthorization, EngineError> {
        let key = StoreKeys::authorization(&user, contracts);
        let cached: Option<DecryptionAuthorization> = self
            .store
            .get(&key)
            .await
            .map_err(|err| EngineError::Authorization(err.to_string()))?;

        let now = Utc::now().timestamp();
        if let Some(auth) = cached {
            if auth.is_valid_at(now) {
                debug!(
                    expires_at = auth.expires_at(),
                    "using cached decryption authorization"
                );
                return Ok(auth);
            }
            info!("cached decryption authorization expired, requesting a new one");
        }

        let keypair = Keypair::generate(&mut OsRng);
        let payload = AuthorizationPayload::new(
            keypair.public_key(),
            contracts.to_vec(),
            now,
            self.duration_days,
        );

        info!(
            user = %user,
            contracts = payload.contract_addresses.len(),
            duration_days = self.duration_days,
            "requesting decryption authorization signature"
        );
        let signature = signer
            .sign_authorization(&payload)
            .await
            .map_err(|err| match err {
                SignerError::Unavailable(reason) => EngineError::SigningUnavailable(reason),
                SignerError::Rejected(reason) => EngineError::Authorization(reason),
            })?;

        let auth = DecryptionAuthorization::new(
            keypair.private_key(),
            keypair.public_key(),
            signature,
            payload.contract_addresses.clone(),
            user,
            payload.start_timestamp,
            payload.duration_days,
        );
        self.store
            .insert(&key, &auth)
            .await
            .map_err(|err| EngineError::Authorization(err.to_string()))?;
        Ok(auth)
    }
}
