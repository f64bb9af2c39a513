// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use chrono::Utc;
use cipherwell_auth::DecryptionAuthorization;
use cipherwell_core::{
    CiphertextHandle, EngineError, HandleContractPair, SurveyField, SurveyRecord,
};
use std::collections::HashMap;
use tracing::debug;

use crate::{DecryptionOracle, UserDecryptRequest};

/// Decrypt a batch of ciphertext handles under an existing authorization.
///
/// Preconditions are checked before the oracle is contacted: the grant must
/// be valid right now and must cover every pair's contract. The call is
/// all-or-nothing; on any failure no plaintext is returned and the caller's
/// state stays as it was.
pub async fn decrypt_batch(
    oracle: &dyn DecryptionOracle,
    pairs: Vec<HandleContractPair>,
    auth: &DecryptionAuthorization,
) -> Result<HashMap<CiphertextHandle, u64>, EngineError> {
    let now = Utc::now().timestamp();
    if !auth.is_valid_at(now) {
        return Err(EngineError::Authorization(
            "decryption authorization is not currently valid".into(),
        ));
    }
    for pair in &pairs {
        if !auth.covers_contract(&pair.contract_address) {
            return Err(EngineError::Authorization(format!(
                "contract {} is not covered by the authorization",
                pair.contract_address
            )));
        }
    }

    let request = UserDecryptRequest {
        pairs,
        private_key: auth.private_key.clone(),
        public_key: auth.public_key.clone(),
        signature: strip_hex_prefix(&auth.signature).to_string(),
        user_address: auth.user_address,
        start_timestamp: auth.start_timestamp,
        duration_days: auth.duration_days,
        contract_addresses: auth.contract_addresses.clone(),
    };

    let plaintexts = oracle
        .user_decrypt(&request)
        .await
        .map_err(EngineError::decryption)?;
    debug!(handles = plaintexts.len(), "decrypted ciphertext batch");
    Ok(plaintexts)
}

/// Map decrypted plaintexts back onto a survey record.
///
/// `handles` lists the five field handles in canonical order. Every field
/// must have a plaintext and every plaintext must be a legal field value.
pub fn reconcile(
    handles: &[CiphertextHandle; SurveyField::COUNT],
    plaintexts: &HashMap<CiphertextHandle, u64>,
) -> Result<SurveyRecord, EngineError> {
    let mut values = [0u64; SurveyField::COUNT];
    for (field, handle) in SurveyField::ALL.iter().zip(handles) {
        let Some(value) = plaintexts.get(handle) else {
            return Err(EngineError::decryption(format!(
                "missing plaintext for {field}"
            )));
        };
        values[field.index()] = *value;
    }
    SurveyRecord::from_values(values).map_err(EngineError::decryption)
}

fn strip_hex_prefix(value: &str) -> &str {
    value.strip_prefix("0x").unwrap_or(value)
}
