// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use chrono::Utc;
use cipherwell_auth::{AuthorizationManager, AuthorizationSigner};
use cipherwell_config::AuthorizationPolicy;
use cipherwell_core::{
    validate_input, ContextHandle, EngineError, ExecutionContext, HandleContractPair,
    RawSurveyInput, SurveyField,
};
use cipherwell_decrypt::{
    decrypt_batch, reconcile, DecryptedRecord, DecryptionOracle, RecordCache,
};
use cipherwell_encryptor::{encrypt_with_retry, EncryptionBackend, InputBuilder};
use cipherwell_evm::{SubmissionGateway, SubmissionReceipt, SurveyRead};
use cipherwell_store::DataStore;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::DecryptPhase;

// Ledger state propagation window before the count re-read.
pub const COUNT_REFRESH_DELAY_MS: u64 = 2000;

/// Orchestrates one user session against one vault.
///
/// All session state lives here: nothing about the current account,
/// context, cache or count is ambient. Operations take `&mut self`; one
/// logical operation runs at a time.
pub struct SurveyEngine<S: DataStore> {
    account: Address,
    context: ContextHandle,
    backend: Arc<dyn EncryptionBackend>,
    gateway: Arc<dyn SubmissionGateway>,
    reader: Arc<dyn SurveyRead>,
    signer: Arc<dyn AuthorizationSigner>,
    oracle: Arc<dyn DecryptionOracle>,
    authorizations: AuthorizationManager<S>,
    cache: RecordCache,
    last_known_count: u64,
    decrypt_phase: DecryptPhase,
}

impl<S: DataStore> SurveyEngine<S> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account: Address,
        context: ContextHandle,
        backend: Arc<dyn EncryptionBackend>,
        gateway: Arc<dyn SubmissionGateway>,
        reader: Arc<dyn SurveyRead>,
        signer: Arc<dyn AuthorizationSigner>,
        oracle: Arc<dyn DecryptionOracle>,
        store: S,
        authorization: AuthorizationPolicy,
    ) -> Self {
        Self {
            account,
            context,
            backend,
            gateway,
            reader,
            signer,
            oracle,
            authorizations: AuthorizationManager::new(store, authorization.duration_days),
            cache: RecordCache::default(),
            last_known_count: 0,
            decrypt_phase: DecryptPhase::Idle,
        }
    }

    pub fn account(&self) -> Address {
        self.account
    }

    /// Shared handle to the current execution context.
    pub fn context_handle(&self) -> ContextHandle {
        self.context.clone()
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    pub fn cached_record(&self, index: u64) -> Option<&DecryptedRecord> {
        self.cache.get(index)
    }

    pub fn last_known_count(&self) -> u64 {
        self.last_known_count
    }

    pub fn decrypt_phase(&self) -> DecryptPhase {
        self.decrypt_phase
    }

    /// Point the session at a different chain or vault.
    ///
    /// Cached records and the known count are scoped to a context, so both
    /// are dropped with the old one.
    pub fn switch_context(&mut self, next: ExecutionContext) {
        info!(context = %next, "switching execution context");
        self.context.switch(next);
        self.cache = RecordCache::default();
        self.last_known_count = 0;
        self.decrypt_phase = DecryptPhase::Idle;
    }

    /// Validate, encrypt and record one check-in on the vault.
    ///
    /// Validation happens before any ciphertext is produced; a stale
    /// context aborts before any ledger write. After confirmation the
    /// authoritative count is re-read once the propagation window passed.
    pub async fn submit_survey(
        &mut self,
        input: &RawSurveyInput,
    ) -> Result<SubmissionReceipt, EngineError> {
        let record = validate_input(input)?;
        let snapshot = self.context.snapshot();

        let mut builder = InputBuilder::new(
            self.backend.clone(),
            snapshot.contract_address,
            self.account,
        );
        builder.add_record(&record);
        let submission = encrypt_with_retry(&builder, &self.context, &snapshot).await?;

        let pending = self
            .gateway
            .submit(submission)
            .await
            .map_err(EngineError::ledger)?;
        info!(tx = %pending.tx_hash, "survey submission broadcast");

        let receipt = self
            .gateway
            .await_confirmation(pending)
            .await
            .map_err(EngineError::ledger)?;
        info!(tx = %receipt.tx_hash, block = ?receipt.block_number, "survey submission confirmed");

        sleep(Duration::from_millis(COUNT_REFRESH_DELAY_MS)).await;
        self.refresh_count().await?;
        Ok(receipt)
    }

    /// Fetch, authorize and decrypt the record at a submission index.
    ///
    /// On success the result is cached under that index; on failure the
    /// cache keeps whatever it held before. Decryption is not retried.
    pub async fn decrypt_record(&mut self, index: u64) -> Result<DecryptedRecord, EngineError> {
        let snapshot = self.context.snapshot();
        match self.run_decrypt(index, &snapshot).await {
            Ok(entry) => {
                self.cache.insert(index, entry);
                self.set_phase(DecryptPhase::Cached);
                info!(index, "record decrypted");
                Ok(entry)
            }
            Err(err) => {
                self.set_phase(DecryptPhase::Failed);
                warn!(index, error = %err, "record decryption failed");
                Err(err)
            }
        }
    }

    /// Re-read the authoritative submission count for this account.
    pub async fn refresh_count(&mut self) -> Result<u64, EngineError> {
        let count = self
            .reader
            .get_survey_count(self.account)
            .await
            .map_err(EngineError::ledger)?;
        if count != self.last_known_count {
            debug!(previous = self.last_known_count, count, "survey count updated");
        }
        self.last_known_count = count;
        Ok(count)
    }

    async fn run_decrypt(
        &mut self,
        index: u64,
        snapshot: &ExecutionContext,
    ) -> Result<DecryptedRecord, EngineError> {
        let contract = snapshot.contract_address;

        self.set_phase(DecryptPhase::FetchingHandles);
        let reader = self.reader.clone();
        let (stress, anxiety, mood, sleep_quality, energy, ledger_timestamp) = tokio::try_join!(
            reader.get_field_handle(self.account, index, SurveyField::Stress),
            reader.get_field_handle(self.account, index, SurveyField::Anxiety),
            reader.get_field_handle(self.account, index, SurveyField::Mood),
            reader.get_field_handle(self.account, index, SurveyField::Sleep),
            reader.get_field_handle(self.account, index, SurveyField::Energy),
            reader.get_survey_timestamp(self.account, index),
        )
        .map_err(EngineError::ledger)?;
        let handles = [stress, anxiety, mood, sleep_quality, energy];

        self.set_phase(DecryptPhase::AwaitingAuthorization);
        let signer = self.signer.clone();
        let auth = self
            .authorizations
            .load_or_sign(signer.as_ref(), self.account, &[contract])
            .await?;

        self.set_phase(DecryptPhase::Decrypting);
        let pairs = handles
            .iter()
            .map(|handle| HandleContractPair::new(*handle, contract))
            .collect();
        let plaintexts = decrypt_batch(self.oracle.as_ref(), pairs, &auth).await?;
        let record = reconcile(&handles, &plaintexts)?;

        // A context switched mid-flight belongs to a different session.
        self.context.ensure_unchanged(snapshot)?;

        let retrieved_at = Utc::now().timestamp();
        Ok(DecryptedRecord::new(record, ledger_timestamp, retrieved_at))
    }

    fn set_phase(&mut self, next: DecryptPhase) {
        if self.decrypt_phase != next {
            debug!(from = %self.decrypt_phase, to = %next, "decrypt phase");
        }
        self.decrypt_phase = next;
    }
}
