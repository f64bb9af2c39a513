// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::time::Duration;

use alloy::primitives::{Address, B256, U256};
use alloy::providers::Provider;
use async_trait::async_trait;
use cipherwell_core::{CiphertextHandle, EncryptedSubmission, SurveyField};
use eyre::{eyre, Result};
use tokio::time::sleep;
use tracing::info;

use crate::contracts::{
    next_pending_nonce, nonce_guard, ProviderType, ReadWrite, SurveyVault, SurveyVaultContract,
    SurveyVaultFactory,
};

const CONFIRMATION_POLL_MS: u64 = 500;
// Two minutes at the poll cadence.
const CONFIRMATION_MAX_POLLS: u32 = 240;

/// A submission that has been broadcast but not yet mined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingSubmission {
    pub tx_hash: B256,
}

/// A submission that has been mined successfully.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
}

/// Read access to the per-user survey history on the vault.
#[async_trait]
pub trait SurveyRead: Send + Sync + 'static {
    async fn get_survey_count(&self, user: Address) -> Result<u64>;
    async fn get_field_handle(
        &self,
        user: Address,
        index: u64,
        field: SurveyField,
    ) -> Result<CiphertextHandle>;
    async fn get_survey_timestamp(&self, user: Address, index: u64) -> Result<u64>;
}

/// Write access for recording an encrypted survey on the vault.
///
/// Broadcast and confirmation are split so a caller can report the
/// transaction hash as soon as it is out, then wait for the receipt.
#[async_trait]
pub trait SubmissionGateway: Send + Sync + 'static {
    async fn submit(&self, submission: EncryptedSubmission) -> Result<PendingSubmission>;
    async fn await_confirmation(&self, pending: PendingSubmission) -> Result<SubmissionReceipt>;
}

#[async_trait]
impl<T: ProviderType + Send + Sync + 'static> SurveyRead for SurveyVaultContract<T> {
    async fn get_survey_count(&self, user: Address) -> Result<u64> {
        let contract = SurveyVault::new(self.contract_address, &self.provider);
        let count = contract.getSurveyCount(user).call().await?;
        u64::try_from(count).map_err(|_| eyre!("survey count exceeds u64 range"))
    }

    async fn get_field_handle(
        &self,
        user: Address,
        index: u64,
        field: SurveyField,
    ) -> Result<CiphertextHandle> {
        let contract = SurveyVault::new(self.contract_address, &self.provider);
        let index = U256::from(index);
        let handle = match field {
            SurveyField::Stress => contract.getStressLevel(user, index).call().await?,
            SurveyField::Anxiety => contract.getAnxietyLevel(user, index).call().await?,
            SurveyField::Mood => contract.getMoodScore(user, index).call().await?,
            SurveyField::Sleep => contract.getSleepQuality(user, index).call().await?,
            SurveyField::Energy => contract.getEnergyLevel(user, index).call().await?,
        };
        Ok(CiphertextHandle::from(handle))
    }

    async fn get_survey_timestamp(&self, user: Address, index: u64) -> Result<u64> {
        let contract = SurveyVault::new(self.contract_address, &self.provider);
        let timestamp = contract
            .getSurveyTimestamp(user, U256::from(index))
            .call()
            .await?;
        u64::try_from(timestamp).map_err(|_| eyre!("survey timestamp exceeds u64 range"))
    }
}

/// Contract-backed [`SubmissionGateway`] for a single signing account.
pub struct VaultSubmissionGateway {
    contract: SurveyVaultContract<ReadWrite>,
    from: Address,
}

impl VaultSubmissionGateway {
    pub fn new(contract: SurveyVaultContract<ReadWrite>, from: Address) -> Self {
        Self { contract, from }
    }

    /// Connect a write-capable gateway over an http rpc endpoint.
    pub async fn connect(
        http_rpc_url: &str,
        contract_address: &str,
        private_key: &str,
    ) -> Result<Self> {
        let signer: alloy::signers::local::PrivateKeySigner = private_key.parse()?;
        let from = signer.address();
        let contract =
            SurveyVaultFactory::create_write(http_rpc_url, contract_address, private_key).await?;
        Ok(Self::new(contract, from))
    }

    pub fn from_address(&self) -> Address {
        self.from
    }
}

#[async_trait]
impl SubmissionGateway for VaultSubmissionGateway {
    async fn submit(&self, submission: EncryptedSubmission) -> Result<PendingSubmission> {
        let _guard = nonce_guard().await;
        let nonce = next_pending_nonce(&*self.contract.provider, self.from).await?;
        let contract = SurveyVault::new(self.contract.contract_address, &self.contract.provider);
        let [stress, anxiety, mood, sleep_quality, energy] =
            submission.handles().map(|handle| handle.inner());
        let builder = contract
            .submitSurvey(
                stress,
                anxiety,
                mood,
                sleep_quality,
                energy,
                submission.proof().clone(),
            )
            .nonce(nonce);
        let pending = builder.send().await?;
        let tx_hash = *pending.tx_hash();
        info!(tx=%tx_hash, "survey submission broadcast");
        Ok(PendingSubmission { tx_hash })
    }

    async fn await_confirmation(&self, pending: PendingSubmission) -> Result<SubmissionReceipt> {
        let mut polls = 0u32;
        loop {
            if let Some(receipt) = self
                .contract
                .provider
                .get_transaction_receipt(pending.tx_hash)
                .await?
            {
                if !receipt.status() {
                    return Err(eyre!("survey submission {} reverted", pending.tx_hash));
                }
                info!(tx=%receipt.transaction_hash, "survey submission confirmed");
                return Ok(SubmissionReceipt {
                    tx_hash: receipt.transaction_hash,
                    block_number: receipt.block_number,
                });
            }
            polls += 1;
            if polls >= CONFIRMATION_MAX_POLLS {
                return Err(eyre!(
                    "no receipt for survey submission {} after {}ms",
                    pending.tx_hash,
                    u64::from(CONFIRMATION_MAX_POLLS) * CONFIRMATION_POLL_MS
                ));
            }
            sleep(Duration::from_millis(CONFIRMATION_POLL_MS)).await;
        }
    }
}
