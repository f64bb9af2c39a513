// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::providers::fillers::BlobGasFiller;
use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::Address,
    providers::fillers::{
        ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller,
    },
    providers::{Identity, Provider, ProviderBuilder, RootProvider},
    signers::local::PrivateKeySigner,
    sol,
};
use eyre::Result;
use once_cell::sync::Lazy;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::Mutex;

static NONCE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Serializes nonce assignment across concurrent submissions on the same
/// signer.
pub async fn nonce_guard() -> tokio::sync::MutexGuard<'static, ()> {
    NONCE_LOCK.lock().await
}

pub async fn next_pending_nonce<P>(provider: &P, from: Address) -> eyre::Result<u64>
where
    P: Provider<Ethereum> + Send + Sync,
{
    provider
        .get_transaction_count(from)
        .pending()
        .await
        .map_err(Into::into)
}

sol! {
    #[derive(Debug)]
    #[sol(rpc)]
    contract SurveyVault {
        function submitSurvey(
            bytes32 stressLevel,
            bytes32 anxietyLevel,
            bytes32 moodScore,
            bytes32 sleepQuality,
            bytes32 energyLevel,
            bytes calldata inputProof
        ) external;
        function getSurveyCount(address user) external view returns (uint256);
        function getStressLevel(address user, uint256 index) external view returns (bytes32);
        function getAnxietyLevel(address user, uint256 index) external view returns (bytes32);
        function getMoodScore(address user, uint256 index) external view returns (bytes32);
        function getSleepQuality(address user, uint256 index) external view returns (bytes32);
        function getEnergyLevel(address user, uint256 index) external view returns (bytes32);
        function getSurveyTimestamp(address user, uint256 index) external view returns (uint256);
    }
}

/// Generic type to represent different provider types
pub trait ProviderType: Send {
    type Provider: Provider + Send + Sync + 'static;
}

/// Marker type for read-only provider
#[derive(Clone)]
pub struct ReadOnly;
impl ProviderType for ReadOnly {
    type Provider = VaultReadOnlyProvider;
}
/// Marker type for read-write provider
#[derive(Clone)]
pub struct ReadWrite;
impl ProviderType for ReadWrite {
    type Provider = VaultWriteProvider;
}

/// Generic SurveyVault contract handle
#[derive(Clone)]
pub struct SurveyVaultContract<T: ProviderType> {
    pub provider: Arc<T::Provider>,
    pub contract_address: Address,
    _marker: PhantomData<T>,
}

impl SurveyVaultContract<ReadWrite> {
    pub fn get_provider(&self) -> Arc<VaultWriteProvider> {
        self.provider.clone()
    }

    pub fn address(&self) -> &Address {
        &self.contract_address
    }
}

impl SurveyVaultContract<ReadOnly> {
    pub async fn read_only(
        http_rpc_url: &str,
        contract_address: &str,
    ) -> Result<SurveyVaultContract<ReadOnly>> {
        SurveyVaultFactory::create_read(http_rpc_url, contract_address).await
    }

    pub fn get_provider(&self) -> Arc<VaultReadOnlyProvider> {
        self.provider.clone()
    }

    pub fn address(&self) -> &Address {
        &self.contract_address
    }
}

/// Type alias for read-only provider
pub type VaultReadOnlyProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
>;

/// Type alias for read-write provider
pub type VaultWriteProvider = FillProvider<
    JoinFill<
        JoinFill<
            JoinFill<
                Identity,
                JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
            >,
            WalletFiller<EthereumWallet>,
        >,
        NonceFiller,
    >,
    RootProvider<Ethereum>,
    Ethereum,
>;

/// Type aliases for the two contract variants
pub type SurveyVaultReadContract = SurveyVaultContract<ReadOnly>;
pub type SurveyVaultWriteContract = SurveyVaultContract<ReadWrite>;

// Factory for creating contract instances
pub struct SurveyVaultFactory;

impl SurveyVaultFactory {
    /// Create a write-capable contract
    pub async fn create_write(
        http_rpc_url: &str,
        contract_address: &str,
        private_key: &str,
    ) -> Result<SurveyVaultContract<ReadWrite>> {
        let contract_address = contract_address.parse()?;

        let signer: PrivateKeySigner = private_key.parse()?;
        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .with_cached_nonce_management()
            .connect(http_rpc_url)
            .await?;

        Ok(SurveyVaultContract::<ReadWrite> {
            provider: Arc::new(provider),
            contract_address,
            _marker: PhantomData,
        })
    }

    /// Create a read-only contract
    pub async fn create_read(
        http_rpc_url: &str,
        contract_address: &str,
    ) -> Result<SurveyVaultContract<ReadOnly>> {
        let contract_address = contract_address.parse()?;

        let provider = ProviderBuilder::new().connect(http_rpc_url).await?;

        Ok(SurveyVaultContract::<ReadOnly> {
            provider: Arc::new(provider),
            contract_address,
            _marker: PhantomData,
        })
    }
}
