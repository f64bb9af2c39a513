// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! End-to-end engine flows against an in-process vault.
//!
//! `FakeVault` plays every external collaborator at once: it encrypts by
//! allocating fresh handles over a plaintext table, stages submissions
//! until confirmation, serves reads from its stored surveys and decrypts
//! exactly what was submitted. The engine under test cannot tell it apart
//! from the real ledger plus coprocessor, so a submit/decrypt round trip
//! exercises the entire pipeline.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, Bytes, B256};
use anyhow::Result;
use async_trait::async_trait;
use cipherwell_auth::{AuthorizationPayload, AuthorizationSigner, LocalAuthorizationSigner, SignerError};
use cipherwell_config::{load_config, AuthorizationPolicy};
use cipherwell_core::{
    CiphertextHandle, ContextHandle, EncryptedSubmission, EngineError, ExecutionContext,
    RawSurveyInput, SurveyField,
};
use cipherwell_decrypt::{DecryptionOracle, OracleError, UserDecryptRequest};
use cipherwell_encryptor::{EncryptError, EncryptionBackend, EncryptionRequest};
use cipherwell_engine::{DecryptPhase, SurveyEngine};
use cipherwell_evm::{PendingSubmission, SubmissionGateway, SubmissionReceipt, SurveyRead};
use cipherwell_store::{InMemStore, SharedStore};

const VAULT_ADDR: Address =
    alloy::primitives::address!("0x1111111111111111111111111111111111111111");
const CHAIN_ID: u64 = 31337;
// Deterministic test key
const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[derive(Clone)]
struct StoredSurvey {
    handles: [CiphertextHandle; SurveyField::COUNT],
    timestamp: u64,
}

#[derive(Default)]
struct VaultState {
    surveys: Vec<StoredSurvey>,
    staged: HashMap<B256, [CiphertextHandle; SurveyField::COUNT]>,
    ciphertexts: HashMap<CiphertextHandle, u64>,
    ledger_time: u64,
    handle_counter: u8,
    tx_counter: u8,
    failing_encrypts: u32,
    encrypt_error: String,
    seen_decrypts: Vec<UserDecryptRequest>,
}

/// Ledger and coprocessor in one: every collaborator trait backed by the
/// same shared state.
#[derive(Clone, Default)]
struct FakeVault {
    state: Arc<Mutex<VaultState>>,
}

impl FakeVault {
    fn set_ledger_time(&self, time: u64) {
        self.state.lock().unwrap().ledger_time = time;
    }

    fn fail_encrypts(&self, attempts: u32, message: &str) {
        let mut state = self.state.lock().unwrap();
        state.failing_encrypts = attempts;
        state.encrypt_error = message.to_string();
    }

    fn survey_count(&self) -> usize {
        self.state.lock().unwrap().surveys.len()
    }

    fn seen_decrypts(&self) -> Vec<UserDecryptRequest> {
        self.state.lock().unwrap().seen_decrypts.clone()
    }
}

#[async_trait]
impl EncryptionBackend for FakeVault {
    async fn encrypt(
        &self,
        request: &EncryptionRequest,
    ) -> std::result::Result<EncryptedSubmission, EncryptError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_encrypts > 0 {
            state.failing_encrypts -= 1;
            return Err(EncryptError::Backend(state.encrypt_error.clone()));
        }
        let mut handles = [CiphertextHandle::from([0u8; 32]); SurveyField::COUNT];
        for (slot, value) in handles.iter_mut().zip(request.values) {
            state.handle_counter += 1;
            let handle = CiphertextHandle::from(B256::repeat_byte(state.handle_counter));
            state.ciphertexts.insert(handle, value as u64);
            *slot = handle;
        }
        Ok(EncryptedSubmission::new(handles, Bytes::from(vec![0xf0; 4])))
    }
}

#[async_trait]
impl SubmissionGateway for FakeVault {
    async fn submit(&self, submission: EncryptedSubmission) -> eyre::Result<PendingSubmission> {
        let mut state = self.state.lock().unwrap();
        state.tx_counter += 1;
        let tx_hash = B256::with_last_byte(state.tx_counter);
        state.staged.insert(tx_hash, *submission.handles());
        Ok(PendingSubmission { tx_hash })
    }

    async fn await_confirmation(
        &self,
        pending: PendingSubmission,
    ) -> eyre::Result<SubmissionReceipt> {
        let mut state = self.state.lock().unwrap();
        let handles = state
            .staged
            .remove(&pending.tx_hash)
            .ok_or_else(|| eyre::eyre!("unknown transaction {}", pending.tx_hash))?;
        let timestamp = state.ledger_time;
        state.surveys.push(StoredSurvey { handles, timestamp });
        Ok(SubmissionReceipt {
            tx_hash: pending.tx_hash,
            block_number: Some(state.surveys.len() as u64),
        })
    }
}

#[async_trait]
impl SurveyRead for FakeVault {
    async fn get_survey_count(&self, _user: Address) -> eyre::Result<u64> {
        Ok(self.state.lock().unwrap().surveys.len() as u64)
    }

    async fn get_field_handle(
        &self,
        _user: Address,
        index: u64,
        field: SurveyField,
    ) -> eyre::Result<CiphertextHandle> {
        let state = self.state.lock().unwrap();
        let survey = state
            .surveys
            .get(index as usize)
            .ok_or_else(|| eyre::eyre!("no survey at index {index}"))?;
        Ok(survey.handles[field.index()])
    }

    async fn get_survey_timestamp(&self, _user: Address, index: u64) -> eyre::Result<u64> {
        let state = self.state.lock().unwrap();
        let survey = state
            .surveys
            .get(index as usize)
            .ok_or_else(|| eyre::eyre!("no survey at index {index}"))?;
        Ok(survey.timestamp)
    }
}

#[async_trait]
impl DecryptionOracle for FakeVault {
    async fn user_decrypt(
        &self,
        request: &UserDecryptRequest,
    ) -> std::result::Result<HashMap<CiphertextHandle, u64>, OracleError> {
        let mut state = self.state.lock().unwrap();
        state.seen_decrypts.push(request.clone());
        if request.signature.starts_with("0x") {
            return Err(OracleError::Rejected("signature must not be prefixed".into()));
        }
        let mut plaintexts = HashMap::new();
        for pair in &request.pairs {
            let value = state
                .ciphertexts
                .get(&pair.handle)
                .ok_or_else(|| OracleError::Rejected("unknown ciphertext handle".into()))?;
            plaintexts.insert(pair.handle, *value);
        }
        Ok(plaintexts)
    }
}

/// Counts interactive prompts around the real local signer.
struct CountingSigner {
    inner: LocalAuthorizationSigner,
    calls: AtomicU32,
}

impl CountingSigner {
    fn new(inner: LocalAuthorizationSigner) -> Self {
        Self {
            inner,
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthorizationSigner for CountingSigner {
    async fn sign_authorization(
        &self,
        payload: &AuthorizationPayload,
    ) -> std::result::Result<String, SignerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.sign_authorization(payload).await
    }
}

fn build_engine(
    vault: &FakeVault,
    signer: Arc<CountingSigner>,
    context: ExecutionContext,
    policy: AuthorizationPolicy,
) -> SurveyEngine<SharedStore<InMemStore>> {
    let account = LocalAuthorizationSigner::from_private_key(DEV_KEY)
        .unwrap()
        .address();
    let vault = Arc::new(vault.clone());
    SurveyEngine::new(
        account,
        ContextHandle::new(context),
        vault.clone(),
        vault.clone(),
        vault.clone(),
        signer,
        vault,
        SharedStore::from_store(InMemStore::default()),
        policy,
    )
}

fn dev_signer() -> Arc<CountingSigner> {
    Arc::new(CountingSigner::new(
        LocalAuthorizationSigner::from_private_key(DEV_KEY).unwrap(),
    ))
}

fn default_context() -> ExecutionContext {
    ExecutionContext::new(CHAIN_ID, VAULT_ADDR)
}

fn checkin(stress: &str, anxiety: &str, mood: &str, sleep: &str, energy: &str) -> RawSurveyInput {
    RawSurveyInput::new(stress, anxiety, mood, sleep, energy)
}

#[tokio::test(start_paused = true)]
async fn submitted_record_round_trips_through_authorized_decryption() -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};
    let subscriber = fmt()
        .with_env_filter(EnvFilter::new("info"))
        .with_test_writer()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let vault = FakeVault::default();
    vault.set_ledger_time(1_700_000_100);
    let signer = dev_signer();
    let mut engine = build_engine(
        &vault,
        signer.clone(),
        default_context(),
        AuthorizationPolicy::default(),
    );

    // Submit one check-in.
    let receipt = engine
        .submit_survey(&checkin("80", "60", "40", "20", "10"))
        .await?;
    assert_eq!(receipt.block_number, Some(1));
    assert_eq!(engine.last_known_count(), 1);
    assert_eq!(vault.survey_count(), 1);

    // Read it back through authorization and decryption.
    let entry = engine.decrypt_record(0).await?;
    assert_eq!(entry.record.values(), [80, 60, 40, 20, 10]);
    assert_eq!(entry.submitted_at, 1_700_000_100);
    assert_eq!(engine.decrypt_phase(), DecryptPhase::Cached);
    assert_eq!(engine.cached_record(0), Some(&entry));

    // Exactly one wallet prompt, and the oracle saw a bare signature.
    assert_eq!(signer.calls(), 1);
    let seen = vault.seen_decrypts();
    assert_eq!(seen.len(), 1);
    assert!(!seen[0].signature.starts_with("0x"));
    assert_eq!(seen[0].duration_days, 7);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn transient_relay_failures_are_retried_on_the_backoff_schedule() -> Result<()> {
    let vault = FakeVault::default();
    vault.fail_encrypts(2, "relayer under load");
    let mut engine = build_engine(
        &vault,
        dev_signer(),
        default_context(),
        AuthorizationPolicy::default(),
    );

    let start = tokio::time::Instant::now();
    engine
        .submit_survey(&checkin("50", "50", "50", "50", "50"))
        .await?;

    // Two failed attempts wait 2s then 4s; confirmation is immediate and
    // the count refresh adds its own 2s propagation window.
    assert_eq!(start.elapsed(), Duration::from_secs(8));
    assert_eq!(engine.last_known_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn relay_exhaustion_surfaces_the_classified_error_and_writes_nothing() {
    let vault = FakeVault::default();
    vault.fail_encrypts(3, "503 Service Unavailable");
    let mut engine = build_engine(
        &vault,
        dev_signer(),
        default_context(),
        AuthorizationPolicy::default(),
    );

    let start = tokio::time::Instant::now();
    let err = engine
        .submit_survey(&checkin("50", "50", "50", "50", "50"))
        .await
        .unwrap_err();

    // No wait after the final attempt.
    assert_eq!(start.elapsed(), Duration::from_secs(6));
    match err {
        EngineError::Encryption {
            kind,
            attempts,
            reason,
        } => {
            assert_eq!(kind, cipherwell_core::EncryptFailureKind::RelayService);
            assert_eq!(attempts, 3);
            assert!(reason.contains("Service Unavailable"));
        }
        other => panic!("expected an encryption error, got {other}"),
    }
    assert_eq!(vault.survey_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn one_authorization_covers_the_whole_session() -> Result<()> {
    let vault = FakeVault::default();
    vault.set_ledger_time(1_700_000_200);
    let signer = dev_signer();
    let mut engine = build_engine(
        &vault,
        signer.clone(),
        default_context(),
        AuthorizationPolicy::default(),
    );

    engine
        .submit_survey(&checkin("10", "20", "30", "40", "50"))
        .await?;
    engine
        .submit_survey(&checkin("11", "21", "31", "41", "51"))
        .await?;
    assert_eq!(engine.last_known_count(), 2);

    let first = engine.decrypt_record(0).await?;
    let second = engine.decrypt_record(1).await?;

    assert_eq!(first.record.values(), [10, 20, 30, 40, 50]);
    assert_eq!(second.record.values(), [11, 21, 31, 41, 51]);
    assert_eq!(signer.calls(), 1);
    assert_eq!(engine.cache().len(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn config_file_drives_the_context_and_authorization_policy() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cipherwell.config.yaml");
    std::fs::write(
        &path,
        r#"
chains:
  - name: "hardhat"
    rpc_url: "ws://localhost:8545"
    chain_id: 31337
    contracts:
      survey: "0x1111111111111111111111111111111111111111"
authorization:
  duration_days: 14
"#,
    )?;

    let config = load_config(Some(&path))?;
    let context = config.execution_context("hardhat")?;
    assert_eq!(context.chain_id, CHAIN_ID);
    assert_eq!(context.contract_address, VAULT_ADDR);

    let vault = FakeVault::default();
    vault.set_ledger_time(1_700_000_300);
    let mut engine = build_engine(
        &vault,
        dev_signer(),
        context,
        config.authorization().clone(),
    );

    engine
        .submit_survey(&checkin("70", "70", "70", "70", "70"))
        .await?;
    engine.decrypt_record(0).await?;

    // The configured window flows through to the decryption request.
    assert_eq!(vault.seen_decrypts()[0].duration_days, 14);
    Ok(())
}
