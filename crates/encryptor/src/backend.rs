// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use async_trait::async_trait;
use thiserror::Error;

use cipherwell_core::{EncryptedSubmission, SurveyField};

/// Input to one encryption attempt: plaintext field values in canonical
/// order, bound to the (account, contract) pair the proof must commit to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionRequest {
    pub contract_address: Address,
    pub user_address: Address,
    pub values: [u8; SurveyField::COUNT],
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncryptError {
    /// The builder was not given exactly one value per field.
    #[error("expected {expected} field values, got {got}")]
    WrongFieldCount { expected: usize, got: usize },
    /// The backend rejected or failed the attempt.
    #[error("{0}")]
    Backend(String),
}

/// External collaborator performing the homomorphic encryption. Real
/// implementations call out over the network; tests script responses.
#[async_trait]
pub trait EncryptionBackend: Send + Sync + 'static {
    async fn encrypt(
        &self,
        request: &EncryptionRequest,
    ) -> Result<EncryptedSubmission, EncryptError>;
}
