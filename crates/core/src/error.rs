// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Engine-wide error taxonomy.
//!
//! Every failure an operation can surface maps onto exactly one variant
//! here. Reasons are carried verbatim from the failing collaborator; no
//! error escalates beyond the operation that triggered it.

use std::fmt;

use thiserror::Error;

use crate::context::ExecutionContext;
use crate::validate::ValidationError;

/// Classification of an encryption failure, decided by matching the
/// failure message against known relay-outage patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptFailureKind {
    /// The relay service fronting the encryption backend was unreachable
    /// or refused service.
    RelayService,
    /// Any other failure.
    Generic,
}

impl fmt::Display for EncryptFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncryptFailureKind::RelayService => write!(f, "relay service"),
            EncryptFailureKind::Generic => write!(f, "generic"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// Input rejected before anything was encrypted. Recoverable by the
    /// user correcting the form.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The execution context moved between snapshot and checkpoint. The
    /// operation aborted without partial state.
    #[error("execution context changed: expected {expected}, found {found}")]
    ContextChanged {
        expected: ExecutionContext,
        found: ExecutionContext,
    },

    /// Encryption failed after exhausting all retry attempts.
    #[error("encryption failed after {attempts} attempt(s) ({kind}): {reason}")]
    Encryption {
        kind: EncryptFailureKind,
        attempts: u32,
        reason: String,
    },

    /// The signer collaborator is not available. Terminal; never retried.
    #[error("signer unavailable: {0}")]
    SigningUnavailable(String),

    /// Minting or loading a decryption authorization failed.
    #[error("authorization failed: {0}")]
    Authorization(String),

    /// A ledger read, submission or confirmation failed.
    #[error("ledger error: {0}")]
    Ledger(String),

    /// Authorized decryption failed for one submission index. The record
    /// cache is left untouched.
    #[error("decryption failed: {0}")]
    Decryption(String),
}

impl EngineError {
    pub fn ledger(err: impl fmt::Display) -> Self {
        EngineError::Ledger(err.to_string())
    }

    pub fn decryption(err: impl fmt::Display) -> Self {
        EngineError::Decryption(err.to_string())
    }
}
