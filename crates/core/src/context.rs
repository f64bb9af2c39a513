// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Execution context and the staleness guard around it.
//!
//! Long operations (encrypt, submit, decrypt) capture a snapshot of the
//! current context on entry and re-check it at defined checkpoints. The
//! environment may switch chains or contracts while an operation is
//! suspended; a mismatch aborts the operation cleanly instead of writing
//! against the wrong ledger.

use std::fmt;
use std::sync::{Arc, RwLock};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The (chain, contract) pair an operation is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub chain_id: u64,
    pub contract_address: Address,
}

impl ExecutionContext {
    pub fn new(chain_id: u64, contract_address: Address) -> Self {
        Self {
            chain_id,
            contract_address,
        }
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain {} @ {}", self.chain_id, self.contract_address)
    }
}

/// Shared cell holding the currently selected execution context.
///
/// Cloning shares the cell. There is no locking across an operation, only
/// snapshot-and-recheck.
#[derive(Debug, Clone)]
pub struct ContextHandle {
    inner: Arc<RwLock<ExecutionContext>>,
}

impl ContextHandle {
    pub fn new(context: ExecutionContext) -> Self {
        Self {
            inner: Arc::new(RwLock::new(context)),
        }
    }

    /// Capture the current context at operation entry.
    pub fn snapshot(&self) -> ExecutionContext {
        *self.inner.read().unwrap()
    }

    /// Replace the current context, e.g. on a wallet network switch.
    pub fn switch(&self, next: ExecutionContext) {
        *self.inner.write().unwrap() = next;
    }

    /// Checkpoint: fail if the context moved since `snapshot` was taken.
    pub fn ensure_unchanged(&self, snapshot: &ExecutionContext) -> Result<(), EngineError> {
        let current = self.snapshot();
        if current != *snapshot {
            return Err(EngineError::ContextChanged {
                expected: *snapshot,
                found: current,
            });
        }
        Ok(())
    }
}
