// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use tokio::time::{sleep, Duration};
use tracing::info;

use cipherwell_core::{
    ContextHandle, EncryptFailureKind, EncryptedSubmission, EngineError, ExecutionContext,
};

use crate::InputBuilder;

pub const RETRY_MAX_ATTEMPTS: u32 = 3;
pub const RETRY_INITIAL_DELAY_MS: u64 = 2000;

/// Failure-message fragments that identify a relay-service outage.
pub const RELAY_ERROR_NEEDLES: [&str; 3] = ["relayer", "service unavailable", "bad gateway"];

/// Match the failure message against the relay needle list,
/// case-insensitively.
pub fn classify_failure(error: &str) -> EncryptFailureKind {
    let lowered = error.to_lowercase();
    if RELAY_ERROR_NEEDLES
        .iter()
        .any(|needle| lowered.contains(needle))
    {
        EncryptFailureKind::RelayService
    } else {
        EncryptFailureKind::Generic
    }
}

/// Drive the builder's encryption with bounded exponential backoff.
///
/// The context is checked before the first attempt and again after a
/// success; a mismatch aborts the operation and the fresh ciphertext is
/// dropped. Failed attempts wait 2s then 4s; there is no wait after the
/// final failure, which is surfaced with its classification and the
/// attempt count.
pub async fn encrypt_with_retry(
    builder: &InputBuilder,
    context: &ContextHandle,
    snapshot: &ExecutionContext,
) -> Result<EncryptedSubmission, EngineError> {
    context.ensure_unchanged(snapshot)?;

    let mut attempts = 0;
    let mut delay = RETRY_INITIAL_DELAY_MS;

    loop {
        attempts += 1;
        // Let queued tasks run before the CPU-bound encryption step
        tokio::task::yield_now().await;

        match builder.encrypt().await {
            Ok(submission) => {
                context.ensure_unchanged(snapshot)?;
                return Ok(submission);
            }
            Err(e) => {
                if attempts < RETRY_MAX_ATTEMPTS {
                    info!(
                        "encrypt: error (attempt {}/{}), will retry after {}ms: {}",
                        attempts, RETRY_MAX_ATTEMPTS, delay, e
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay *= 2;
                } else {
                    let reason = e.to_string();
                    return Err(EngineError::Encryption {
                        kind: classify_failure(&reason),
                        attempts,
                        reason,
                    });
                }
            }
        }
    }
}
