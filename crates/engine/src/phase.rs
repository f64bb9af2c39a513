// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::fmt;

/// Where the current (or last) retrieval attempt got to.
///
/// A precondition failure jumps straight from its phase to [`Failed`]
/// without entering the later phases.
///
/// [`Failed`]: DecryptPhase::Failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecryptPhase {
    Idle,
    FetchingHandles,
    AwaitingAuthorization,
    Decrypting,
    Cached,
    Failed,
}

impl fmt::Display for DecryptPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DecryptPhase::Idle => "idle",
            DecryptPhase::FetchingHandles => "fetching_handles",
            DecryptPhase::AwaitingAuthorization => "awaiting_authorization",
            DecryptPhase::Decrypting => "decrypting",
            DecryptPhase::Cached => "cached",
            DecryptPhase::Failed => "failed",
        };
        write!(f, "{name}")
    }
}
