// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Orchestration of encrypted check-in submission and authorized retrieval.
//!
//! [`SurveyEngine`] owns the session state (account, execution context,
//! record cache, last known count) and drives the collaborators: the
//! encryption backend, the on-ledger vault, the authorization signer and
//! the decryption oracle. One engine serves one user session.

mod engine;
mod phase;
pub mod telemetry;

pub use engine::*;
pub use phase::*;
