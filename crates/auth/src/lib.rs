// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Decryption authorization lifecycle.
//!
//! A [`DecryptionAuthorization`] lets its holder request plaintexts for a
//! fixed contract set during a bounded time window. Minting one costs an
//! interactive wallet signature, so [`AuthorizationManager`] caches signed
//! authorizations in the storage collaborator and only prompts when no
//! currently valid one exists.

mod authorization;
mod keypair;
mod manager;
mod signer;

pub use authorization::*;
pub use keypair::*;
pub use manager::*;
pub use signer::*;
