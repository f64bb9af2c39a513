// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Batched authorized decryption.
//!
//! [`decrypt_batch`] checks that a [`DecryptionAuthorization`] actually
//! covers the requested ciphertexts, then drives the external
//! [`DecryptionOracle`] in one all-or-nothing call. [`reconcile`] maps the
//! returned plaintexts back onto a survey record and [`RecordCache`] keeps
//! the last successful decryption per submission index.
//!
//! [`DecryptionAuthorization`]: cipherwell_auth::DecryptionAuthorization

mod batch;
mod cache;
mod oracle;

pub use batch::*;
pub use cache::*;
pub use oracle::*;
