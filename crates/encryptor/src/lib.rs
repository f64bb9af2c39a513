// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Client-side encryption pipeline.
//!
//! Plaintext never leaves this side of the [`EncryptionBackend`] seam
//! unencrypted. The [`InputBuilder`] collects field values in canonical
//! order; [`encrypt_with_retry`] drives attempts against the backend with
//! bounded exponential backoff and context checkpoints.

mod backend;
mod builder;
mod retry;

pub use backend::*;
pub use builder::*;
pub use retry::*;
