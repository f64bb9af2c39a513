// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Storage collaborator abstraction.
//!
//! The engine does not own a persistence layer. Anything it needs to keep
//! across operations (cached decryption authorizations in particular) goes
//! through the [`DataStore`] trait; callers inject whatever backend they
//! run on. [`InMemStore`] is the reference backend and the one tests use.

mod memory;
mod traits;

pub use memory::*;
pub use traits::*;
