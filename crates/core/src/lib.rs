// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

pub mod context;
pub mod error;
pub mod handle;
pub mod record;
pub mod submission;
pub mod validate;

pub use context::*;
pub use error::*;
pub use handle::*;
pub use record::*;
pub use submission::*;
pub use validate::*;
