// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Ledger access for the SurveyVault contract.
//!
//! [`contracts`] holds the `sol!` bindings, provider aliases and the
//! typed contract wrapper; [`gateway`] holds the collaborator traits the
//! engine drives plus their contract-backed implementations.

pub mod contracts;
pub mod gateway;

pub use contracts::*;
pub use gateway::*;
