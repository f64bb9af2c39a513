// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{contract::ContractAddresses, rpc::RPC};
use anyhow::*;
use serde::{Deserialize, Serialize};

/// One chain entry in configuration.
///
/// `chain_id` is required: the engine binds operations to a
/// (chain, contract) pair and never discovers chain identity from the
/// node, so it must be pinned in configuration.
#[derive(Debug, Clone, PartialEq, Hash, Eq, Deserialize, Serialize)]
pub struct ChainConfig {
    pub enabled: Option<bool>,
    pub name: String,
    pub rpc_url: String, // We may need multiple per chain for redundancy at a later point
    pub chain_id: u64,
    pub contracts: ContractAddresses,
}

impl ChainConfig {
    pub fn rpc_url(&self) -> Result<RPC> {
        Ok(RPC::from_url(&self.rpc_url)
            .map_err(|e| anyhow!("Failed to parse RPC URL for chain {}: {}", self.name, e))?)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(enabled: Option<bool>, rpc_url: &str) -> ChainConfig {
        ChainConfig {
            enabled,
            name: "hardhat".into(),
            rpc_url: rpc_url.into(),
            chain_id: 31337,
            contracts: ContractAddresses {
                survey: crate::contract::Contract::AddressOnly(
                    "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0".into(),
                ),
            },
        }
    }

    #[test]
    fn enabled_defaults_to_true() {
        assert!(chain(None, "http://localhost:8545").is_enabled());
        assert!(!chain(Some(false), "http://localhost:8545").is_enabled());
    }

    #[test]
    fn rpc_url_failure_names_the_chain() {
        let err = chain(None, "gopher://nope").rpc_url().unwrap_err();
        assert!(err.to_string().contains("hardhat"));
    }
}
