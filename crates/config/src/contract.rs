// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};

/// A contract entry in configuration. Accepts either a bare address
/// string or a table carrying the address plus its deployment block.
#[derive(Debug, Clone, Hash, Eq, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Contract {
    Full {
        address: String,
        deploy_block: Option<u64>,
    },
    AddressOnly(String),
}

impl Contract {
    pub fn address(&self) -> &String {
        use Contract::*;
        match self {
            Full { address, .. } => address,
            AddressOnly(v) => v,
        }
    }

    pub fn deploy_block(&self) -> Option<u64> {
        use Contract::*;
        match self {
            Full { deploy_block, .. } => *deploy_block,
            AddressOnly(_) => None,
        }
    }
}

/// The contracts a chain entry must name.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContractAddresses {
    pub survey: Contract,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_address_and_full_table() {
        let yaml = r#"
survey:
  address: "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0"
  deploy_block: 1764352
"#;
        let contracts: ContractAddresses = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            contracts.survey.address(),
            "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0"
        );
        assert_eq!(contracts.survey.deploy_block(), Some(1764352));

        let yaml = r#"survey: "0xDc64a140Aa3E981100a9becA4E685f962f0cF6C9""#;
        let contracts: ContractAddresses = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            contracts.survey.address(),
            "0xDc64a140Aa3E981100a9becA4E685f962f0cF6C9"
        );
        assert_eq!(contracts.survey.deploy_block(), None);
    }
}
