// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::env;
use std::path::{Path, PathBuf};

use alloy::primitives::Address;
use anyhow::anyhow;
use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use cipherwell_core::ExecutionContext;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::chain_config::ChainConfig;

pub const DEFAULT_CONFIG_NAME: &str = "cipherwell.config.yaml";

/// Policy applied when minting a fresh decryption authorization.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthorizationPolicy {
    /// Length of the validity window in whole days.
    pub duration_days: u64,
}

impl Default for AuthorizationPolicy {
    fn default() -> Self {
        Self { duration_days: 7 }
    }
}

/// The config actually used throughout the engine
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// The chains config
    chains: Vec<ChainConfig>,
    /// Authorization minting policy
    authorization: AuthorizationPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chains: vec![],
            authorization: AuthorizationPolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn chains(&self) -> &Vec<ChainConfig> {
        &self.chains
    }

    pub fn authorization(&self) -> &AuthorizationPolicy {
        &self.authorization
    }

    pub fn chain(&self, name: &str) -> Option<&ChainConfig> {
        self.chains.iter().find(|chain| chain.name == name)
    }

    /// Resolve a configured chain into the execution context operations
    /// bind to.
    pub fn execution_context(&self, chain_name: &str) -> Result<ExecutionContext> {
        let Some(chain) = self.chain(chain_name) else {
            bail!("No chain named '{chain_name}' in configuration");
        };
        if !chain.is_enabled() {
            bail!("Chain '{chain_name}' is disabled in configuration");
        }
        chain.rpc_url()?;
        let address: Address = chain.contracts.survey.address().parse().map_err(|e| {
            anyhow!("Invalid survey contract address for chain '{chain_name}': {e}")
        })?;
        Ok(ExecutionContext::new(chain.chain_id, address))
    }
}

/// Search `path` and its ancestors for `filename`.
pub fn find_in_parent(path: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = PathBuf::from(path);

    loop {
        let file_path = current.join(filename);
        if file_path.exists() {
            return Some(file_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load configuration from the given file, or from the nearest
/// `cipherwell.config.yaml` walking up from the current directory.
///
/// Defaults sit underneath the file; `CIPHERWELL_*` environment variables
/// override both, with nested keys split on `__` as in
/// `CIPHERWELL_AUTHORIZATION__DURATION_DAYS`.
pub fn load_config(config_file: Option<&Path>) -> Result<AppConfig> {
    let resolved = match config_file {
        Some(explicit) => Some(explicit.to_path_buf()),
        None => find_in_parent(&env::current_dir()?, DEFAULT_CONFIG_NAME),
    };

    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(path) = &resolved {
        let contents =
            std::fs::read_to_string(path).context("Configuration file not found")?;
        figment = figment.merge(Yaml::string(&contents));
        info!(path = %path.display(), "loaded configuration file");
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("CIPHERWELL_").split("__"))
        .extract()
        .context("Could not parse configuration")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    const CONFIG_STR: &str = r#"
chains:
  - name: "hardhat"
    rpc_url: "ws://localhost:8545"
    chain_id: 31337
    contracts:
      survey:
        address: "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0"
        deploy_block: 1764352
  - name: "sepolia"
    enabled: false
    rpc_url: "https://rpc.sepolia.org"
    chain_id: 11155111
    contracts:
      survey: "0xDc64a140Aa3E981100a9becA4E685f962f0cF6C9"

authorization:
  duration_days: 14
"#;

    #[test]
    fn test_deserialization() -> Result<()> {
        let config: AppConfig = serde_yaml::from_str(CONFIG_STR)?;
        assert_eq!(config.chains().len(), 2);
        assert_eq!(config.authorization().duration_days, 14);

        let chain = config.chain("hardhat").unwrap();
        assert_eq!(chain.chain_id, 31337);
        assert_eq!(
            chain.contracts.survey.address(),
            "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0"
        );
        Ok(())
    }

    #[test]
    fn test_execution_context() -> Result<()> {
        let config: AppConfig = serde_yaml::from_str(CONFIG_STR)?;
        let ctx = config.execution_context("hardhat")?;
        assert_eq!(ctx.chain_id, 31337);
        assert_eq!(
            ctx.contract_address,
            "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0".parse::<Address>()?
        );

        let Err(err) = config.execution_context("mainnet") else {
            bail!("error expected");
        };
        assert!(err.to_string().contains("No chain named"));

        let Err(err) = config.execution_context("sepolia") else {
            bail!("error expected");
        };
        assert!(err.to_string().contains("disabled"));
        Ok(())
    }

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_jail| {
            let config = load_config(None).map_err(|err| err.to_string())?;
            assert!(config.chains().is_empty());
            assert_eq!(config.authorization().duration_days, 7);
            Ok(())
        });
    }

    #[test]
    fn test_config_with_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_NAME, CONFIG_STR)?;
            jail.set_env("CIPHERWELL_AUTHORIZATION__DURATION_DAYS", "30");

            let config = load_config(None).map_err(|err| err.to_string())?;
            assert_eq!(config.chains().len(), 2);
            assert_eq!(config.authorization().duration_days, 30);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_config_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("custom.yaml");
        std::fs::write(&path, CONFIG_STR)?;

        let config = load_config(Some(&path))?;
        assert_eq!(config.chains().len(), 2);
        Ok(())
    }

    #[test]
    fn test_file_not_found() -> Result<()> {
        let Err(err) = load_config(Some(Path::new("/nope"))) else {
            bail!("error expected");
        };
        let Some(e) = err.downcast_ref::<std::io::Error>() else {
            bail!("io error expected");
        };

        assert_eq!(e.kind(), std::io::ErrorKind::NotFound);

        Ok(())
    }
}
