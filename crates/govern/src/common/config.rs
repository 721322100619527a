//! Typed per-network configuration. Resolving a network identifier yields a
//! structured record; core components never parse environment variables.

use std::fs::File;

use alloy_primitives::{Address, U256};
use eyre::WrapErr;
use serde::{Deserialize, Serialize};

use crate::contracts::ContractRole;

use super::{consts::CONFIG_FILENAME, DirsCliArgs};

/// Inclusive bounds a proposed sale rate must fall within.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateBounds {
    pub min: U256,
    pub max: U256,
}

impl RateBounds {
    pub fn contains(&self, rate: U256) -> bool {
        rate >= self.min && rate <= self.max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub safe: Address,
    pub timelock: Address,
    pub token: Address,
    pub staking: Address,
    pub sale: Address,
    #[serde(default)]
    pub rate_bounds: Option<RateBounds>,
}

impl NetworkConfig {
    /// Loads the config for `network` from `<data-dir>/<network>/config.yml`.
    pub fn load(dirs: &DirsCliArgs, network: &str) -> eyre::Result<Self> {
        let path = dirs.network_dir(network).join(CONFIG_FILENAME);
        let file = File::open(&path)
            .wrap_err_with(|| format!("no network config at {}", path.display()))?;
        let config: Self = serde_yaml::from_reader(file)
            .wrap_err_with(|| format!("malformed network config at {}", path.display()))?;

        if config.name != network {
            eyre::bail!(
                "network config at {} names `{}`, expected `{}`",
                path.display(),
                config.name,
                network
            );
        }

        Ok(config)
    }

    pub fn address_for(&self, role: ContractRole) -> Address {
        match role {
            ContractRole::Token => self.token,
            ContractRole::Staking => self.staking,
            ContractRole::Sale => self.sale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_bounds_are_inclusive() {
        let bounds = RateBounds {
            min: U256::from(100),
            max: U256::from(2000),
        };

        assert!(bounds.contains(U256::from(100)));
        assert!(bounds.contains(U256::from(2000)));
        assert!(!bounds.contains(U256::from(99)));
        assert!(!bounds.contains(U256::from(2001)));
    }

    #[test]
    fn parses_a_full_network_config() {
        let yaml = r#"
name: sepolia
chain_id: 11155111
rpc_url: "https://rpc.sepolia.example"
safe: "0x5afe5afe5afe5afe5afe5afe5afe5afe5afe5afe"
timelock: "0x1111111111111111111111111111111111111111"
token: "0x2222222222222222222222222222222222222222"
staking: "0x3333333333333333333333333333333333333333"
sale: "0x4444444444444444444444444444444444444444"
rate_bounds:
  min: 100
  max: 2000
"#;
        let config: NetworkConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.chain_id, 11155111);
        assert_eq!(config.address_for(ContractRole::Sale), config.sale);
        assert!(config.rate_bounds.unwrap().contains(U256::from(1500)));
    }
}
