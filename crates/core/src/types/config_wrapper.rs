use eyre::{Result, eyre};
use std::{env, fs, path::Path};
use toml::Value;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Thin accessor over the optional `config.toml` network table.
///
/// ```toml
/// [rpc_endpoints]
/// 1 = "env:MAINNET_RPC_URL"
/// 31337 = "http://127.0.0.1:8545"
///
/// [block_explorers]
/// 1 = "https://etherscan.io/"
///
/// [confirmations]
/// default = 1
/// 1 = 3
/// ```
pub struct ConfigWrapper {
    raw_config: Value,
}

impl ConfigWrapper {
    pub fn new(raw_config: Value) -> Self {
        Self { raw_config }
    }

    pub fn empty() -> Self {
        Self::new(Value::Table(Default::default()))
    }

    pub fn from_str(config_content: &str) -> Result<Self> {
        let raw_config = config_content.parse::<Value>()?;
        Ok(Self { raw_config })
    }

    pub fn from_file(path: Option<&str>) -> Result<Self> {
        let config_content = fs::read_to_string(path.unwrap_or(DEFAULT_CONFIG_PATH))?;
        Self::from_str(&config_content)
    }

    /// Like `from_file`, but a missing file yields an empty config.
    pub fn from_file_if_exists(path: Option<&str>) -> Result<Self> {
        let p = path.unwrap_or(DEFAULT_CONFIG_PATH);
        if Path::new(p).exists() {
            Self::from_file(Some(p))
        } else {
            Ok(Self::empty())
        }
    }

    pub fn get_rpc_url(&self, network_id: u32) -> Result<String> {
        self.get_rpc_url_with(network_id, |key| env::var(key).ok())
    }

    /// Like `get_rpc_url`, resolving `env:` entries through `lookup`.
    pub fn get_rpc_url_with<F>(&self, network_id: u32, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url_str = self
            .raw_config
            .get("rpc_endpoints")
            .and_then(|r| r.get(network_id.to_string()))
            .and_then(|u| u.as_str())
            .ok_or_else(|| eyre!("URL not found for network_id: {}", network_id))?;

        if let Some(env_var) = url_str.strip_prefix("env:") {
            lookup(env_var).ok_or_else(|| eyre!("Environment variable {} not set", env_var))
        } else {
            Ok(url_str.to_string())
        }
    }

    pub fn get_block_explorer_url(&self, network_id: u32) -> Option<String> {
        self.raw_config
            .get("block_explorers")
            .and_then(|b| b.get(network_id.to_string()))
            .and_then(|u| u.as_str())
            .map(|u| u.trim_end_matches('/').to_string())
    }

    pub fn get_confirmations(&self, network_id: Option<u32>) -> Option<u64> {
        let table = self.raw_config.get("confirmations")?;
        // Try network specific value first
        network_id
            .and_then(|id| table.get(id.to_string()))
            .or_else(|| table.get("default"))
            .and_then(|v| v.as_integer())
            .and_then(|v| u64::try_from(v).ok())
    }
}
