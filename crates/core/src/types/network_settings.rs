use super::config_wrapper::ConfigWrapper;
use dotenv::dotenv;
use eyre::{Result, WrapErr, eyre};
use std::env;
use std::path::PathBuf;

pub const RPC_URL: &str = "RPC_URL";
pub const NETWORK_ID: &str = "NETWORK_ID";
pub const PRIVATE_KEY: &str = "PRIVATE_KEY";
pub const ARTIFACTS_DIR: &str = "ARTIFACTS_DIR";
pub const CONFIRMATIONS: &str = "CONFIRMATIONS";
pub const DEPLOY_CONFIG: &str = "DEPLOY_CONFIG";

pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";
pub const DEFAULT_CONFIRMATIONS: u64 = 1;

/// Where and how to deploy.
#[derive(Clone)]
pub struct NetworkSettings {
    pub rpc_url: String,
    pub network_id: Option<u32>,
    pub private_key: String,
    pub artifacts_dir: PathBuf,
    pub confirmations: u64,
    pub block_explorer_url: Option<String>,
}

impl std::fmt::Debug for NetworkSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkSettings")
            .field("rpc_url", &self.rpc_url)
            .field("network_id", &self.network_id)
            .field("private_key", &"<redacted>")
            .field("artifacts_dir", &self.artifacts_dir)
            .field("confirmations", &self.confirmations)
            .field("block_explorer_url", &self.block_explorer_url)
            .finish()
    }
}

impl NetworkSettings {
    /// Reads settings from the environment (after `.env`), falling back to
    /// `config.toml` for the RPC endpoint, explorer and confirmation depth.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let config_path = env::var(DEPLOY_CONFIG).ok();
        let config = ConfigWrapper::from_file_if_exists(config_path.as_deref())?;
        Self::resolve(|key| env::var(key).ok(), &config)
    }

    pub fn resolve<F>(lookup: F, config: &ConfigWrapper) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network_id = lookup(NETWORK_ID)
            .map(|id| {
                id.trim()
                    .parse::<u32>()
                    .wrap_err_with(|| format!("{} must be an integer, got '{}'", NETWORK_ID, id))
            })
            .transpose()?;

        let rpc_url = match (lookup(RPC_URL), network_id) {
            (Some(url), _) => url,
            (None, Some(id)) => config.get_rpc_url_with(id, &lookup)?,
            (None, None) => {
                return Err(eyre!(
                    "no RPC endpoint: set {} or {} with a matching [rpc_endpoints] entry",
                    RPC_URL,
                    NETWORK_ID
                ));
            }
        };

        let private_key = lookup(PRIVATE_KEY)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| eyre!("{} is not set", PRIVATE_KEY))?;

        let confirmations = match lookup(CONFIRMATIONS) {
            Some(c) => c.trim().parse::<u64>().wrap_err_with(|| {
                format!("{} must be a non-negative integer, got '{}'", CONFIRMATIONS, c)
            })?,
            None => config
                .get_confirmations(network_id)
                .unwrap_or(DEFAULT_CONFIRMATIONS),
        };

        Ok(Self {
            rpc_url,
            network_id,
            private_key,
            artifacts_dir: PathBuf::from(
                lookup(ARTIFACTS_DIR).unwrap_or_else(|| DEFAULT_ARTIFACTS_DIR.to_string()),
            ),
            confirmations,
            block_explorer_url: network_id.and_then(|id| config.get_block_explorer_url(id)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| vars.get(key).map(|v| v.to_string())
    }

    #[test]
    fn test_env_wins_over_config() {
        let config = ConfigWrapper::from_str(
            r#"
            [rpc_endpoints]
            31337 = "http://127.0.0.1:8545"
            [block_explorers]
            31337 = "http://localhost:4000/"
            [confirmations]
            default = 2
            "#,
        )
        .unwrap();
        let vars = HashMap::from([
            (RPC_URL, "http://10.0.0.1:8545"),
            (NETWORK_ID, "31337"),
            (PRIVATE_KEY, "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"),
        ]);
        let settings = NetworkSettings::resolve(lookup(&vars), &config).unwrap();
        assert_eq!(settings.rpc_url, "http://10.0.0.1:8545");
        assert_eq!(settings.confirmations, 2);
        assert_eq!(settings.artifacts_dir, PathBuf::from(DEFAULT_ARTIFACTS_DIR));
        assert_eq!(
            settings.block_explorer_url.as_deref(),
            Some("http://localhost:4000")
        );
        assert!(!format!("{:?}", settings).contains("ac0974"));
    }

    #[test]
    fn test_rpc_from_config() {
        let config = ConfigWrapper::from_str("[rpc_endpoints]\n31337 = \"http://127.0.0.1:8545\"")
            .unwrap();
        let vars = HashMap::from([
            (NETWORK_ID, "31337"),
            (PRIVATE_KEY, "0x01"),
            (CONFIRMATIONS, "0"),
        ]);
        let settings = NetworkSettings::resolve(lookup(&vars), &config).unwrap();
        assert_eq!(settings.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(settings.confirmations, 0);
    }

    #[test]
    fn test_rpc_from_config_env_indirection() {
        let config = ConfigWrapper::from_str("[rpc_endpoints]\n11155111 = \"env:SEPOLIA_RPC\"")
            .unwrap();
        let vars = HashMap::from([
            (NETWORK_ID, "11155111"),
            (PRIVATE_KEY, "0x01"),
            ("SEPOLIA_RPC", "https://rpc.sepolia.test"),
        ]);
        let settings = NetworkSettings::resolve(lookup(&vars), &config).unwrap();
        assert_eq!(settings.rpc_url, "https://rpc.sepolia.test");

        let vars = HashMap::from([(NETWORK_ID, "11155111"), (PRIVATE_KEY, "0x01")]);
        let err = NetworkSettings::resolve(lookup(&vars), &config).unwrap_err();
        assert!(err.to_string().contains("SEPOLIA_RPC not set"));
    }

    #[test]
    fn test_missing_settings() {
        let config = ConfigWrapper::empty();
        let vars = HashMap::from([(PRIVATE_KEY, "0x01")]);
        assert!(NetworkSettings::resolve(lookup(&vars), &config).is_err());

        let vars = HashMap::from([(RPC_URL, "http://127.0.0.1:8545")]);
        let err = NetworkSettings::resolve(lookup(&vars), &config).unwrap_err();
        assert!(err.to_string().contains(PRIVATE_KEY));

        let vars = HashMap::from([
            (RPC_URL, "http://127.0.0.1:8545"),
            (PRIVATE_KEY, "0x01"),
            (CONFIRMATIONS, "many"),
        ]);
        assert!(NetworkSettings::resolve(lookup(&vars), &config).is_err());
    }
}
