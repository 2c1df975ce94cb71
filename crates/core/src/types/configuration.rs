use dotenv::dotenv;
use eyre::{Result, eyre};
use std::collections::BTreeMap;
use std::env;

pub const FEE_WALLET: &str = "FEE_WALLET";
pub const MEEM_TOKEN_ADDRESS: &str = "MEEM_TOKEN_ADDRESS";
pub const MEMERA_ADDRESS: &str = "MEMERA_ADDRESS";

/// Values deployment arguments may reference with `env:NAME`.
pub const RECOGNIZED_KEYS: [&str; 3] = [FEE_WALLET, MEEM_TOKEN_ADDRESS, MEMERA_ADDRESS];

/// Flat snapshot of named configuration values, taken once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    values: BTreeMap<String, String>,
}

impl Configuration {
    /// Loads `.env` and snapshots the recognized keys plus `extra_keys`.
    /// Unset variables are simply absent from the snapshot.
    pub fn from_env<I, S>(extra_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        dotenv().ok(); // Load environment variables from .env file
        Self::from_lookup(extra_keys, |key| env::var(key).ok())
    }

    pub fn from_lookup<I, S, F>(extra_keys: I, lookup: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut values = BTreeMap::new();
        let keys = RECOGNIZED_KEYS
            .iter()
            .map(|k| k.to_string())
            .chain(extra_keys.into_iter().map(|k| k.as_ref().to_string()));
        for key in keys {
            if let Some(value) = lookup(&key) {
                values.insert(key, value);
            }
        }
        Self { values }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        match self.get(key) {
            Some(v) if !v.trim().is_empty() => Ok(v),
            Some(_) => Err(eyre!("configuration value {} is empty", key)),
            None => Err(eyre!("configuration value {} is not set", key)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}
