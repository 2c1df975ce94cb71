use eyre::{Result, eyre};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};
use std::fmt;

const CONFIG_PREFIX: &str = "env:";
const DEPLOYMENT_PREFIX: &str = "deployed:";

/// A single constructor argument as written in a plan.
///
/// Plan files write references as strings: `env:FEE_WALLET` reads the
/// configuration, `deployed:Memera` takes the address of an earlier step.
/// Anything else is a literal, coerced against the constructor ABI when the
/// contract is deployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructorArg {
    Literal(String),
    Config(String),
    Deployment(String),
}

impl ConstructorArg {
    pub fn literal(value: impl ToString) -> Self {
        ConstructorArg::Literal(value.to_string())
    }

    pub fn config(key: impl Into<String>) -> Self {
        ConstructorArg::Config(key.into())
    }

    pub fn deployment(key: impl Into<String>) -> Self {
        ConstructorArg::Deployment(key.into())
    }

    pub fn parse(s: &str) -> Result<Self> {
        if let Some(key) = s.strip_prefix(CONFIG_PREFIX) {
            if key.is_empty() {
                return Err(eyre!("empty configuration key in argument '{}'", s));
            }
            Ok(ConstructorArg::Config(key.to_string()))
        } else if let Some(key) = s.strip_prefix(DEPLOYMENT_PREFIX) {
            if key.is_empty() {
                return Err(eyre!("empty deployment key in argument '{}'", s));
            }
            Ok(ConstructorArg::Deployment(key.to_string()))
        } else {
            Ok(ConstructorArg::Literal(s.to_string()))
        }
    }
}

impl fmt::Display for ConstructorArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructorArg::Literal(v) => write!(f, "{}", v),
            ConstructorArg::Config(k) => write!(f, "{}{}", CONFIG_PREFIX, k),
            ConstructorArg::Deployment(k) => write!(f, "{}{}", DEPLOYMENT_PREFIX, k),
        }
    }
}

// Plan files may write numbers and booleans bare, e.g. `args = ["env:X", 5]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawArg {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl<'de> Deserialize<'de> for ConstructorArg {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawArg::deserialize(deserializer)? {
            RawArg::Bool(b) => Ok(ConstructorArg::literal(b)),
            RawArg::Int(i) => Ok(ConstructorArg::literal(i)),
            RawArg::UInt(u) => Ok(ConstructorArg::literal(u)),
            RawArg::Float(_) => Err(D::Error::custom(
                "fractional or out-of-range number is not a valid constructor argument, quote it as a string",
            )),
            RawArg::Str(s) => ConstructorArg::parse(&s).map_err(D::Error::custom),
        }
    }
}

impl Serialize for ConstructorArg {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
