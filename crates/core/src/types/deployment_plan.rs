use super::constructor_arg::ConstructorArg;
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentStep {
    pub contract: String,
    /// Name later steps use in `deployed:<key>`; defaults to the contract name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub args: Vec<ConstructorArg>,
}

impl DeploymentStep {
    pub fn new(contract: impl Into<String>, args: Vec<ConstructorArg>) -> Self {
        Self {
            contract: contract.into(),
            label: None,
            args,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn key(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.contract)
    }
}

/// Ordered list of contracts to deploy.
///
/// TOML form:
///
/// ```toml
/// [[deploy]]
/// contract = "Memera"
///
/// [[deploy]]
/// contract = "MemeStonk"
/// args = ["deployed:Memera", 5, "env:FEE_WALLET"]
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeploymentPlan {
    #[serde(rename = "deploy", default)]
    pub steps: Vec<DeploymentStep>,
}

impl DeploymentPlan {
    pub fn new(steps: Vec<DeploymentStep>) -> Self {
        Self { steps }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Reads a plan file, choosing the format by extension (`.json`, else TOML).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| eyre!("failed to read plan {}: {}", path.display(), e))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// Configuration keys referenced anywhere in the plan.
    pub fn config_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for arg in self.steps.iter().flat_map(|s| s.args.iter()) {
            if let ConstructorArg::Config(key) = arg {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
        keys
    }

    /// Structural checks that need no chain access: the plan is non-empty,
    /// step keys are unique, and every `deployed:` reference names an
    /// earlier step.
    pub fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(eyre!("deployment plan has no steps"));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for (i, step) in self.steps.iter().enumerate() {
            if step.contract.trim().is_empty() {
                return Err(eyre!("step {} has an empty contract name", i));
            }
            for arg in &step.args {
                if let ConstructorArg::Deployment(key) = arg {
                    if !seen.contains(key.as_str()) {
                        return Err(eyre!(
                            "step {} ({}) references deployment '{}' which is not deployed by an earlier step",
                            i,
                            step.key(),
                            key
                        ));
                    }
                }
            }
            if !seen.insert(step.key()) {
                return Err(eyre!(
                    "duplicate step key '{}' at step {}, give one of them a label",
                    step.key(),
                    i
                ));
            }
        }
        Ok(())
    }
}
