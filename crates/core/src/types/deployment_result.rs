use alloy::primitives::{Address, TxHash};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentResult {
    pub contract: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub address: Address,
    pub tx_hash: TxHash,
}

impl DeploymentResult {
    pub fn key(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.contract)
    }

    /// The console line printed once the deployment confirms.
    pub fn summary_line(&self) -> String {
        format!("{} deployed to: {}", self.contract, self.address)
    }
}
