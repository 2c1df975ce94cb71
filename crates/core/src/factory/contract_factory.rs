use alloy::primitives::{Address, TxHash};
use async_trait::async_trait;
use eyre::Result;

/// Source of contract factories, looked up by contract name.
#[async_trait]
pub trait ContractFactoryProvider: Send + Sync {
    async fn get_contract_factory(&self, name: &str) -> Result<Box<dyn ContractFactory>>;
}

/// Builds and submits the creation transaction for one contract type.
#[async_trait]
pub trait ContractFactory: Send + Sync {
    /// Submits the deployment. Arguments are textual and coerced against the
    /// constructor; an arity or type mismatch fails before anything is sent.
    async fn deploy(&self, args: &[String]) -> Result<Box<dyn PendingDeployment>>;
}

/// A submitted, not yet confirmed, deployment.
#[async_trait]
pub trait PendingDeployment: Send {
    fn tx_hash(&self) -> TxHash;

    /// Resolves once the transaction is confirmed, yielding the new address.
    async fn deployed(self: Box<Self>) -> Result<Address>;
}
