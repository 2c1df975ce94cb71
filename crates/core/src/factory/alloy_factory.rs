use super::artifact::ContractArtifact;
use super::contract_factory::{ContractFactory, ContractFactoryProvider, PendingDeployment};
use crate::types::network_settings::NetworkSettings;
use alloy::network::{Ethereum, EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, TxHash};
use alloy::providers::{PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use eyre::{Result, WrapErr, eyre};
use log::{debug, info};
use std::path::PathBuf;

/// Contract factories backed by compiled artifacts and an alloy provider.
pub struct AlloyFactoryProvider<P> {
    provider: P,
    artifacts_dir: PathBuf,
    confirmations: u64,
}

/// Connects a signing provider for `settings` and wraps it as a factory source.
pub async fn connect(
    settings: &NetworkSettings,
) -> Result<AlloyFactoryProvider<impl Provider + Clone + 'static>> {
    let signer: PrivateKeySigner = settings
        .private_key
        .trim()
        .parse()
        .map_err(|e| eyre!("invalid PRIVATE_KEY: {}", e))?;
    let deployer = signer.address();
    let wallet = EthereumWallet::from(signer);

    let provider = ProviderBuilder::new()
        .wallet(wallet)
        .on_builtin(&settings.rpc_url)
        .await
        .wrap_err_with(|| format!("failed to connect to {}", settings.rpc_url))?;
    info!("Deploying from {} via {}", deployer, settings.rpc_url);

    Ok(AlloyFactoryProvider::new(
        provider,
        settings.artifacts_dir.clone(),
        settings.confirmations,
    ))
}

impl<P> AlloyFactoryProvider<P>
where
    P: Provider + Clone + 'static,
{
    pub fn new(provider: P, artifacts_dir: PathBuf, confirmations: u64) -> Self {
        Self {
            provider,
            artifacts_dir,
            confirmations,
        }
    }
}

#[async_trait]
impl<P> ContractFactoryProvider for AlloyFactoryProvider<P>
where
    P: Provider + Clone + 'static,
{
    async fn get_contract_factory(&self, name: &str) -> Result<Box<dyn ContractFactory>> {
        let artifact = ContractArtifact::load(&self.artifacts_dir, name)?;
        Ok(Box::new(AlloyContractFactory {
            artifact,
            provider: self.provider.clone(),
            confirmations: self.confirmations,
        }))
    }
}

pub struct AlloyContractFactory<P> {
    artifact: ContractArtifact,
    provider: P,
    confirmations: u64,
}

#[async_trait]
impl<P> ContractFactory for AlloyContractFactory<P>
where
    P: Provider + Clone + 'static,
{
    async fn deploy(&self, args: &[String]) -> Result<Box<dyn PendingDeployment>> {
        let code = self.artifact.creation_code(args)?;
        debug!(
            "Submitting {} ({} bytes of creation code)",
            self.artifact.name,
            code.len()
        );

        let tx = TransactionRequest::default().with_deploy_code(code);
        let pending = self.provider.send_transaction(tx).await?;
        info!("{} deployment submitted: {}", self.artifact.name, pending.tx_hash());

        Ok(Box::new(AlloyPendingDeployment {
            name: self.artifact.name.clone(),
            pending: pending.with_required_confirmations(self.confirmations),
        }))
    }
}

pub struct AlloyPendingDeployment {
    name: String,
    pending: PendingTransactionBuilder<Ethereum>,
}

#[async_trait]
impl PendingDeployment for AlloyPendingDeployment {
    fn tx_hash(&self) -> TxHash {
        *self.pending.tx_hash()
    }

    async fn deployed(self: Box<Self>) -> Result<Address> {
        let tx_hash = self.tx_hash();
        let AlloyPendingDeployment { name, pending } = *self;
        let receipt = pending.get_receipt().await?;

        if !receipt.status() {
            return Err(eyre!("{} deployment transaction {} reverted", name, tx_hash));
        }
        let address = receipt.contract_address.ok_or_else(|| {
            eyre!(
                "{} deployment transaction {} has no contract address",
                name,
                tx_hash
            )
        })?;
        info!(
            "{} confirmed in block {:?} (gas used {})",
            name, receipt.block_number, receipt.gas_used
        );
        Ok(address)
    }
}
