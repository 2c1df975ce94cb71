use crate::factory::contract_factory::ContractFactoryProvider;
use crate::types::configuration::Configuration;
use crate::types::constructor_arg::ConstructorArg;
use crate::types::deployment_plan::{DeploymentPlan, DeploymentStep};
use crate::types::deployment_result::DeploymentResult;
use eyre::{Result, WrapErr, eyre};
use log::{debug, info};
use std::io::Write;

/// Executes a plan one step at a time, in order, stopping at the first error.
///
/// Each step waits for its own confirmation before the next one is
/// requested. Nothing is retried or rolled back: contracts deployed before a
/// failure stay deployed, and re-running is the recovery path.
pub struct DeploymentRunner<'a> {
    factories: &'a dyn ContractFactoryProvider,
    block_explorer_url: Option<String>,
}

impl<'a> DeploymentRunner<'a> {
    pub fn new(factories: &'a dyn ContractFactoryProvider) -> Self {
        Self {
            factories,
            block_explorer_url: None,
        }
    }

    pub fn with_block_explorer(mut self, url: Option<String>) -> Self {
        self.block_explorer_url = url;
        self
    }

    /// Runs `plan`, writing one `"<contract> deployed to: <address>"` line to
    /// `out` per confirmed deployment.
    pub async fn run<W: Write + Send>(
        &self,
        plan: &DeploymentPlan,
        config: &Configuration,
        out: &mut W,
    ) -> Result<Vec<DeploymentResult>> {
        plan.validate()?;

        let mut results: Vec<DeploymentResult> = Vec::with_capacity(plan.steps.len());
        for (i, step) in plan.steps.iter().enumerate() {
            let result = self
                .run_step(step, config, &results)
                .await
                .wrap_err_with(|| format!("step {} ({}) failed", i, step.key()))?;

            writeln!(out, "{}", result.summary_line())?;
            out.flush()?;
            results.push(result);
        }
        Ok(results)
    }

    async fn run_step(
        &self,
        step: &DeploymentStep,
        config: &Configuration,
        prior: &[DeploymentResult],
    ) -> Result<DeploymentResult> {
        let args = resolve_args(step, config, prior)?;
        debug!("Resolved {} args: {:?}", step.key(), args);

        let factory = self
            .factories
            .get_contract_factory(&step.contract)
            .await
            .wrap_err_with(|| format!("no factory for {}", step.contract))?;
        let pending = factory
            .deploy(&args)
            .await
            .wrap_err_with(|| format!("failed to submit deployment of {}", step.contract))?;
        let tx_hash = pending.tx_hash();
        let address = pending
            .deployed()
            .await
            .wrap_err_with(|| format!("deployment of {} was not confirmed", step.contract))?;

        if let Some(explorer) = &self.block_explorer_url {
            info!("{}: {}/address/{}", step.key(), explorer, address);
        }

        Ok(DeploymentResult {
            contract: step.contract.clone(),
            label: step.label.clone(),
            address,
            tx_hash,
        })
    }
}

/// Substitutes configuration values and earlier deployment addresses into a
/// step's arguments. Addresses are rendered checksummed.
pub fn resolve_args(
    step: &DeploymentStep,
    config: &Configuration,
    prior: &[DeploymentResult],
) -> Result<Vec<String>> {
    step.args
        .iter()
        .map(|arg| match arg {
            ConstructorArg::Literal(v) => Ok(v.clone()),
            ConstructorArg::Config(key) => config.require(key).map(str::to_string),
            ConstructorArg::Deployment(key) => prior
                .iter()
                .rev()
                .find(|r| r.key() == key)
                .map(|r| r.address.to_string())
                .ok_or_else(|| eyre!("no earlier deployment named {}", key)),
        })
        .collect()
}
