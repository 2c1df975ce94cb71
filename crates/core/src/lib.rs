//! Ordered contract deployment: build a plan, resolve its arguments against
//! configuration and earlier deployments, deploy each contract and wait for
//! confirmation before moving on.

pub mod factory {
    pub mod alloy_factory;
    pub mod artifact;
    pub mod contract_factory;
}
pub mod plans {
    pub mod builtin_plans;
}
pub mod runner {
    pub mod deployment_runner;
}
pub mod types {
    pub mod config_wrapper;
    pub mod configuration;
    pub mod constructor_arg;
    pub mod deployment_plan;
    pub mod deployment_result;
    pub mod network_settings;
}

pub use plans::builtin_plans::BuiltinPlan;
pub use runner::deployment_runner::DeploymentRunner;
pub use types::configuration::Configuration;
pub use types::deployment_plan::DeploymentPlan;
pub use types::deployment_result::DeploymentResult;
pub use types::network_settings::NetworkSettings;

use eyre::Result;
use log::info;
use std::io;

/// Deploys `plan` against the network described by the environment,
/// printing one address line per contract to stdout.
pub async fn deploy(plan: &DeploymentPlan) -> Result<Vec<DeploymentResult>> {
    let config = Configuration::from_env(plan.config_keys());
    let settings = NetworkSettings::from_env()?;
    info!(
        "Deploying {} contract(s) with {:?}",
        plan.steps.len(),
        settings
    );

    let factories = factory::alloy_factory::connect(&settings).await?;
    let mut stdout = io::stdout();
    DeploymentRunner::new(&factories)
        .with_block_explorer(settings.block_explorer_url.clone())
        .run(plan, &config, &mut stdout)
        .await
}

pub async fn deploy_builtin(which: BuiltinPlan) -> Result<Vec<DeploymentResult>> {
    deploy(&plans::builtin_plans::plan(which)).await
}
