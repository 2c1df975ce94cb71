use clap::{Parser, Subcommand};
use deploy_core::{BuiltinPlan, DeploymentPlan, deploy, deploy_builtin, plans::builtin_plans};
use eyre::{Result, eyre};
use log::debug;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy MemeERC20, MemeERC721, MemePoolFactory, MemePoolLiquidity and MemePoolPair
    DeployScript,
    /// Deploy MEEMToken
    DeployMeem,
    /// Deploy MemeStonk for MEEM_TOKEN_ADDRESS, sending fees to FEE_WALLET
    DeployMemestonk,
    /// Deploy MemeStonk for MEMERA_ADDRESS, sending fees to FEE_WALLET
    DeployMemestonkMemera,
    /// Deploy the contracts listed in a plan file
    Run {
        /// Path to the plan (TOML, or JSON with a .json extension)
        #[arg(long = "plan", short = 'p')]
        plan_path: String,
    },
    /// Print a plan as JSON without deploying anything
    Show {
        /// Built-in plan name (e.g. deploy-script) or path to a plan file
        target: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::DeployScript => {
            deploy_builtin(BuiltinPlan::DeployScript).await?;
        }
        Commands::DeployMeem => {
            deploy_builtin(BuiltinPlan::DeployMeem).await?;
        }
        Commands::DeployMemestonk => {
            deploy_builtin(BuiltinPlan::DeployMemeStonk).await?;
        }
        Commands::DeployMemestonkMemera => {
            deploy_builtin(BuiltinPlan::DeployMemeStonkMemera).await?;
        }
        Commands::Run { plan_path } => {
            let plan = DeploymentPlan::from_file(plan_path)?;
            debug!("Loaded {} step(s) from {}", plan.steps.len(), plan_path);
            deploy(&plan).await?;
        }
        Commands::Show { target } => {
            let plan = resolve_plan(target)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }

    Ok(())
}

fn resolve_plan(target: &str) -> Result<DeploymentPlan> {
    if let Some(which) = BuiltinPlan::ALL.into_iter().find(|p| p.name() == target) {
        return Ok(builtin_plans::plan(which));
    }
    if std::path::Path::new(target).exists() {
        return DeploymentPlan::from_file(target);
    }
    Err(eyre!(
        "{} is neither a built-in plan ({}) nor a plan file",
        target,
        BuiltinPlan::ALL.map(|p| p.name()).join(", ")
    ))
}
