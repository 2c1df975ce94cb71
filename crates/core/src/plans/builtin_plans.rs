use crate::types::configuration::{FEE_WALLET, MEEM_TOKEN_ADDRESS, MEMERA_ADDRESS};
use crate::types::constructor_arg::ConstructorArg;
use crate::types::deployment_plan::{DeploymentPlan, DeploymentStep};

/// Fee percentage MemeStonk is deployed with.
pub const MEME_STONK_FEE_PERCENT: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinPlan {
    /// MemeERC20, MemeERC721, MemePoolFactory, MemePoolLiquidity, MemePoolPair.
    DeployScript,
    /// MEEMToken.
    DeployMeem,
    /// MemeStonk over the token at `MEEM_TOKEN_ADDRESS`.
    DeployMemeStonk,
    /// MemeStonk over the token at `MEMERA_ADDRESS`.
    DeployMemeStonkMemera,
}

impl BuiltinPlan {
    pub const ALL: [BuiltinPlan; 4] = [
        BuiltinPlan::DeployScript,
        BuiltinPlan::DeployMeem,
        BuiltinPlan::DeployMemeStonk,
        BuiltinPlan::DeployMemeStonkMemera,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinPlan::DeployScript => "deploy-script",
            BuiltinPlan::DeployMeem => "deploy-meem",
            BuiltinPlan::DeployMemeStonk => "deploy-memestonk",
            BuiltinPlan::DeployMemeStonkMemera => "deploy-memestonk-memera",
        }
    }
}

pub fn plan(which: BuiltinPlan) -> DeploymentPlan {
    match which {
        BuiltinPlan::DeployScript => DeploymentPlan::new(
            [
                "MemeERC20",
                "MemeERC721",
                "MemePoolFactory",
                "MemePoolLiquidity",
                "MemePoolPair",
            ]
            .into_iter()
            .map(|name| DeploymentStep::new(name, vec![]))
            .collect(),
        ),
        BuiltinPlan::DeployMeem => {
            DeploymentPlan::new(vec![DeploymentStep::new("MEEMToken", vec![])])
        }
        BuiltinPlan::DeployMemeStonk => meme_stonk(MEEM_TOKEN_ADDRESS),
        BuiltinPlan::DeployMemeStonkMemera => meme_stonk(MEMERA_ADDRESS),
    }
}

fn meme_stonk(token_key: &str) -> DeploymentPlan {
    DeploymentPlan::new(vec![DeploymentStep::new(
        "MemeStonk",
        vec![
            ConstructorArg::config(token_key),
            ConstructorArg::literal(MEME_STONK_FEE_PERCENT),
            ConstructorArg::config(FEE_WALLET),
        ],
    )])
}
