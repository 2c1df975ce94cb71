use alloy::node_bindings::Anvil;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_meme-deploy");
// First default anvil account.
const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
// Nothing listens on port 1.
const DEAD_RPC: &str = "http://127.0.0.1:1";

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../core/tests/fixtures/artifacts")
}

// Runs in an empty working directory so no stray .env or config.toml is picked up.
fn run(workdir: &TempDir, args: &[&str], envs: &[(&str, String)]) -> Output {
    Command::new(BIN)
        .args(args)
        .env_clear()
        .envs(envs.iter().map(|(k, v)| (*k, v.as_str())))
        .current_dir(workdir.path())
        .output()
        .unwrap()
}

#[test]
fn show_builtin_plan() {
    let output = run(&TempDir::new().unwrap(), &["show", "deploy-script"], &[]);
    assert_eq!(output.status.code(), Some(0));

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let contracts: Vec<&str> = plan["deploy"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["contract"].as_str().unwrap())
        .collect();
    assert_eq!(
        contracts,
        vec![
            "MemeERC20",
            "MemeERC721",
            "MemePoolFactory",
            "MemePoolLiquidity",
            "MemePoolPair"
        ]
    );
}

#[test]
fn missing_private_key_exits_one() {
    let output = run(
        &TempDir::new().unwrap(),
        &["deploy-meem"],
        &[("RPC_URL", DEAD_RPC.to_string())],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("PRIVATE_KEY"));
    assert!(output.stdout.is_empty());
}

#[test]
fn unset_fee_wallet_exits_one_without_deploying() {
    let output = run(
        &TempDir::new().unwrap(),
        &["deploy-memestonk"],
        &[
            ("RPC_URL", DEAD_RPC.to_string()),
            ("PRIVATE_KEY", TEST_KEY.to_string()),
            ("ARTIFACTS_DIR", fixtures().display().to_string()),
            (
                "MEEM_TOKEN_ADDRESS",
                "0x5F2F11ad8656439d5C14d9B351f8b09cDaC2A02d".to_string(),
            ),
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("FEE_WALLET is not set"));
    assert!(output.stdout.is_empty());
}

#[test]
fn unreachable_rpc_exits_one() {
    let output = run(
        &TempDir::new().unwrap(),
        &["deploy-memestonk"],
        &[
            ("RPC_URL", DEAD_RPC.to_string()),
            ("PRIVATE_KEY", TEST_KEY.to_string()),
            ("ARTIFACTS_DIR", fixtures().display().to_string()),
            (
                "MEEM_TOKEN_ADDRESS",
                "0x5F2F11ad8656439d5C14d9B351f8b09cDaC2A02d".to_string(),
            ),
            (
                "FEE_WALLET",
                "0x1111111111111111111111111111111111111111".to_string(),
            ),
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("MemeStonk"));
    assert!(output.stdout.is_empty());
}

#[test]
fn invalid_plan_file_exits_one() {
    let dir = TempDir::new().unwrap();
    let plan = dir.path().join("plan.toml");
    fs::write(
        &plan,
        r#"
        [[deploy]]
        contract = "MemeStonk"
        args = ["deployed:Memera", 5, "env:FEE_WALLET"]

        [[deploy]]
        contract = "Memera"
        "#,
    )
    .unwrap();

    let output = run(
        &dir,
        &["run", "--plan", plan.to_str().unwrap()],
        &[
            ("RPC_URL", DEAD_RPC.to_string()),
            ("PRIVATE_KEY", TEST_KEY.to_string()),
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not deployed by an earlier step"));
}

#[tokio::test]
#[ignore = "requires anvil on PATH"]
async fn run_plan_on_anvil_prints_each_address_in_order() {
    let anvil = Anvil::new().try_spawn().unwrap();
    let dir = TempDir::new().unwrap();
    let plan = dir.path().join("plan.toml");
    fs::write(
        &plan,
        r#"
        [[deploy]]
        contract = "Answer"

        [[deploy]]
        contract = "Answer"
        label = "Answer2"
        "#,
    )
    .unwrap();

    let output = run(
        &dir,
        &["run", "--plan", plan.to_str().unwrap()],
        &[
            ("RPC_URL", anvil.endpoint()),
            ("PRIVATE_KEY", TEST_KEY.to_string()),
            ("ARTIFACTS_DIR", fixtures().display().to_string()),
            ("CONFIRMATIONS", "1".to_string()),
        ],
    );
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    let addresses: Vec<Address> = stdout
        .lines()
        .map(|line| {
            line.strip_prefix("Answer deployed to: ")
                .unwrap()
                .parse()
                .unwrap()
        })
        .collect();
    assert_eq!(addresses.len(), 2);
    assert_ne!(addresses[0], addresses[1]);

    let provider = ProviderBuilder::new().on_http(anvil.endpoint_url());
    let runtime: Vec<u8> = vec![0x60, 0x2a, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xf3];
    for address in addresses {
        let code = provider.get_code_at(address).await.unwrap();
        assert_eq!(code.to_vec(), runtime);
    }
}
