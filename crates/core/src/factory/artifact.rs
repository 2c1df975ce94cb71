use alloy::dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier};
use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;
use eyre::{Result, WrapErr, eyre};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Compiled contract: ABI plus creation bytecode.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

// Hardhat writes `"bytecode": "0x.."`, Foundry writes `"bytecode": {"object": "0x.."}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Object { object: String },
}

#[derive(Deserialize)]
struct RawArtifact {
    #[serde(rename = "contractName", default)]
    contract_name: Option<String>,
    abi: JsonAbi,
    bytecode: RawBytecode,
}

impl ContractArtifact {
    pub fn from_json_str(name: &str, content: &str) -> Result<Self> {
        let raw: RawArtifact = serde_json::from_str(content)
            .wrap_err_with(|| format!("malformed artifact for {}", name))?;

        if let Some(declared) = &raw.contract_name {
            if declared != name {
                return Err(eyre!(
                    "artifact declares contract {} but {} was requested",
                    declared,
                    name
                ));
            }
        }

        let hex_code = match raw.bytecode {
            RawBytecode::Hex(s) => s,
            RawBytecode::Object { object } => object,
        };
        let hex_code = hex_code.trim_start_matches("0x");
        if hex_code.is_empty() {
            return Err(eyre!(
                "{} has no creation bytecode (interface or abstract contract?)",
                name
            ));
        }
        if hex_code.contains("__") {
            return Err(eyre!("{} has unlinked library placeholders", name));
        }
        let bytecode = Bytes::from(
            hex::decode(hex_code).wrap_err_with(|| format!("invalid bytecode for {}", name))?,
        );

        Ok(Self {
            name: name.to_string(),
            abi: raw.abi,
            bytecode,
        })
    }

    pub fn from_file(name: &str, path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read artifact {}", path.display()))?;
        Self::from_json_str(name, &content)
    }

    /// Searches `artifacts_dir` recursively for `<name>.json`.
    pub fn load(artifacts_dir: &Path, name: &str) -> Result<Self> {
        let file_name = format!("{}.json", name);
        let mut matches = Vec::new();
        find_files(artifacts_dir, &file_name, &mut matches).wrap_err_with(|| {
            format!("failed to scan artifacts in {}", artifacts_dir.display())
        })?;

        match matches.as_slice() {
            [] => Err(eyre!(
                "no artifact for contract {} under {}",
                name,
                artifacts_dir.display()
            )),
            [path] => {
                debug!("Loading artifact for {} from {}", name, path.display());
                Self::from_file(name, path)
            }
            _ => Err(eyre!(
                "artifact for contract {} is ambiguous: {}",
                name,
                matches
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }

    /// Coerces textual arguments to the constructor's parameter types.
    pub fn coerce_args(&self, args: &[String]) -> Result<Vec<DynSolValue>> {
        let inputs = self
            .abi
            .constructor
            .as_ref()
            .map(|c| c.inputs.as_slice())
            .unwrap_or_default();

        if inputs.len() != args.len() {
            return Err(eyre!(
                "{} constructor takes {} argument(s), {} given",
                self.name,
                inputs.len(),
                args.len()
            ));
        }

        inputs
            .iter()
            .zip(args)
            .enumerate()
            .map(|(i, (param, arg))| -> Result<DynSolValue> {
                let ty: DynSolType = param.resolve()?;
                ty.coerce_str(arg).map_err(|e| {
                    eyre!(
                        "{} constructor argument {} ({} {}): cannot use '{}': {}",
                        self.name,
                        i,
                        param.ty,
                        param.name,
                        arg,
                        e
                    )
                })
            })
            .collect()
    }

    /// Creation bytecode followed by the ABI-encoded constructor arguments.
    pub fn creation_code(&self, args: &[String]) -> Result<Bytes> {
        let values = self.coerce_args(args)?;
        let encoded_args = match &self.abi.constructor {
            Some(constructor) => constructor.abi_encode_input(&values)?,
            None => Vec::new(),
        };
        Ok([self.bytecode.as_ref(), encoded_args.as_slice()]
            .concat()
            .into())
    }
}

fn find_files(dir: &Path, file_name: &str, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            // Hardhat keeps build-info next to the artifacts.
            if path.file_name().is_some_and(|n| n == "build-info") {
                continue;
            }
            find_files(&path, file_name, out)?;
        } else if path.file_name().is_some_and(|n| n == file_name) {
            out.push(path);
        }
    }
    Ok(())
}
