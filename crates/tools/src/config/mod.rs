//! Contract toolchain configuration
//!
//! This module builds the configuration record consumed by the external compile, deploy and
//! verify toolchain. Every setting is resolved in priority order:
//!
//! 1. Process environment variables
//! 2. Entries of a `.env` file
//! 3. Fixed defaults
//!
//! Resolution itself is total: a missing or empty input silently falls back to its default.
//!
//! # Examples
//!
//! ```rust,no_run
//! use contracts_tools::config::{self, Network};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let inputs = config::env::load(None)?;
//! let config = config::resolve(&inputs);
//! println!("goerli: {:?}", config.networks[&Network::Goerli].url);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

pub mod env;
pub mod network;
pub mod resolve;

pub use network::{Network, NetworkProfile, DEFAULT_ENDPOINT, SENTINEL_PRIVATE_KEY};
pub use resolve::{resolve, vars, Inputs};

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment file error: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("Invalid network: {0}. Must be one of: hardhat, localhost, goerli, sepolia, bscTest, avalancheTest")]
    InvalidNetwork(String),
}

/// Output encoding of the configuration record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    #[default]
    Json,
    Toml,
}

/// Account index assigned to a named role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NamedAccount {
    pub default: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolidityConfig {
    pub version: String,
    pub settings: CompilerSettings,
}

impl Default for SolidityConfig {
    fn default() -> Self {
        Self {
            version: "0.8.20".to_string(),
            settings: CompilerSettings {
                optimizer: OptimizerConfig {
                    enabled: true,
                    runs: 800,
                },
                via_ir: true,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilerSettings {
    pub optimizer: OptimizerConfig,
    #[serde(rename = "viaIR")]
    pub via_ir: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptimizerConfig {
    pub enabled: bool,
    pub runs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasReporterConfig {
    pub enabled: bool,
    pub no_colors: bool,
    pub output_file: String,
}

impl Default for GasReporterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            no_colors: true,
            output_file: "reports/gas_usage/summary.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypechainConfig {
    pub out_dir: String,
    pub target: String,
}

impl Default for TypechainConfig {
    fn default() -> Self {
        Self {
            out_dir: "typechain".to_string(),
            target: "ethers-v5".to_string(),
        }
    }
}

/// Block explorer API keys, keyed by the verifier's own chain names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EtherscanConfig {
    pub goerli: String,
    pub sepolia: String,
    pub bsc_testnet: String,
    pub avalanche_fuji_testnet: String,
}

/// Resolved toolchain configuration with all fields populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolchainConfig {
    pub default_network: Network,
    pub networks: BTreeMap<Network, NetworkProfile>,
    pub named_accounts: BTreeMap<String, NamedAccount>,
    pub solidity: SolidityConfig,
    pub gas_reporter: GasReporterConfig,
    pub typechain: TypechainConfig,
    #[serde(serialize_with = "serialize_etherscan")]
    pub etherscan: EtherscanConfig,
}

impl ToolchainConfig {
    /// Get configuration as JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Get configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Renders the record in `format`.
    pub fn render(&self, format: Format) -> Result<String, ConfigError> {
        render(self, format)
    }

    /// Writes the record to `path`, or stdout.
    pub fn write(&self, format: Format, path: Option<&Path>) -> Result<(), ConfigError> {
        write(self, format, path)
    }

    /// Remote networks whose signing key fell back to the sentinel.
    pub fn sentinel_networks(&self) -> Vec<Network> {
        self.networks
            .iter()
            .filter(|(_, profile)| profile.uses_sentinel_key())
            .map(|(network, _)| *network)
            .collect()
    }

    /// Print the resolved configuration
    pub fn print_summary(&self) {
        println!("Default network:  {}", self.default_network);
        println!("Networks:");
        for (network, profile) in &self.networks {
            match (&profile.url, &profile.signing_key) {
                (Some(url), Some(key)) => {
                    println!("  {:<15} {url} (key: {})", network.as_str(), mask_key(key))
                }
                _ if profile.block_gas_limit.is_some() => println!(
                    "  {:<15} in-process (block gas limit: {})",
                    network.as_str(),
                    profile.block_gas_limit.unwrap_or_default()
                ),
                _ => println!(
                    "  {:<15} local node (timeout: {}ms)",
                    network.as_str(),
                    profile.timeout_ms.unwrap_or_default()
                ),
            }
        }

        let settings = &self.solidity.settings;
        println!(
            "Solidity:         {} (optimizer: {}, runs: {}, viaIR: {})",
            self.solidity.version, settings.optimizer.enabled, settings.optimizer.runs, settings.via_ir
        );
        if self.gas_reporter.enabled {
            println!("Gas reporter:     ENABLED -> {}", self.gas_reporter.output_file);
        } else {
            println!("Gas reporter:     disabled");
        }
        println!(
            "Typechain:        {} -> {}/",
            self.typechain.target, self.typechain.out_dir
        );

        let explorer = |key: &str| if key.is_empty() { "(not configured)" } else { "configured" };
        println!("Explorer keys:");
        println!("  etherscan       {}", explorer(&self.etherscan.goerli));
        println!("  bscscan         {}", explorer(&self.etherscan.bsc_testnet));
        println!("  snowtrace       {}", explorer(&self.etherscan.avalanche_fuji_testnet));
    }
}

/// Renders any part of the record in `format`.
pub fn render<T: Serialize>(value: &T, format: Format) -> Result<String, ConfigError> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(value)?,
        Format::Toml => toml::to_string_pretty(value)?,
    })
}

/// Writes any part of the record to `path`, creating parent directories, or to stdout.
pub fn write<T: Serialize>(
    value: &T,
    format: Format,
    path: Option<&Path>,
) -> Result<(), ConfigError> {
    let rendered = render(value, format)?;
    let mut out: Box<dyn Write> = match path {
        Some(file) => {
            if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            Box::new(fs::File::create(file)?)
        }
        None => Box::new(io::stdout().lock()),
    };
    writeln!(out, "{rendered}")?;
    Ok(())
}

fn serialize_etherscan<S: serde::Serializer>(
    etherscan: &EtherscanConfig,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry("apiKey", etherscan)?;
    map.end()
}

/// Shortens a key for display. The record itself always keeps the full value.
fn mask_key(key: &str) -> String {
    if key == SENTINEL_PRIVATE_KEY {
        return "sentinel".to_string();
    }
    match (key.get(..4), key.len().checked_sub(4).and_then(|i| key.get(i..))) {
        (Some(head), Some(tail)) if key.len() > 8 => format!("{head}…{tail}"),
        _ => "****".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn exported(inputs: &Inputs) -> Value {
        serde_json::from_str(&resolve(inputs).to_json().unwrap()).unwrap()
    }

    #[test]
    fn test_json_export_schema() {
        let value = exported(&Inputs::new().with(vars::ETHERSCAN_API_KEY, "eth"));

        assert_eq!(value["defaultNetwork"], "hardhat");
        assert_eq!(value["networks"]["hardhat"], json!({ "blockGasLimit": 120000000 }));
        assert_eq!(value["networks"]["localhost"], json!({ "timeout": 600000 }));
        assert_eq!(
            value["networks"]["bscTest"],
            json!({
                "url": "http://localhost:8545",
                "accounts": [format!("0x{SENTINEL_PRIVATE_KEY}")],
            })
        );
        assert_eq!(value["namedAccounts"], json!({ "deployer": { "default": 0 } }));
        assert_eq!(
            value["solidity"],
            json!({
                "version": "0.8.20",
                "settings": { "optimizer": { "enabled": true, "runs": 800 }, "viaIR": true },
            })
        );
        assert_eq!(
            value["gasReporter"],
            json!({
                "enabled": false,
                "noColors": true,
                "outputFile": "reports/gas_usage/summary.txt",
            })
        );
        assert_eq!(value["typechain"], json!({ "outDir": "typechain", "target": "ethers-v5" }));
        assert_eq!(
            value["etherscan"]["apiKey"],
            json!({
                "goerli": "eth",
                "sepolia": "eth",
                "bscTestnet": "",
                "avalancheFujiTestnet": "",
            })
        );
    }

    #[test]
    fn test_json_networks_keep_declaration_order() {
        let json = resolve(&Inputs::new()).to_json().unwrap();
        let positions: Vec<usize> = Network::ALL
            .iter()
            .map(|network| json.find(&format!("\"{network}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_toml_export() {
        let rendered = resolve(&Inputs::new().with(vars::REPORT_GAS, "true"))
            .to_toml()
            .unwrap();
        let value: toml::Value = toml::from_str(&rendered).unwrap();

        assert_eq!(value["defaultNetwork"].as_str(), Some("hardhat"));
        assert_eq!(value["gasReporter"]["enabled"].as_bool(), Some(true));
        assert_eq!(
            value["networks"]["goerli"]["url"].as_str(),
            Some(DEFAULT_ENDPOINT)
        );
        assert_eq!(value["solidity"]["settings"]["viaIR"].as_bool(), Some(true));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("config.json");
        let config = resolve(&Inputs::new());
        config.write(Format::Json, Some(path.as_path())).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written.trim_end(), config.to_json().unwrap());
    }

    #[test]
    fn test_write_profile_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("goerli.toml");
        let config = resolve(&Inputs::new());
        let profile = &config.networks[&Network::Goerli];
        write(profile, Format::Toml, Some(path.as_path())).unwrap();

        let value: toml::Value = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["url"].as_str(), Some(DEFAULT_ENDPOINT));
    }

    #[test]
    fn test_sentinel_networks() {
        let config = resolve(&Inputs::new().with(vars::GOERLI_PRIVATE_KEY, "12".repeat(32)));
        assert_eq!(
            config.sentinel_networks(),
            vec![Network::Sepolia, Network::BscTest, Network::AvalancheTest]
        );
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key(SENTINEL_PRIVATE_KEY), "sentinel");
        assert_eq!(mask_key("0123456789abcdef"), "0123…cdef");
        assert_eq!(mask_key("abc"), "****");
    }
}
