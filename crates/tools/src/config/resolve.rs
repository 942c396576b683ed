//! Resolution of external inputs into a [`ToolchainConfig`].
//!
//! Every recognized setting follows the same rule: a present, non-empty input wins,
//! otherwise the fixed default is used. Resolution is total and never fails; values that
//! are present but malformed are passed through for the toolchain to reject.

use std::collections::{BTreeMap, HashMap};

use super::network::{
    Network, NetworkProfile, DEFAULT_ENDPOINT, HARDHAT_BLOCK_GAS_LIMIT, LOCALHOST_TIMEOUT_MS,
    SENTINEL_PRIVATE_KEY,
};
use super::{
    EtherscanConfig, GasReporterConfig, NamedAccount, SolidityConfig, ToolchainConfig,
    TypechainConfig,
};

/// Names of the recognized environment variables.
pub mod vars {
    pub const DEFAULT_ENDPOINT: &str = "DEFAULT_ENDPOINT";
    pub const DEFAULT_PRIVATE_KEY: &str = "DEFAULT_PRIVATE_KEY";
    pub const REPORT_GAS: &str = "REPORT_GAS";
    pub const ETHERSCAN_API_KEY: &str = "ETHERSCAN_API_KEY";
    pub const BSCSCAN_API_KEY: &str = "BSCSCAN_API_KEY";
    pub const SNOWTRACE_API_KEY: &str = "SNOWTRACE_API_KEY";

    pub const GOERLI_ENDPOINT: &str = "GOERLI_ENDPOINT";
    pub const GOERLI_PRIVATE_KEY: &str = "GOERLI_PRIVATE_KEY";
    pub const SEPOLIA_ENDPOINT: &str = "SEPOLIA_ENDPOINT";
    pub const SEPOLIA_PRIVATE_KEY: &str = "SEPOLIA_PRIVATE_KEY";
    pub const BSC_TEST_ENDPOINT: &str = "BSC_TEST_ENDPOINT";
    pub const BSC_TEST_PRIVATE_KEY: &str = "BSC_TEST_PRIVATE_KEY";
    pub const AVALANCHE_TEST_ENDPOINT: &str = "AVALANCHE_TEST_ENDPOINT";
    pub const AVALANCHE_TEST_PRIVATE_KEY: &str = "AVALANCHE_TEST_PRIVATE_KEY";

    /// Every name the resolver reads.
    pub const RECOGNIZED: &[&str] = &[
        DEFAULT_ENDPOINT,
        DEFAULT_PRIVATE_KEY,
        REPORT_GAS,
        ETHERSCAN_API_KEY,
        BSCSCAN_API_KEY,
        SNOWTRACE_API_KEY,
        GOERLI_ENDPOINT,
        GOERLI_PRIVATE_KEY,
        SEPOLIA_ENDPOINT,
        SEPOLIA_PRIVATE_KEY,
        BSC_TEST_ENDPOINT,
        BSC_TEST_PRIVATE_KEY,
        AVALANCHE_TEST_ENDPOINT,
        AVALANCHE_TEST_PRIVATE_KEY,
    ];

    pub fn is_recognized(name: &str) -> bool {
        RECOGNIZED.contains(&name)
    }
}

/// Materialized external inputs, keyed by variable name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs {
    values: HashMap<String, String>,
}

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns the value for `name`, treating an empty string as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Inputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Inputs {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}

/// Resolve `inputs` into the full toolchain configuration.
pub fn resolve(inputs: &Inputs) -> ToolchainConfig {
    let default_endpoint = inputs.get_or(vars::DEFAULT_ENDPOINT, DEFAULT_ENDPOINT);
    let default_key = inputs.get_or(vars::DEFAULT_PRIVATE_KEY, SENTINEL_PRIVATE_KEY);

    let networks = Network::ALL
        .into_iter()
        .map(|network| {
            let profile = match network.env_prefix() {
                None if network == Network::Hardhat => NetworkProfile {
                    block_gas_limit: Some(HARDHAT_BLOCK_GAS_LIMIT),
                    ..Default::default()
                },
                None => NetworkProfile {
                    timeout_ms: Some(LOCALHOST_TIMEOUT_MS),
                    ..Default::default()
                },
                Some(prefix) => NetworkProfile::remote(
                    inputs.get_or(&format!("{prefix}_ENDPOINT"), default_endpoint),
                    inputs.get_or(&format!("{prefix}_PRIVATE_KEY"), default_key),
                ),
            };
            (network, profile)
        })
        .collect::<BTreeMap<_, _>>();

    let etherscan_key = inputs.get_or(vars::ETHERSCAN_API_KEY, "");
    let etherscan = EtherscanConfig {
        goerli: etherscan_key.to_string(),
        sepolia: etherscan_key.to_string(),
        bsc_testnet: inputs.get_or(vars::BSCSCAN_API_KEY, "").to_string(),
        avalanche_fuji_testnet: inputs.get_or(vars::SNOWTRACE_API_KEY, "").to_string(),
    };

    ToolchainConfig {
        default_network: Network::Hardhat,
        networks,
        named_accounts: BTreeMap::from([("deployer".to_string(), NamedAccount { default: 0 })]),
        solidity: SolidityConfig::default(),
        gas_reporter: GasReporterConfig {
            enabled: inputs.get(vars::REPORT_GAS) == Some("true"),
            ..Default::default()
        },
        typechain: TypechainConfig::default(),
        etherscan,
    }
}
