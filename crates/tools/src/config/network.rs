//! Deployment target networks and their resolved profiles.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::ConfigError;

/// Loopback endpoint used by every remote network without an override.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8545";

/// Placeholder signing key used when no key is configured.
///
/// This value is publicly known. It only exists so that test profiles resolve to
/// something; it must never sign anything that matters.
pub const SENTINEL_PRIVATE_KEY: &str =
    "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";

/// Block gas limit of the in-process network.
pub const HARDHAT_BLOCK_GAS_LIMIT: u64 = 120_000_000;

/// Request timeout for the local node, in milliseconds.
pub const LOCALHOST_TIMEOUT_MS: u64 = 600_000;

/// Supported deployment targets, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Network {
    /// In-process network run by the toolchain itself
    Hardhat,
    /// Node on the local machine
    Localhost,
    Goerli,
    Sepolia,
    BscTest,
    AvalancheTest,
}

impl Network {
    pub const ALL: [Network; 6] = [
        Network::Hardhat,
        Network::Localhost,
        Network::Goerli,
        Network::Sepolia,
        Network::BscTest,
        Network::AvalancheTest,
    ];

    /// Name used by the external toolchain.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Hardhat => "hardhat",
            Network::Localhost => "localhost",
            Network::Goerli => "goerli",
            Network::Sepolia => "sepolia",
            Network::BscTest => "bscTest",
            Network::AvalancheTest => "avalancheTest",
        }
    }

    /// Prefix of the environment variables overriding this network, if it has any.
    pub fn env_prefix(&self) -> Option<&'static str> {
        match self {
            Network::Hardhat | Network::Localhost => None,
            Network::Goerli => Some("GOERLI"),
            Network::Sepolia => Some("SEPOLIA"),
            Network::BscTest => Some("BSC_TEST"),
            Network::AvalancheTest => Some("AVALANCHE_TEST"),
        }
    }

    /// Whether the network is reached over an RPC endpoint with a signing key.
    pub fn is_remote(&self) -> bool {
        self.env_prefix().is_some()
    }

    /// Iterator over the networks that carry an endpoint and a signing key.
    pub fn remote() -> impl Iterator<Item = Network> {
        Self::ALL.into_iter().filter(Network::is_remote)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|network| network.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::InvalidNetwork(s.to_string()))
    }
}

impl Serialize for Network {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Settings for one deployment target.
///
/// Remote networks carry `url` and `signing_key`; the in-process and local networks carry
/// their fixed scalar overrides instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Hex key, verbatim as configured (no `0x` prefix expected)
    #[serde(
        rename = "accounts",
        serialize_with = "serialize_accounts",
        skip_serializing_if = "Option::is_none"
    )]
    pub signing_key: Option<String>,
    #[serde(rename = "timeout", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_gas_limit: Option<u64>,
}

impl NetworkProfile {
    pub fn remote(url: impl Into<String>, signing_key: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            signing_key: Some(signing_key.into()),
            ..Default::default()
        }
    }

    /// Accounts list handed to the toolchain.
    pub fn accounts(&self) -> Vec<String> {
        prefixed_accounts(&self.signing_key)
    }

    pub fn uses_sentinel_key(&self) -> bool {
        self.signing_key.as_deref() == Some(SENTINEL_PRIVATE_KEY)
    }
}

fn prefixed_accounts(key: &Option<String>) -> Vec<String> {
    key.iter().map(|key| format!("0x{key}")).collect()
}

fn serialize_accounts<S: Serializer>(
    key: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    prefixed_accounts(key).serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_from_str() {
        assert_eq!("goerli".parse::<Network>().unwrap(), Network::Goerli);
        assert_eq!("bscTest".parse::<Network>().unwrap(), Network::BscTest);
        assert_eq!("BSCTEST".parse::<Network>().unwrap(), Network::BscTest);
        assert_eq!(
            "avalanchetest".parse::<Network>().unwrap(),
            Network::AvalancheTest
        );
    }

    #[test]
    fn test_network_invalid() {
        assert!(matches!(
            "mainnet".parse::<Network>(),
            Err(ConfigError::InvalidNetwork(name)) if name == "mainnet"
        ));
    }

    #[test]
    fn test_network_display_round_trips_names() {
        for network in Network::ALL {
            assert_eq!(network.to_string().parse::<Network>().unwrap(), network);
        }
    }

    #[test]
    fn test_remote_networks() {
        let remote: Vec<_> = Network::remote().collect();
        assert_eq!(
            remote,
            vec![
                Network::Goerli,
                Network::Sepolia,
                Network::BscTest,
                Network::AvalancheTest
            ]
        );
        assert!(!Network::Hardhat.is_remote());
        assert!(!Network::Localhost.is_remote());
    }

    #[test]
    fn test_sentinel_key_shape() {
        assert_eq!(SENTINEL_PRIVATE_KEY.len(), 64);
        assert!(SENTINEL_PRIVATE_KEY.chars().all(|c| c == 'f'));
    }

    #[test]
    fn test_accounts_are_prefixed() {
        let profile = NetworkProfile::remote(DEFAULT_ENDPOINT, "abcd");
        assert_eq!(profile.accounts(), vec!["0xabcd".to_string()]);
        assert!(!profile.uses_sentinel_key());
        assert!(NetworkProfile::default().accounts().is_empty());
    }

    #[test]
    fn test_profile_serialization_omits_absent_fields() {
        let profile = NetworkProfile {
            timeout_ms: Some(LOCALHOST_TIMEOUT_MS),
            ..Default::default()
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json, serde_json::json!({ "timeout": 600000 }));

        let json = serde_json::to_value(NetworkProfile::remote("http://rpc", "00")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "url": "http://rpc", "accounts": ["0x00"] })
        );
    }

    #[test]
    fn test_serialized_accounts_match_accounts() {
        let profile = NetworkProfile::remote(DEFAULT_ENDPOINT, "beef");
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["accounts"], serde_json::json!(profile.accounts()));
    }
}
