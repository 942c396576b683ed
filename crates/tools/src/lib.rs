//! Contracts Tools Library
//!
//! Resolves the network, compiler and plugin configuration handed to the contract
//! compile/deploy/verify toolchain.

pub mod config;

pub use config::{resolve, ConfigError, Inputs, Network, NetworkProfile, ToolchainConfig};
