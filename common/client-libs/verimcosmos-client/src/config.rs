// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::ClientError;
use crate::tx::fee::DEFAULT_GAS_LIMIT;
use cosmrs::Gas;
use std::env;
use tracing::debug;
use url::Url;

pub const DEFAULT_RPC_ENDPOINT: &str = "http://localhost:26657";
pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:1317";
pub const DEFAULT_BECH32_PREFIX: &str = "cosmos";
pub const DEFAULT_DENOM: &str = "stake";

pub mod var_names {
    pub const RPC_ENDPOINT: &str = "RPC_ENDPOINT";
    pub const API_ENDPOINT: &str = "API_ENDPOINT";
    pub const BECH32_PREFIX: &str = "BECH32_PREFIX";
    pub const DENOM: &str = "DENOM";
    pub const GAS_LIMIT: &str = "GAS_LIMIT";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainDetails {
    pub bech32_account_prefix: String,
    pub denom: String,
}

impl Default for ChainDetails {
    fn default() -> Self {
        ChainDetails {
            bech32_account_prefix: DEFAULT_BECH32_PREFIX.to_string(),
            denom: DEFAULT_DENOM.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Tendermint RPC endpoint of the node, used for broadcasting, abci queries and block events.
    pub rpc_endpoint: Url,

    /// Address of the REST gateway of the node.
    pub api_endpoint: Url,

    pub chain_details: ChainDetails,

    pub gas_limit: Gas,
}

impl Config {
    pub fn new(rpc_endpoint: Url, api_endpoint: Url) -> Self {
        Config {
            rpc_endpoint,
            api_endpoint,
            chain_details: ChainDetails::default(),
            gas_limit: DEFAULT_GAS_LIMIT,
        }
    }

    /// Reads the configuration from the environment (loading `.env` first, if present),
    /// falling back to the defaults for anything that is not set.
    pub fn from_env() -> Result<Self, ClientError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("loaded environment from {}", path.display());
        }

        let rpc_endpoint = parse_url_var(var_names::RPC_ENDPOINT, DEFAULT_RPC_ENDPOINT)?;
        let api_endpoint = parse_url_var(var_names::API_ENDPOINT, DEFAULT_API_ENDPOINT)?;

        let bech32_account_prefix =
            env::var(var_names::BECH32_PREFIX).unwrap_or_else(|_| DEFAULT_BECH32_PREFIX.into());
        let denom = env::var(var_names::DENOM).unwrap_or_else(|_| DEFAULT_DENOM.into());

        let gas_limit = match env::var(var_names::GAS_LIMIT) {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ClientError::MalformedEnvironmentVariable {
                    name: var_names::GAS_LIMIT,
                    value: raw,
                })?,
            Err(_) => DEFAULT_GAS_LIMIT,
        };

        Ok(Config {
            rpc_endpoint,
            api_endpoint,
            chain_details: ChainDetails {
                bech32_account_prefix,
                denom,
            },
            gas_limit,
        })
    }

    #[must_use]
    pub fn with_chain_details(mut self, chain_details: ChainDetails) -> Self {
        self.chain_details = chain_details;
        self
    }

    #[must_use]
    pub fn with_gas_limit(mut self, gas_limit: Gas) -> Self {
        self.gas_limit = gas_limit;
        self
    }
}

fn parse_url_var(name: &'static str, default: &str) -> Result<Url, ClientError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .map_err(|source| ClientError::MalformedUrl { raw, source })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_config_uses_default_chain_details() {
        let config = Config::new(
            DEFAULT_RPC_ENDPOINT.parse().unwrap(),
            DEFAULT_API_ENDPOINT.parse().unwrap(),
        );
        assert_eq!(config.chain_details.bech32_account_prefix, "cosmos");
        assert_eq!(config.chain_details.denom, "stake");
        assert_eq!(config.gas_limit, 200_000);
    }

    const ALL_VARS: [&str; 5] = [
        var_names::RPC_ENDPOINT,
        var_names::API_ENDPOINT,
        var_names::BECH32_PREFIX,
        var_names::DENOM,
        var_names::GAS_LIMIT,
    ];

    fn clear_vars() {
        for name in ALL_VARS {
            env::remove_var(name);
        }
    }

    // every environment case lives in a single test since the process environment is shared
    // between the concurrently running tests
    #[test]
    fn config_is_read_from_the_environment() {
        clear_vars();
        let defaults = Config::from_env().unwrap();
        assert_eq!(
            defaults,
            Config::new(
                DEFAULT_RPC_ENDPOINT.parse().unwrap(),
                DEFAULT_API_ENDPOINT.parse().unwrap(),
            )
        );

        env::set_var(var_names::RPC_ENDPOINT, "http://10.0.0.1:26657");
        env::set_var(var_names::API_ENDPOINT, "http://10.0.0.1:1317");
        env::set_var(var_names::BECH32_PREFIX, "verim");
        env::set_var(var_names::DENOM, "uverim");
        env::set_var(var_names::GAS_LIMIT, "350000");
        let custom = Config::from_env().unwrap();
        assert_eq!(custom.rpc_endpoint.as_str(), "http://10.0.0.1:26657/");
        assert_eq!(custom.api_endpoint.as_str(), "http://10.0.0.1:1317/");
        assert_eq!(custom.chain_details.bech32_account_prefix, "verim");
        assert_eq!(custom.chain_details.denom, "uverim");
        assert_eq!(custom.gas_limit, 350_000);

        env::set_var(var_names::GAS_LIMIT, "not-a-number");
        assert!(matches!(
            Config::from_env(),
            Err(ClientError::MalformedEnvironmentVariable { name, value })
                if name == var_names::GAS_LIMIT && value == "not-a-number"
        ));

        env::remove_var(var_names::GAS_LIMIT);
        env::set_var(var_names::RPC_ENDPOINT, "not a url");
        assert!(matches!(
            Config::from_env(),
            Err(ClientError::MalformedUrl { raw, .. }) if raw == "not a url"
        ));

        clear_vars();
    }
}
