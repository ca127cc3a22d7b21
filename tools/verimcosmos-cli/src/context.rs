// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use anyhow::anyhow;
use async_trait::async_trait;
use url::Url;
use verimcosmos_client::config::{
    var_names, ChainDetails, DEFAULT_API_ENDPOINT, DEFAULT_BECH32_PREFIX, DEFAULT_DENOM,
    DEFAULT_RPC_ENDPOINT,
};
use verimcosmos_client::rpc::AbciRpc;
use verimcosmos_client::tx::fee::DEFAULT_GAS_LIMIT;
use verimcosmos_client::{
    ClientError, Coin, Config, DirectSecp256k1HdWallet, Fee, GatewayClient, HttpClient,
    NymQueryClient, RpcQueryClient, TxClient,
};
use verimcosmos_types::{NymId, PageRequest, QueryAllNymResponse, QueryGetNymResponse};

pub(crate) const MNEMONIC_ENV: &str = "MNEMONIC";

/// Query transport selected on the command line.
pub(crate) enum QueryClient {
    Rpc(RpcQueryClient<AbciRpc<HttpClient>>),
    Gateway(GatewayClient),
}

#[async_trait]
impl NymQueryClient for QueryClient {
    async fn query_nym(&self, id: NymId) -> Result<QueryGetNymResponse, ClientError> {
        match self {
            QueryClient::Rpc(client) => client.query_nym(id).await,
            QueryClient::Gateway(client) => client.query_nym(id).await,
        }
    }

    async fn query_nym_all(
        &self,
        pagination: Option<PageRequest>,
    ) -> Result<QueryAllNymResponse, ClientError> {
        match self {
            QueryClient::Rpc(client) => client.query_nym_all(pagination).await,
            QueryClient::Gateway(client) => client.query_nym_all(pagination).await,
        }
    }
}

#[derive(clap::Args, Clone)]
pub(crate) struct ClientArgs {
    /// Tendermint RPC endpoint of the node
    #[clap(
        long,
        global = true,
        env = var_names::RPC_ENDPOINT,
        default_value = DEFAULT_RPC_ENDPOINT
    )]
    pub(crate) rpc_endpoint: Url,

    /// REST gateway endpoint of the node
    #[clap(
        long,
        global = true,
        env = var_names::API_ENDPOINT,
        default_value = DEFAULT_API_ENDPOINT
    )]
    pub(crate) api_endpoint: Url,

    /// Bech32 prefix of the account addresses
    #[clap(
        long,
        global = true,
        env = var_names::BECH32_PREFIX,
        default_value = DEFAULT_BECH32_PREFIX
    )]
    pub(crate) prefix: String,

    /// Denomination of the fee amount
    #[clap(
        long,
        global = true,
        env = var_names::DENOM,
        default_value = DEFAULT_DENOM
    )]
    pub(crate) denom: String,

    /// Gas limit attached to every transaction
    #[clap(
        long,
        global = true,
        env = var_names::GAS_LIMIT,
        default_value_t = DEFAULT_GAS_LIMIT
    )]
    pub(crate) gas_limit: u64,

    /// Fee paid for every transaction, e.g. `5000stake`. Defaults to a gas-only fee
    #[clap(long, global = true)]
    pub(crate) fee: Option<Coin>,

    /// Query through the REST gateway instead of ABCI queries over RPC
    #[clap(long, global = true)]
    pub(crate) use_gateway: bool,

    /// Mnemonic of the account signing the transactions
    #[clap(long, global = true, env = MNEMONIC_ENV, hide_env_values = true)]
    pub(crate) mnemonic: Option<bip39::Mnemonic>,
}

impl ClientArgs {
    pub(crate) fn config(&self) -> Config {
        Config::new(self.rpc_endpoint.clone(), self.api_endpoint.clone())
            .with_chain_details(ChainDetails {
                bech32_account_prefix: self.prefix.clone(),
                denom: self.denom.clone(),
            })
            .with_gas_limit(self.gas_limit)
    }

    /// Explicit fee if an amount was provided, otherwise the client's default one is used.
    pub(crate) fn fee(&self) -> Option<Fee> {
        self.fee
            .clone()
            .map(|coin| Fee::new(vec![coin], self.gas_limit))
    }

    pub(crate) fn query_client(&self) -> anyhow::Result<QueryClient> {
        if self.use_gateway {
            return Ok(QueryClient::Gateway(GatewayClient::new(
                self.api_endpoint.clone(),
            )));
        }
        let client = HttpClient::new(self.rpc_endpoint.as_str())?;
        Ok(QueryClient::Rpc(RpcQueryClient::new(AbciRpc::new(client))))
    }

    pub(crate) fn tx_client(
        &self,
    ) -> anyhow::Result<TxClient<HttpClient, DirectSecp256k1HdWallet>> {
        let signer = self
            .mnemonic
            .clone()
            .map(|mnemonic| DirectSecp256k1HdWallet::from_mnemonic(&self.prefix, mnemonic))
            .transpose()?;
        Ok(TxClient::connect(&self.config(), signer)?)
    }

    pub(crate) fn websocket_endpoint(&self) -> anyhow::Result<Url> {
        websocket_endpoint(&self.rpc_endpoint)
    }
}

/// Tendermint serves its websocket under `/websocket` of the RPC address.
pub(crate) fn websocket_endpoint(rpc_endpoint: &Url) -> anyhow::Result<Url> {
    let mut endpoint = rpc_endpoint.clone();
    let scheme = match rpc_endpoint.scheme() {
        "https" | "wss" => "wss",
        _ => "ws",
    };
    endpoint
        .set_scheme(scheme)
        .map_err(|_| anyhow!("cannot derive websocket endpoint from {rpc_endpoint}"))?;
    endpoint.set_path("websocket");
    Ok(endpoint)
}
