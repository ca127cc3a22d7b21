// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

pub mod coin;
pub mod config;
pub mod error;
pub mod query;
pub mod rpc;
pub mod signing;
pub mod tx;

pub use coin::Coin;
pub use config::Config;
pub use error::ClientError;
pub use query::gateway::GatewayClient;
pub use query::{NymQueryClient, RpcQueryClient};
pub use rpc::{AbciRpc, QueryRpc};
pub use signing::wallet::DirectSecp256k1HdWallet;
pub use tx::error::TxClientError;
pub use tx::fee::Fee;
pub use tx::{created_nym_id, TxClient, TxResponse};

// re-export the rpc crate so that users would not need to depend on a matching version themselves
pub use tendermint_rpc::{HttpClient, HttpClientUrl};
