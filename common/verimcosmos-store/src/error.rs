// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;
use verimcosmos_client::ClientError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("QueryClient:{operation} API Node Unavailable. Could not perform query: {source}")]
    QueryUnavailable {
        operation: &'static str,
        #[source]
        source: ClientError,
    },

    #[error("failed to establish websocket connection to {url}: {source}")]
    WebSocketConnectionFailure {
        url: String,
        #[source]
        source: tendermint_rpc::Error,
    },

    #[error("failed to create chain subscription: {source}")]
    ChainSubscriptionFailure {
        #[source]
        source: tendermint_rpc::Error,
    },

    #[error("the new block subscription returned an error: {source}")]
    SubscriptionEventFailure {
        #[source]
        source: tendermint_rpc::Error,
    },

    #[error("gave up forwarding new blocks after {failures} consecutive failures")]
    MaximumSubscriptionFailures { failures: usize },

    #[error("received an event of kind '{kind}' which is not a new block")]
    UnexpectedSubscriptionEvent { kind: String },

    #[error("received a new block event without any block data")]
    EmptyBlockData,
}
