// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::coin::CoinConversionError;
use crate::signing::signer::SigningError;
use crate::signing::wallet::WalletError;
use cosmrs::AccountId;
use thiserror::Error;
use verimcosmos_types::TypesError;

pub use tendermint_rpc::error::Error as TendermintRpcError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("there was an issue with a tendermint RPC request - {0}")]
    TendermintError(#[from] TendermintRpcError),

    #[error("abci query failed with code {code} - {log}")]
    AbciError { code: u32, log: String },

    #[error("there was an issue with the http request - {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("the gateway returned an error ({status}): {body}")]
    UnexpectedGatewayResponse {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error(transparent)]
    TypesError(#[from] TypesError),

    #[error("there was an issue when attempting to decode our protobuf data - {0}")]
    ProtobufDecodingError(#[from] prost::DecodeError),

    #[error("'{raw}' is not a valid url - {source}")]
    MalformedUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },

    #[error("environment variable {name} has a malformed value: '{value}'")]
    MalformedEnvironmentVariable { name: &'static str, value: String },

    #[error("account {0} does not exist on the chain")]
    NonExistentAccount(AccountId),

    #[error("unsupported account type: {type_url}")]
    UnsupportedAccountType { type_url: String },

    #[error("the signer does not hold any accounts")]
    NoSignerAccounts,

    #[error("there was an issue when attempting to serialize {0}")]
    SerializationError(String),

    #[error(transparent)]
    SigningError(#[from] SigningError),

    #[error(transparent)]
    WalletError(#[from] WalletError),

    #[error(transparent)]
    CoinConversionError(#[from] CoinConversionError),
}
