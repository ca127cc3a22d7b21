// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TxClientError {
    #[error("TxClient:{operation}:Init could not initialize the signing client: signer is required")]
    SignerRequired { operation: &'static str },

    #[error("TxClient:{operation}:Create could not create the message: {source}")]
    MessageCreation {
        operation: &'static str,
        #[source]
        source: ClientError,
    },

    #[error("TxClient:{operation}:Send could not broadcast the transaction: {source}")]
    Broadcast {
        operation: &'static str,
        #[source]
        source: ClientError,
    },
}

impl TxClientError {
    pub fn operation(&self) -> &'static str {
        match self {
            TxClientError::SignerRequired { operation }
            | TxClientError::MessageCreation { operation, .. }
            | TxClientError::Broadcast { operation, .. } => operation,
        }
    }
}
