// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::nym::NymId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("failed to decode the protobuf data - {0}")]
    ProtobufDecodingError(#[from] prost::DecodeError),

    #[error("failed to (de)serialize json data - {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("value {value} of field '{field}' is larger than the maximum safe integer")]
    UnsafeInteger { field: &'static str, value: u64 },

    #[error("invalid creator address ({address}): {reason}")]
    InvalidCreatorAddress { address: String, reason: String },

    #[error("expected message of type {expected}, got {got}")]
    UnexpectedTypeUrl { expected: &'static str, got: String },

    #[error("duplicated id for nym: {id}")]
    DuplicateNymId { id: NymId },
}
