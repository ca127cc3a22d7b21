// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::TypesError;
use prost::Message;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Largest integer representable without loss by an IEEE-754 double (2^53 - 1).
///
/// Ids travel on the wire as 64-bit varints, but consumers of the module treat them as
/// plain numbers, so anything above this bound is rejected during decoding.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

pub fn ensure_safe_integer(field: &'static str, value: u64) -> Result<(), TypesError> {
    if value > MAX_SAFE_INTEGER {
        return Err(TypesError::UnsafeInteger { field, value });
    }
    Ok(())
}

/// Binary and JSON codec shared by every message of the module.
///
/// The wire layout itself comes from the `prost` field attributes on each type (field number,
/// wire type and zero value), so zero-valued fields are never written and unknown tags are
/// skipped on decode. This trait only adds the range checks and the JSON helpers on top.
pub trait MessageCodec: Message + Default + Serialize + DeserializeOwned {
    /// Verifies every integer field fits within [`MAX_SAFE_INTEGER`].
    fn check_ranges(&self) -> Result<(), TypesError> {
        Ok(())
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, TypesError> {
        let message = Self::decode(bytes)?;
        message.check_ranges()?;
        Ok(message)
    }

    /// Builds the message out of arbitrary JSON, defaulting every missing or `null` field.
    fn from_json(value: serde_json::Value) -> Result<Self, TypesError> {
        let message: Self = serde_json::from_value(value)?;
        message.check_ranges()?;
        Ok(message)
    }

    fn from_json_str(raw: &str) -> Result<Self, TypesError> {
        let message: Self = serde_json::from_str(raw)?;
        message.check_ranges()?;
        Ok(message)
    }

    fn to_json(&self) -> Result<serde_json::Value, TypesError> {
        Ok(serde_json::to_value(self)?)
    }
}
