// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::codec::MessageCodec;
use crate::error::TypesError;
use crate::nym::Nym;
use crate::serde_helpers::null_as_default;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Records imported or exported when the chain is bootstrapped.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, prost::Message)]
pub struct GenesisState {
    #[prost(message, repeated, tag = "1")]
    #[serde(rename = "nymList", default, deserialize_with = "null_as_default")]
    pub nym_list: Vec<Nym>,
}

impl MessageCodec for GenesisState {
    fn check_ranges(&self) -> Result<(), TypesError> {
        for nym in &self.nym_list {
            nym.check_ranges()?;
        }
        Ok(())
    }
}

impl GenesisState {
    pub fn new(nym_list: Vec<Nym>) -> Self {
        GenesisState { nym_list }
    }

    pub fn validate(&self) -> Result<(), TypesError> {
        let mut seen = HashSet::with_capacity(self.nym_list.len());
        for nym in &self.nym_list {
            if !seen.insert(nym.id) {
                return Err(TypesError::DuplicateNymId { id: nym.id });
            }
        }
        self.check_ranges()
    }
}
