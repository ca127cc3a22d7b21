// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::codec::{ensure_safe_integer, MessageCodec};
use crate::error::TypesError;
use crate::nym::{Nym, NymId};
use crate::pagination::{non_empty_next_key, PageRequest, PageResponse, Paged};
use crate::serde_helpers::{lenient_u64, null_as_default};
use serde::{Deserialize, Serialize};

pub const QUERY_SERVICE: &str = "verimid.verimcosmos.verimcosmos.Query";
pub const NYM_METHOD: &str = "Nym";
pub const NYM_ALL_METHOD: &str = "NymAll";

/// Path of the gateway route serving nyms.
pub const NYM_REST_PATH: &str = "verim-id/verimcosmos/verimcosmos/nym";

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, prost::Message)]
pub struct QueryGetNymRequest {
    #[prost(uint64, tag = "1")]
    #[serde(default, with = "lenient_u64")]
    pub id: NymId,
}

impl QueryGetNymRequest {
    pub fn new(id: NymId) -> Self {
        QueryGetNymRequest { id }
    }
}

impl MessageCodec for QueryGetNymRequest {
    fn check_ranges(&self) -> Result<(), TypesError> {
        ensure_safe_integer("id", self.id)
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, prost::Message)]
pub struct QueryGetNymResponse {
    #[prost(message, optional, tag = "1")]
    #[serde(rename = "Nym", default)]
    pub nym: Option<Nym>,
}

impl MessageCodec for QueryGetNymResponse {
    fn check_ranges(&self) -> Result<(), TypesError> {
        self.nym.as_ref().map_or(Ok(()), |nym| nym.check_ranges())
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, prost::Message)]
pub struct QueryAllNymRequest {
    #[prost(message, optional, tag = "1")]
    #[serde(default)]
    pub pagination: Option<PageRequest>,
}

impl QueryAllNymRequest {
    pub fn new(pagination: Option<PageRequest>) -> Self {
        QueryAllNymRequest { pagination }
    }
}

impl MessageCodec for QueryAllNymRequest {
    fn check_ranges(&self) -> Result<(), TypesError> {
        self.pagination
            .as_ref()
            .map_or(Ok(()), |pagination| pagination.check_ranges())
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, prost::Message)]
pub struct QueryAllNymResponse {
    #[prost(message, repeated, tag = "1")]
    #[serde(rename = "Nym", default, deserialize_with = "null_as_default")]
    pub nym: Vec<Nym>,

    #[prost(message, optional, tag = "2")]
    #[serde(default)]
    pub pagination: Option<PageResponse>,
}

impl MessageCodec for QueryAllNymResponse {
    fn check_ranges(&self) -> Result<(), TypesError> {
        for nym in &self.nym {
            nym.check_ranges()?;
        }
        self.pagination
            .as_ref()
            .map_or(Ok(()), |pagination| pagination.check_ranges())
    }
}

impl Paged for QueryAllNymResponse {
    fn next_key(&self) -> Option<Vec<u8>> {
        non_empty_next_key(self.pagination.as_ref())
    }

    fn merge_page(&mut self, page: Self) {
        self.nym.extend(page.nym);
        self.pagination = page.pagination;
    }
}
