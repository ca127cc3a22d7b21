// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

// mirrors `cosmos.base.query.v1beta1.PageRequest`/`PageResponse`, but with serde and
// structural hashing so requests can be used directly as cache keys

use crate::codec::{ensure_safe_integer, MessageCodec};
use crate::error::TypesError;
use crate::serde_helpers::{base64_bytes, lenient_u64, null_as_default};
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, prost::Message)]
pub struct PageRequest {
    #[prost(bytes = "vec", tag = "1")]
    #[serde(default, with = "base64_bytes")]
    pub key: Vec<u8>,

    #[prost(uint64, tag = "2")]
    #[serde(default, with = "lenient_u64")]
    pub offset: u64,

    #[prost(uint64, tag = "3")]
    #[serde(default, with = "lenient_u64")]
    pub limit: u64,

    #[prost(bool, tag = "4")]
    #[serde(default, alias = "countTotal", deserialize_with = "null_as_default")]
    pub count_total: bool,

    #[prost(bool, tag = "5")]
    #[serde(default, deserialize_with = "null_as_default")]
    pub reverse: bool,
}

impl PageRequest {
    pub fn with_limit(limit: u64) -> Self {
        PageRequest {
            limit,
            ..Default::default()
        }
    }

    /// Continues from the provided key. Since the key already carries the position,
    /// any offset is cleared.
    #[must_use]
    pub fn with_key(self, key: Vec<u8>) -> Self {
        PageRequest {
            key,
            offset: 0,
            ..self
        }
    }
}

impl MessageCodec for PageRequest {
    fn check_ranges(&self) -> Result<(), TypesError> {
        ensure_safe_integer("pagination.offset", self.offset)?;
        ensure_safe_integer("pagination.limit", self.limit)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, prost::Message)]
pub struct PageResponse {
    #[prost(bytes = "vec", tag = "1")]
    #[serde(default, alias = "nextKey", with = "base64_bytes")]
    pub next_key: Vec<u8>,

    #[prost(uint64, tag = "2")]
    #[serde(default, with = "lenient_u64")]
    pub total: u64,
}

impl MessageCodec for PageResponse {
    fn check_ranges(&self) -> Result<(), TypesError> {
        ensure_safe_integer("pagination.total", self.total)
    }
}

/// A list response that can be merged with its subsequent pages.
pub trait Paged {
    /// Key of the next page, if the server indicated there is one.
    fn next_key(&self) -> Option<Vec<u8>>;

    /// Folds the subsequent page into `self`: list fields are concatenated in arrival order
    /// while scalar fields are overwritten by the values of the latest page.
    fn merge_page(&mut self, page: Self);
}

pub(crate) fn non_empty_next_key(pagination: Option<&PageResponse>) -> Option<Vec<u8>> {
    pagination
        .map(|p| &p.next_key)
        .filter(|key| !key.is_empty())
        .cloned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn with_key_resets_offset() {
        let request = PageRequest {
            offset: 10,
            limit: 5,
            count_total: true,
            ..Default::default()
        };
        let next = request.with_key(vec![1, 2, 3]);
        assert_eq!(next.key, vec![1, 2, 3]);
        assert_eq!(next.offset, 0);
        assert_eq!(next.limit, 5);
        assert!(next.count_total);
    }

    #[test]
    fn gateway_json_is_understood() {
        let response = PageResponse::from_json(json!({
            "next_key": "AQID",
            "total": "12",
        }))
        .unwrap();
        assert_eq!(response.next_key, vec![1, 2, 3]);
        assert_eq!(response.total, 12);

        let last = PageResponse::from_json(json!({ "next_key": null, "total": "0" })).unwrap();
        assert_eq!(non_empty_next_key(Some(&last)), None);
    }

    #[test]
    fn equal_requests_hash_equally() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(PageRequest::with_limit(10).with_key(vec![7]));
        assert!(set.contains(&PageRequest {
            key: vec![7],
            limit: 10,
            ..Default::default()
        }));
    }
}
