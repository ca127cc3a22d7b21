// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

pub mod gateway;

use crate::error::ClientError;
use crate::rpc::QueryRpc;
use async_trait::async_trait;
use tracing::debug;
use verimcosmos_types::query::{NYM_ALL_METHOD, NYM_METHOD, QUERY_SERVICE};
use verimcosmos_types::{
    MessageCodec, Nym, NymId, PageRequest, Paged, QueryAllNymRequest, QueryAllNymResponse,
    QueryGetNymRequest, QueryGetNymResponse,
};

#[async_trait]
pub trait NymQueryClient: Send + Sync {
    async fn query_nym(&self, id: NymId) -> Result<QueryGetNymResponse, ClientError>;

    async fn query_nym_all(
        &self,
        pagination: Option<PageRequest>,
    ) -> Result<QueryAllNymResponse, ClientError>;

    async fn get_nym(&self, id: NymId) -> Result<Option<Nym>, ClientError> {
        Ok(self.query_nym(id).await?.nym)
    }

    /// Keeps requesting subsequent pages, starting from the provided request, until the
    /// server stops returning a next key. Nyms from all pages are concatenated in order
    /// and the returned pagination is the one of the final page.
    async fn get_all_nyms(
        &self,
        pagination: Option<PageRequest>,
    ) -> Result<QueryAllNymResponse, ClientError> {
        let mut merged = self.query_nym_all(pagination.clone()).await?;
        let mut request = pagination.unwrap_or_default();

        while let Some(next_key) = merged.next_key() {
            debug!(
                "retrieved {} nyms so far, requesting the next page",
                merged.nym.len()
            );
            request = request.with_key(next_key);
            let page = self.query_nym_all(Some(request.clone())).await?;
            merged.merge_page(page);
        }

        Ok(merged)
    }
}

/// Query client speaking binary protobuf over an arbitrary [`QueryRpc`] transport.
#[derive(Debug, Clone)]
pub struct RpcQueryClient<R> {
    rpc: R,
}

impl<R> RpcQueryClient<R> {
    pub fn new(rpc: R) -> Self {
        RpcQueryClient { rpc }
    }

    pub fn rpc(&self) -> &R {
        &self.rpc
    }
}

#[async_trait]
impl<R> NymQueryClient for RpcQueryClient<R>
where
    R: QueryRpc + Send + Sync,
{
    async fn query_nym(&self, id: NymId) -> Result<QueryGetNymResponse, ClientError> {
        let req = QueryGetNymRequest::new(id);
        let raw = self
            .rpc
            .request(QUERY_SERVICE, NYM_METHOD, req.to_bytes())
            .await?;
        Ok(QueryGetNymResponse::from_bytes(&raw)?)
    }

    async fn query_nym_all(
        &self,
        pagination: Option<PageRequest>,
    ) -> Result<QueryAllNymResponse, ClientError> {
        let req = QueryAllNymRequest::new(pagination);
        let raw = self
            .rpc
            .request(QUERY_SERVICE, NYM_ALL_METHOD, req.to_bytes())
            .await?;
        Ok(QueryAllNymResponse::from_bytes(&raw)?)
    }
}
