// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::ClientError;
use crate::query::NymQueryClient;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::trace;
use url::Url;
use verimcosmos_types::query::NYM_REST_PATH;
use verimcosmos_types::{
    MessageCodec, NymId, PageRequest, QueryAllNymResponse, QueryGetNymResponse,
};

/// Query client talking to the REST (grpc-gateway) endpoint of a node.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    api_endpoint: Url,
}

impl GatewayClient {
    pub fn new(api_endpoint: Url) -> Self {
        GatewayClient {
            client: reqwest::Client::new(),
            api_endpoint,
        }
    }

    pub fn api_endpoint(&self) -> &Url {
        &self.api_endpoint
    }

    fn nym_url(&self, id: Option<NymId>) -> Result<Url, ClientError> {
        let mut url = self.api_endpoint.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ClientError::MalformedUrl {
                    raw: self.api_endpoint.to_string(),
                    source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
                })?;
            segments.pop_if_empty().extend(NYM_REST_PATH.split('/'));
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        Ok(url)
    }

    async fn get_json<M: MessageCodec>(&self, url: Url) -> Result<M, ClientError> {
        trace!("querying {url}");
        let res = self.client.get(url).send().await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedGatewayResponse { status, body });
        }

        let value: serde_json::Value = res.json().await?;
        Ok(M::from_json(value)?)
    }
}

fn pagination_params(pagination: &PageRequest) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if !pagination.key.is_empty() {
        params.push(("pagination.key", STANDARD.encode(&pagination.key)));
    }
    if pagination.offset != 0 {
        params.push(("pagination.offset", pagination.offset.to_string()));
    }
    if pagination.limit != 0 {
        params.push(("pagination.limit", pagination.limit.to_string()));
    }
    if pagination.count_total {
        params.push(("pagination.count_total", "true".to_string()));
    }
    if pagination.reverse {
        params.push(("pagination.reverse", "true".to_string()));
    }
    params
}

#[async_trait]
impl NymQueryClient for GatewayClient {
    async fn query_nym(&self, id: NymId) -> Result<QueryGetNymResponse, ClientError> {
        let url = self.nym_url(Some(id))?;
        self.get_json(url).await
    }

    async fn query_nym_all(
        &self,
        pagination: Option<PageRequest>,
    ) -> Result<QueryAllNymResponse, ClientError> {
        let mut url = self.nym_url(None)?;
        let params = pagination
            .as_ref()
            .map(pagination_params)
            .unwrap_or_default();
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        self.get_json(url).await
    }
}
