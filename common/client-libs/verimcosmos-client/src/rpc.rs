// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::ClientError;
use async_trait::async_trait;
use prost::Message;
use tendermint_rpc::endpoint::abci_query::AbciQuery;
use tendermint_rpc::Client;
use tracing::trace;

/// Generic unary transport: sends an encoded request to `service/method` and returns the
/// encoded response.
#[async_trait]
pub trait QueryRpc {
    async fn request(
        &self,
        service: &str,
        method: &str,
        data: Vec<u8>,
    ) -> Result<Vec<u8>, ClientError>;
}

pub(crate) fn parse_abci_query_result(query: AbciQuery) -> Result<AbciQuery, ClientError> {
    if query.code.is_err() {
        return Err(ClientError::AbciError {
            code: query.code.value(),
            log: query.log,
        });
    }
    Ok(query)
}

/// Performs protobuf queries by issuing abci queries against a tendermint node.
#[derive(Debug, Clone)]
pub struct AbciRpc<C> {
    client: C,
}

impl<C> AbciRpc<C> {
    pub fn new(client: C) -> Self {
        AbciRpc { client }
    }

    pub fn inner(&self) -> &C {
        &self.client
    }
}

impl<C> AbciRpc<C>
where
    C: Client + Sync,
{
    pub(crate) async fn make_abci_query<Req, Res>(
        &self,
        path: &str,
        req: Req,
    ) -> Result<Res, ClientError>
    where
        Req: Message,
        Res: Message + Default,
    {
        trace!("performing query on abci path {path}");
        let res = self
            .client
            .abci_query(Some(path.to_owned()), req.encode_to_vec(), None, false)
            .await?;
        let res_success = parse_abci_query_result(res)?;

        Ok(Res::decode(res_success.value.as_ref())?)
    }
}

#[async_trait]
impl<C> QueryRpc for AbciRpc<C>
where
    C: Client + Send + Sync,
{
    async fn request(
        &self,
        service: &str,
        method: &str,
        data: Vec<u8>,
    ) -> Result<Vec<u8>, ClientError> {
        let path = format!("/{service}/{method}");
        trace!("performing query on abci path {path}");

        let res = self.client.abci_query(Some(path), data, None, false).await?;
        Ok(parse_abci_query_result(res)?.value)
    }
}
