// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::config::Config;
use crate::error::ClientError;
use crate::rpc::AbciRpc;
use crate::signing::signer::OfflineSigner;
use crate::signing::tx_signer::TxSigner;
use crate::signing::SignerData;
use crate::tx::error::TxClientError;
use crate::tx::fee::Fee;
use cosmrs::proto::cosmos::auth::v1beta1::{BaseAccount, QueryAccountRequest, QueryAccountResponse};
use cosmrs::{tx, AccountId, Any};
use prost::Message;
use tendermint_rpc::endpoint::broadcast;
use tendermint_rpc::{Client, HttpClient};
use tracing::{debug, info, warn};
use verimcosmos_types::{
    MsgCreateNym, MsgCreateNymResponse, MsgDeleteNym, MsgUpdateNym, NymMsg, PartialNym,
};

pub mod error;
pub mod fee;

const BASE_ACCOUNT_TYPE_URL: &str = "/cosmos.auth.v1beta1.BaseAccount";
const ACCOUNT_QUERY_PATH: &str = "/cosmos.auth.v1beta1.Query/Account";

pub type TxResponse = broadcast::tx_commit::Response;

/// Name of the operation as used in error reporting, i.e. `MsgCreateNym`.
fn operation_name<M: NymMsg>() -> &'static str {
    M::TYPE_URL.rsplit('.').next().unwrap_or(M::TYPE_URL)
}

/// Builds, signs and broadcasts the module's transaction messages.
///
/// The client can be created without a signer, in which case every operation fails with
/// [`TxClientError::SignerRequired`].
pub struct TxClient<C, S> {
    rpc: AbciRpc<C>,
    signer: Option<S>,
    default_fee: Fee,

    /// When set, message creators must be addresses using this bech32 prefix.
    bech32_prefix: Option<String>,
}

impl<S> TxClient<HttpClient, S> {
    pub fn connect(config: &Config, signer: Option<S>) -> Result<Self, ClientError> {
        let client = HttpClient::new(config.rpc_endpoint.as_str())?;
        Ok(TxClient::new(client, signer)
            .with_default_fee(Fee::with_gas_limit(config.gas_limit))
            .with_bech32_prefix(&config.chain_details.bech32_account_prefix))
    }
}

impl<C, S> TxClient<C, S> {
    pub fn new(client: C, signer: Option<S>) -> Self {
        TxClient {
            rpc: AbciRpc::new(client),
            signer,
            default_fee: Fee::default(),
            bech32_prefix: None,
        }
    }

    #[must_use]
    pub fn with_default_fee(mut self, fee: Fee) -> Self {
        self.default_fee = fee;
        self
    }

    #[must_use]
    pub fn with_bech32_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.bech32_prefix = Some(prefix.into());
        self
    }

    pub fn signer(&self) -> Option<&S> {
        self.signer.as_ref()
    }
}

impl<C, S> TxClient<C, S>
where
    C: Client + Send + Sync,
    S: OfflineSigner,
    ClientError: From<S::Error>,
{
    fn require_signer(&self, operation: &'static str) -> Result<&S, TxClientError> {
        self.signer
            .as_ref()
            .ok_or(TxClientError::SignerRequired { operation })
    }

    fn build_msg<M>(&self, mut nym: PartialNym) -> Result<M, TxClientError>
    where
        M: NymMsg + From<PartialNym>,
    {
        let operation = operation_name::<M>();
        let signer = self.require_signer(operation)?;

        if nym.creator.is_none() {
            let account = signer
                .first_account()
                .map_err(|err| TxClientError::MessageCreation {
                    operation,
                    source: err.into(),
                })?
                .ok_or(TxClientError::MessageCreation {
                    operation,
                    source: ClientError::NoSignerAccounts,
                })?;
            nym.creator = Some(account.address.to_string());
        }

        let msg = M::from(nym);
        match &self.bech32_prefix {
            Some(prefix) => msg.validate_for_prefix(prefix),
            None => msg.validate_basic(),
        }
        .map_err(|source| TxClientError::MessageCreation {
                operation,
                source: source.into(),
            })?;
        Ok(msg)
    }

    /// Builds `MsgCreateNym` without broadcasting it. The creator defaults to the signer's
    /// first account.
    pub fn msg_create_nym(&self, nym: PartialNym) -> Result<Any, TxClientError> {
        Ok(self.build_msg::<MsgCreateNym>(nym)?.to_any())
    }

    pub fn msg_update_nym(&self, nym: PartialNym) -> Result<Any, TxClientError> {
        Ok(self.build_msg::<MsgUpdateNym>(nym)?.to_any())
    }

    pub fn msg_delete_nym(&self, nym: PartialNym) -> Result<Any, TxClientError> {
        Ok(self.build_msg::<MsgDeleteNym>(nym)?.to_any())
    }

    pub async fn send_msg_create_nym(
        &self,
        nym: PartialNym,
        fee: Option<Fee>,
        memo: impl Into<String>,
    ) -> Result<TxResponse, TxClientError> {
        self.send_msg::<MsgCreateNym>(nym, fee, memo.into()).await
    }

    pub async fn send_msg_update_nym(
        &self,
        nym: PartialNym,
        fee: Option<Fee>,
        memo: impl Into<String>,
    ) -> Result<TxResponse, TxClientError> {
        self.send_msg::<MsgUpdateNym>(nym, fee, memo.into()).await
    }

    pub async fn send_msg_delete_nym(
        &self,
        nym: PartialNym,
        fee: Option<Fee>,
        memo: impl Into<String>,
    ) -> Result<TxResponse, TxClientError> {
        self.send_msg::<MsgDeleteNym>(nym, fee, memo.into()).await
    }

    async fn send_msg<M>(
        &self,
        nym: PartialNym,
        fee: Option<Fee>,
        memo: String,
    ) -> Result<TxResponse, TxClientError>
    where
        M: NymMsg + From<PartialNym>,
    {
        let operation = operation_name::<M>();
        let msg = self.build_msg::<M>(nym)?;
        self.broadcast_messages(operation, vec![msg.to_any()], fee, memo)
            .await
    }

    /// Signs the provided messages with the signer's first account and broadcasts them as
    /// a single transaction, waiting for it to get committed.
    ///
    /// Execution failures reported by the chain are returned as part of the response.
    pub async fn broadcast_messages(
        &self,
        operation: &'static str,
        messages: Vec<Any>,
        fee: Option<Fee>,
        memo: impl Into<String>,
    ) -> Result<TxResponse, TxClientError> {
        let signer = self.require_signer(operation)?;
        let fee = fee.unwrap_or_else(|| self.default_fee.clone());

        info!("broadcasting {operation} with {fee}");
        self.sign_and_broadcast(signer, messages, fee, memo.into())
            .await
            .map_err(|source| TxClientError::Broadcast { operation, source })
    }

    async fn sign_and_broadcast(
        &self,
        signer: &S,
        messages: Vec<Any>,
        fee: Fee,
        memo: String,
    ) -> Result<TxResponse, ClientError> {
        let account = signer
            .first_account()?
            .ok_or(ClientError::NoSignerAccounts)?;
        let signer_data = self.signer_data(&account.address).await?;
        debug!(
            "signing as {} (account number: {}, sequence: {})",
            account.address, signer_data.account_number, signer_data.sequence
        );

        let tx_fee = tx::Fee::try_from(fee)?;
        let tx_raw = TxSigner::new(signer).sign_direct_with_account(
            &account,
            messages,
            tx_fee,
            memo,
            signer_data,
        )?;
        let tx_bytes = tx_raw
            .to_bytes()
            .map_err(|_| ClientError::SerializationError("Tx".to_owned()))?;

        let response = self.rpc.inner().broadcast_tx_commit(tx_bytes).await?;
        if response.check_tx.code.is_err() || response.tx_result.code.is_err() {
            warn!(
                "transaction {} was included with a failure: {}{}",
                response.hash, response.check_tx.log, response.tx_result.log
            );
        }
        Ok(response)
    }

    async fn signer_data(&self, address: &AccountId) -> Result<SignerData, ClientError> {
        let chain_id = self.rpc.inner().status().await?.node_info.network;

        let res: QueryAccountResponse = self
            .rpc
            .make_abci_query(
                ACCOUNT_QUERY_PATH,
                QueryAccountRequest {
                    address: address.to_string(),
                },
            )
            .await?;

        let account = res
            .account
            .ok_or_else(|| ClientError::NonExistentAccount(address.clone()))?;
        if account.type_url != BASE_ACCOUNT_TYPE_URL {
            return Err(ClientError::UnsupportedAccountType {
                type_url: account.type_url,
            });
        }
        let base_account = BaseAccount::decode(account.value.as_ref())?;

        Ok(SignerData {
            account_number: base_account.account_number,
            sequence: base_account.sequence,
            chain_id,
        })
    }
}

/// Extracts the id assigned to a newly created nym from a committed transaction.
pub fn created_nym_id(response: &TxResponse) -> Result<Option<u64>, ClientError> {
    Ok(MsgCreateNymResponse::from_tx_data(&response.tx_result.data)?.map(|res| res.id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::signing::wallet::DirectSecp256k1HdWallet;
    use verimcosmos_types::MessageCodec;

    const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    // nothing should ever be listening on port 1
    const UNREACHABLE_NODE: &str = "http://127.0.0.1:1";

    fn wallet() -> DirectSecp256k1HdWallet {
        DirectSecp256k1HdWallet::from_phrase("cosmos", MNEMONIC).unwrap()
    }

    fn client_without_signer() -> TxClient<HttpClient, DirectSecp256k1HdWallet> {
        TxClient::new(HttpClient::new(UNREACHABLE_NODE).unwrap(), None)
    }

    fn client_with_signer() -> TxClient<HttpClient, DirectSecp256k1HdWallet> {
        TxClient::new(HttpClient::new(UNREACHABLE_NODE).unwrap(), Some(wallet()))
    }

    fn partial_nym() -> PartialNym {
        PartialNym {
            alias: Some("alice".to_string()),
            verkey: Some("verkey".to_string()),
            did: Some("did:verim:alice".to_string()),
            role: Some("endorser".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn building_without_signer_fails() {
        let client = client_without_signer();
        let err = client.msg_create_nym(partial_nym()).unwrap_err();
        assert!(matches!(
            err,
            TxClientError::SignerRequired {
                operation: "MsgCreateNym"
            }
        ));
    }

    #[test]
    fn creator_defaults_to_signer_address() {
        let client = client_with_signer();
        let expected_creator = wallet().first_account().unwrap().unwrap().address;

        let any = client.msg_create_nym(partial_nym()).unwrap();
        assert_eq!(any.type_url, MsgCreateNym::TYPE_URL);

        let msg = MsgCreateNym::from_any(&any).unwrap();
        assert_eq!(msg.creator, expected_creator.to_string());
        assert_eq!(msg.alias, "alice");
    }

    #[test]
    fn invalid_creator_fails_message_creation() {
        let client = client_with_signer();
        let err = client
            .msg_delete_nym(PartialNym {
                creator: Some("not-an-address".to_string()),
                id: Some(1),
                ..Default::default()
            })
            .unwrap_err();

        assert!(matches!(err, TxClientError::MessageCreation { .. }));
        assert_eq!(err.operation(), "MsgDeleteNym");
    }

    #[test]
    fn creator_from_another_chain_is_rejected() {
        let client = client_with_signer().with_bech32_prefix("cosmos");
        assert!(client.msg_create_nym(partial_nym()).is_ok());

        let foreign_creator = cosmrs::AccountId::new("osmo", &[3u8; 20]).unwrap();
        let err = client
            .msg_create_nym(PartialNym {
                creator: Some(foreign_creator.to_string()),
                ..partial_nym()
            })
            .unwrap_err();
        assert!(matches!(err, TxClientError::MessageCreation { .. }));

        // a signer derived with a different prefix cannot create messages either
        let mismatched = client_with_signer().with_bech32_prefix("verim");
        assert!(mismatched.msg_create_nym(partial_nym()).is_err());
    }

    #[test]
    fn connected_client_checks_the_configured_prefix() {
        let config = Config::new(
            UNREACHABLE_NODE.parse().unwrap(),
            "http://127.0.0.1:1".parse().unwrap(),
        );
        let client = TxClient::connect(&config, Some(wallet())).unwrap();
        assert_eq!(client.bech32_prefix.as_deref(), Some("cosmos"));

        let foreign_creator = cosmrs::AccountId::new("osmo", &[3u8; 20]).unwrap();
        assert!(client
            .msg_delete_nym(PartialNym {
                creator: Some(foreign_creator.to_string()),
                id: Some(1),
                ..Default::default()
            })
            .is_err());
    }

    #[test]
    fn update_message_keeps_the_id() {
        let client = client_with_signer();
        let any = client
            .msg_update_nym(PartialNym {
                id: Some(9),
                ..partial_nym()
            })
            .unwrap();
        let msg = MsgUpdateNym::from_bytes(&any.value).unwrap();
        assert_eq!(msg.id, 9);
        assert_eq!(msg.role, "endorser");
    }

    #[tokio::test]
    async fn sending_without_signer_is_not_a_broadcast_failure() {
        let client = client_without_signer();
        let err = client
            .send_msg_create_nym(partial_nym(), None, "")
            .await
            .unwrap_err();
        assert!(matches!(err, TxClientError::SignerRequired { .. }));
    }

    #[tokio::test]
    async fn unreachable_node_is_a_broadcast_failure() {
        let client = client_with_signer();
        let err = client
            .send_msg_create_nym(partial_nym(), None, "")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TxClientError::Broadcast {
                operation: "MsgCreateNym",
                ..
            }
        ));
    }
}
