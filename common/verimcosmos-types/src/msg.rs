// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::codec::{ensure_safe_integer, MessageCodec};
use crate::error::TypesError;
use crate::nym::{NymId, PartialNym};
use crate::serde_helpers::{lenient_u64, null_as_default};
use crate::ROUTER_KEY;
use cosmrs::proto::cosmos::base::abci::v1beta1::TxMsgData;
use cosmrs::{AccountId, Any};
use prost::Message;
use serde::{Deserialize, Serialize};

/// A transaction message of the module.
pub trait NymMsg: MessageCodec {
    /// Fully qualified protobuf name used to route the message on chain.
    const TYPE_URL: &'static str;

    /// Short message type name, as reported by the module's handler.
    const MSG_TYPE: &'static str;

    fn creator(&self) -> &str;

    fn route(&self) -> &'static str {
        ROUTER_KEY
    }

    fn msg_type(&self) -> &'static str {
        Self::MSG_TYPE
    }

    /// Stateless checks performed before the message is ever signed.
    fn validate_basic(&self) -> Result<(), TypesError> {
        self.check_ranges()?;
        self.creator_account()?;
        Ok(())
    }

    /// [`validate_basic`](NymMsg::validate_basic), additionally requiring the creator
    /// to be an address of the chain using the given bech32 account prefix.
    fn validate_for_prefix(&self, bech32_prefix: &str) -> Result<(), TypesError> {
        self.check_ranges()?;
        let creator = self.creator_account()?;
        if creator.prefix() != bech32_prefix {
            return Err(TypesError::InvalidCreatorAddress {
                address: self.creator().to_string(),
                reason: format!(
                    "expected the '{bech32_prefix}' prefix, got '{}'",
                    creator.prefix()
                ),
            });
        }
        Ok(())
    }

    fn creator_account(&self) -> Result<AccountId, TypesError> {
        self.creator()
            .parse()
            .map_err(|err: cosmrs::ErrorReport| TypesError::InvalidCreatorAddress {
                address: self.creator().to_string(),
                reason: err.to_string(),
            })
    }

    fn to_any(&self) -> Any {
        Any {
            type_url: Self::TYPE_URL.to_string(),
            value: self.to_bytes(),
        }
    }

    fn from_any(any: &Any) -> Result<Self, TypesError> {
        if any.type_url != Self::TYPE_URL {
            return Err(TypesError::UnexpectedTypeUrl {
                expected: Self::TYPE_URL,
                got: any.type_url.clone(),
            });
        }
        Self::from_bytes(&any.value)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, prost::Message)]
pub struct MsgCreateNym {
    #[prost(string, tag = "1")]
    #[serde(default, deserialize_with = "null_as_default")]
    pub creator: String,

    #[prost(string, tag = "2")]
    #[serde(default, alias = "alais", deserialize_with = "null_as_default")]
    pub alias: String,

    #[prost(string, tag = "3")]
    #[serde(default, deserialize_with = "null_as_default")]
    pub verkey: String,

    #[prost(string, tag = "4")]
    #[serde(default, deserialize_with = "null_as_default")]
    pub did: String,

    #[prost(string, tag = "5")]
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
}

impl MessageCodec for MsgCreateNym {}

impl NymMsg for MsgCreateNym {
    const TYPE_URL: &'static str = "/verimid.verimcosmos.verimcosmos.MsgCreateNym";
    const MSG_TYPE: &'static str = "CreateNym";

    fn creator(&self) -> &str {
        &self.creator
    }
}

impl From<PartialNym> for MsgCreateNym {
    fn from(partial: PartialNym) -> Self {
        MsgCreateNym {
            creator: partial.creator.unwrap_or_default(),
            alias: partial.alias.unwrap_or_default(),
            verkey: partial.verkey.unwrap_or_default(),
            did: partial.did.unwrap_or_default(),
            role: partial.role.unwrap_or_default(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, prost::Message)]
pub struct MsgCreateNymResponse {
    #[prost(uint64, tag = "1")]
    #[serde(default, with = "lenient_u64")]
    pub id: NymId,
}

impl MessageCodec for MsgCreateNymResponse {
    fn check_ranges(&self) -> Result<(), TypesError> {
        ensure_safe_integer("id", self.id)
    }
}

impl MsgCreateNymResponse {
    pub const TYPE_URL: &'static str = "/verimid.verimcosmos.verimcosmos.MsgCreateNymResponse";

    /// Extracts the id assigned to a freshly created nym out of the `data` field of a
    /// delivered transaction. Returns `None` if the transaction did not create any nym.
    pub fn from_tx_data(data: &[u8]) -> Result<Option<Self>, TypesError> {
        let tx_data = TxMsgData::decode(data)?;

        if let Some(response) = tx_data
            .msg_responses
            .iter()
            .find(|any| any.type_url == Self::TYPE_URL)
        {
            return Self::from_bytes(&response.value).map(Some);
        }

        // older nodes still only populate the deprecated per-message data
        #[allow(deprecated)]
        let legacy = tx_data
            .data
            .iter()
            .find(|msg_data| msg_data.msg_type == MsgCreateNym::TYPE_URL)
            .map(|msg_data| Self::from_bytes(&msg_data.data))
            .transpose()?;

        Ok(legacy)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, prost::Message)]
pub struct MsgUpdateNym {
    #[prost(string, tag = "1")]
    #[serde(default, deserialize_with = "null_as_default")]
    pub creator: String,

    #[prost(uint64, tag = "2")]
    #[serde(default, with = "lenient_u64")]
    pub id: NymId,

    #[prost(string, tag = "3")]
    #[serde(default, alias = "alais", deserialize_with = "null_as_default")]
    pub alias: String,

    #[prost(string, tag = "4")]
    #[serde(default, deserialize_with = "null_as_default")]
    pub verkey: String,

    #[prost(string, tag = "5")]
    #[serde(default, deserialize_with = "null_as_default")]
    pub did: String,

    #[prost(string, tag = "6")]
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
}

impl MessageCodec for MsgUpdateNym {
    fn check_ranges(&self) -> Result<(), TypesError> {
        ensure_safe_integer("id", self.id)
    }
}

impl NymMsg for MsgUpdateNym {
    const TYPE_URL: &'static str = "/verimid.verimcosmos.verimcosmos.MsgUpdateNym";
    const MSG_TYPE: &'static str = "UpdateNym";

    fn creator(&self) -> &str {
        &self.creator
    }
}

impl From<PartialNym> for MsgUpdateNym {
    fn from(partial: PartialNym) -> Self {
        MsgUpdateNym {
            creator: partial.creator.unwrap_or_default(),
            id: partial.id.unwrap_or_default(),
            alias: partial.alias.unwrap_or_default(),
            verkey: partial.verkey.unwrap_or_default(),
            did: partial.did.unwrap_or_default(),
            role: partial.role.unwrap_or_default(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, prost::Message)]
pub struct MsgUpdateNymResponse {}

impl MessageCodec for MsgUpdateNymResponse {}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, prost::Message)]
pub struct MsgDeleteNym {
    #[prost(string, tag = "1")]
    #[serde(default, deserialize_with = "null_as_default")]
    pub creator: String,

    #[prost(uint64, tag = "2")]
    #[serde(default, with = "lenient_u64")]
    pub id: NymId,
}

impl MessageCodec for MsgDeleteNym {
    fn check_ranges(&self) -> Result<(), TypesError> {
        ensure_safe_integer("id", self.id)
    }
}

impl NymMsg for MsgDeleteNym {
    const TYPE_URL: &'static str = "/verimid.verimcosmos.verimcosmos.MsgDeleteNym";
    const MSG_TYPE: &'static str = "DeleteNym";

    fn creator(&self) -> &str {
        &self.creator
    }
}

impl From<PartialNym> for MsgDeleteNym {
    fn from(partial: PartialNym) -> Self {
        MsgDeleteNym {
            creator: partial.creator.unwrap_or_default(),
            id: partial.id.unwrap_or_default(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, prost::Message)]
pub struct MsgDeleteNymResponse {}

impl MessageCodec for MsgDeleteNymResponse {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn creator() -> String {
        AccountId::new("cosmos", &[1u8; 20]).unwrap().to_string()
    }

    #[test]
    fn type_urls_and_routes() {
        let create = MsgCreateNym::default();
        assert_eq!(create.route(), "verimcosmos");
        assert_eq!(create.msg_type(), "CreateNym");
        assert_eq!(
            MsgUpdateNym::TYPE_URL,
            "/verimid.verimcosmos.verimcosmos.MsgUpdateNym"
        );
        assert_eq!(MsgDeleteNym::default().msg_type(), "DeleteNym");
    }

    #[test]
    fn create_message_has_no_id_field() {
        let msg = MsgCreateNym::from(PartialNym {
            creator: Some("c".to_string()),
            id: Some(5),
            alias: Some("a".to_string()),
            ..Default::default()
        });
        // creator (tag 1) followed directly by alias (tag 2)
        assert_eq!(msg.to_bytes(), vec![0x0a, 1, b'c', 0x12, 1, b'a']);
    }

    #[test]
    fn delete_message_carries_creator_and_id_only() {
        let msg = MsgDeleteNym::from(PartialNym {
            creator: Some("c".to_string()),
            id: Some(1),
            did: Some("ignored".to_string()),
            ..Default::default()
        });
        assert_eq!(msg.to_bytes(), vec![0x0a, 1, b'c', 0x10, 1]);
    }

    #[test]
    fn validate_basic_checks_creator() {
        let valid = MsgDeleteNym {
            creator: creator(),
            id: 1,
        };
        assert!(valid.validate_basic().is_ok());

        let invalid = MsgDeleteNym {
            creator: "definitely-not-bech32".to_string(),
            id: 1,
        };
        assert!(matches!(
            invalid.validate_basic(),
            Err(TypesError::InvalidCreatorAddress { .. })
        ));

        let empty = MsgCreateNym::default();
        assert!(empty.validate_basic().is_err());
    }

    #[test]
    fn creator_must_use_the_chain_prefix() {
        let msg = MsgDeleteNym {
            creator: creator(),
            id: 1,
        };
        assert!(msg.validate_for_prefix("cosmos").is_ok());
        assert!(matches!(
            msg.validate_for_prefix("verim"),
            Err(TypesError::InvalidCreatorAddress { reason, .. }) if reason.contains("'verim'")
        ));

        let foreign = MsgDeleteNym {
            creator: AccountId::new("osmo", &[1u8; 20]).unwrap().to_string(),
            id: 1,
        };
        assert!(foreign.validate_basic().is_ok());
        assert!(foreign.validate_for_prefix("cosmos").is_err());
    }

    #[test]
    fn any_conversion() {
        let msg = MsgUpdateNym {
            creator: creator(),
            id: 7,
            alias: "alias".to_string(),
            verkey: "verkey".to_string(),
            did: "did".to_string(),
            role: "role".to_string(),
        };
        let any = msg.to_any();
        assert_eq!(any.type_url, MsgUpdateNym::TYPE_URL);
        assert_eq!(MsgUpdateNym::from_any(&any).unwrap(), msg);

        assert!(matches!(
            MsgDeleteNym::from_any(&any),
            Err(TypesError::UnexpectedTypeUrl { .. })
        ));
    }

    #[test]
    fn create_response_from_msg_responses() {
        let tx_data = TxMsgData {
            msg_responses: vec![Any {
                type_url: MsgCreateNymResponse::TYPE_URL.to_string(),
                value: MsgCreateNymResponse { id: 12 }.to_bytes(),
            }],
            ..Default::default()
        };

        let response = MsgCreateNymResponse::from_tx_data(&tx_data.encode_to_vec()).unwrap();
        assert_eq!(response, Some(MsgCreateNymResponse { id: 12 }));
    }

    #[test]
    #[allow(deprecated)]
    fn create_response_from_legacy_data() {
        use cosmrs::proto::cosmos::base::abci::v1beta1::MsgData;

        let tx_data = TxMsgData {
            data: vec![MsgData {
                msg_type: MsgCreateNym::TYPE_URL.to_string(),
                data: MsgCreateNymResponse { id: 3 }.to_bytes(),
            }],
            ..Default::default()
        };

        let response = MsgCreateNymResponse::from_tx_data(&tx_data.encode_to_vec()).unwrap();
        assert_eq!(response, Some(MsgCreateNymResponse { id: 3 }));

        let unrelated = TxMsgData::default().encode_to_vec();
        assert_eq!(MsgCreateNymResponse::from_tx_data(&unrelated).unwrap(), None);
    }
}
