// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::codec::{ensure_safe_integer, MessageCodec};
use crate::error::TypesError;
use crate::serde_helpers::{lenient_option_u64, lenient_u64, null_as_default};
use serde::{Deserialize, Serialize};

/// Identifier assigned to a nym by the chain.
pub type NymId = u64;

/// A decentralized identifier registration.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, prost::Message)]
pub struct Nym {
    /// Bech32 address of the account that submitted the latest mutation.
    #[prost(string, tag = "1")]
    #[serde(default, deserialize_with = "null_as_default")]
    pub creator: String,

    #[prost(uint64, tag = "2")]
    #[serde(default, with = "lenient_u64")]
    pub id: NymId,

    // some of the genesis tooling spells it `alais`
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

impl MessageCodec for Nym {
    fn check_ranges(&self) -> Result<(), TypesError> {
        ensure_safe_integer("id", self.id)
    }
}

/// Subset of [`Nym`] fields, with everything left out defaulting to its zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialNym {
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default, with = "lenient_option_u64")]
    pub id: Option<NymId>,
    #[serde(default, alias = "alais")]
    pub alias: Option<String>,
    #[serde(default)]
    pub verkey: Option<String>,
    #[serde(default)]
    pub did: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl From<PartialNym> for Nym {
    fn from(partial: PartialNym) -> Self {
        Nym {
            creator: partial.creator.unwrap_or_default(),
            id: partial.id.unwrap_or_default(),
            alias: partial.alias.unwrap_or_default(),
            verkey: partial.verkey.unwrap_or_default(),
            did: partial.did.unwrap_or_default(),
            role: partial.role.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldStructure {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub type_name: &'static str,
}

impl Nym {
    pub fn from_partial(partial: PartialNym) -> Result<Self, TypesError> {
        let nym = Nym::from(partial);
        nym.check_ranges()?;
        Ok(nym)
    }

    /// Describes the fields of the record, in wire order.
    pub fn structure() -> Vec<FieldStructure> {
        [
            ("creator", "string"),
            ("id", "number"),
            ("alias", "string"),
            ("verkey", "string"),
            ("did", "string"),
            ("role", "string"),
        ]
        .into_iter()
        .map(|(name, type_name)| FieldStructure { name, type_name })
        .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::MAX_SAFE_INTEGER;
    use prost::Message;
    use serde_json::json;

    fn full_nym() -> Nym {
        Nym {
            creator: "cosmos1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu".to_string(),
            id: 42,
            alias: "alice".to_string(),
            verkey: "~8Xd9kD1PAAj2jFMk7FXJ4s".to_string(),
            did: "did:verim:alice".to_string(),
            role: "endorser".to_string(),
        }
    }

    #[test]
    fn binary_roundtrip() {
        let nym = full_nym();
        let decoded = Nym::from_bytes(&nym.to_bytes()).unwrap();
        assert_eq!(nym, decoded);
    }

    #[test]
    fn zero_values_are_not_encoded() {
        assert!(Nym::default().to_bytes().is_empty());

        let only_alias = Nym {
            alias: "bob".to_string(),
            ..Default::default()
        };
        // tag (3 << 3 | 2), length, "bob"
        assert_eq!(only_alias.to_bytes(), vec![0x1a, 3, b'b', b'o', b'b']);
    }

    #[test]
    fn id_uses_varint_encoding() {
        let nym = Nym {
            id: 300,
            ..Default::default()
        };
        assert_eq!(nym.to_bytes(), vec![0x10, 0xac, 0x02]);
    }

    #[test]
    fn empty_input_decodes_to_zero_values() {
        assert_eq!(Nym::from_bytes(&[]).unwrap(), Nym::default());
    }

    #[test]
    fn unknown_fields_are_skipped() {
        let mut bytes = full_nym().to_bytes();
        // field 15, length-delimited
        bytes.extend_from_slice(&[0x7a, 2, 0xff, 0xff]);
        // field 16, varint
        bytes.extend_from_slice(&[0x80, 0x01, 0x05]);

        assert_eq!(Nym::from_bytes(&bytes).unwrap(), full_nym());
    }

    #[test]
    fn malformed_input_is_rejected() {
        let bytes = full_nym().to_bytes();
        let truncated = &bytes[..bytes.len() - 2];
        assert!(matches!(
            Nym::from_bytes(truncated),
            Err(TypesError::ProtobufDecodingError(_))
        ));
    }

    #[test]
    fn id_at_safe_integer_boundary() {
        let at_boundary = Nym {
            id: MAX_SAFE_INTEGER,
            ..Default::default()
        };
        let decoded = Nym::from_bytes(&at_boundary.encode_to_vec()).unwrap();
        assert_eq!(decoded.id, 9_007_199_254_740_991);

        let past_boundary = Nym {
            id: MAX_SAFE_INTEGER + 1,
            ..Default::default()
        };
        let err = Nym::from_bytes(&past_boundary.encode_to_vec()).unwrap_err();
        assert!(matches!(
            err,
            TypesError::UnsafeInteger {
                field: "id",
                value: 9_007_199_254_740_992
            }
        ));
    }

    #[test]
    fn from_json_defaults_missing_and_null_fields() {
        let nym = Nym::from_json(json!({
            "creator": null,
            "alias": "carol",
        }))
        .unwrap();

        assert_eq!(
            nym,
            Nym {
                alias: "carol".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn from_json_accepts_string_ids_and_legacy_alias() {
        let nym = Nym::from_json(json!({
            "id": "17",
            "alais": "dave",
        }))
        .unwrap();
        assert_eq!(nym.id, 17);
        assert_eq!(nym.alias, "dave");

        assert!(Nym::from_json(json!({ "id": "9007199254740992" })).is_err());
        assert!(Nym::from_json(json!({ "id": "not-a-number" })).is_err());
    }

    #[test]
    fn json_roundtrip() {
        let nym = full_nym();
        let value = nym.to_json().unwrap();
        assert_eq!(value["id"], json!(42));
        assert_eq!(value["alias"], json!("alice"));
        assert_eq!(Nym::from_json(value).unwrap(), nym);
    }

    #[test]
    fn from_partial_defaults_everything_else() {
        let nym = Nym::from_partial(PartialNym {
            did: Some("did:verim:erin".to_string()),
            id: Some(3),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(nym.did, "did:verim:erin");
        assert_eq!(nym.id, 3);
        assert!(nym.creator.is_empty());
        assert!(nym.role.is_empty());
    }

    #[test]
    fn partial_nym_accepts_string_ids() {
        let partial: PartialNym = serde_json::from_value(json!({"id": "5", "alais": "bob"})).unwrap();
        assert_eq!(partial.id, Some(5));
        assert_eq!(partial.alias.as_deref(), Some("bob"));

        let numeric: PartialNym = serde_json::from_value(json!({"id": 7})).unwrap();
        assert_eq!(numeric.id, Some(7));

        for absent in [json!({}), json!({"id": null}), json!({"id": ""})] {
            let partial: PartialNym = serde_json::from_value(absent).unwrap();
            assert_eq!(partial.id, None);
        }

        assert!(serde_json::from_value::<PartialNym>(json!({"id": "five"})).is_err());
    }

    #[test]
    fn structure_lists_fields_in_wire_order() {
        let names: Vec<_> = Nym::structure().iter().map(|f| f.name).collect();
        assert_eq!(names, ["creator", "id", "alias", "verkey", "did", "role"]);
        assert_eq!(Nym::structure()[1].type_name, "number");
    }
}
