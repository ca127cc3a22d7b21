// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Message types of the `verimcosmos` module together with their protobuf and JSON codecs.
//!
//! Every message derives its wire layout from `prost` field attributes and shares a single
//! generic codec ([`MessageCodec`]) that additionally enforces the 53-bit integer contract
//! of the public API.

pub mod codec;
pub mod error;
pub mod genesis;
pub mod msg;
pub mod nym;
pub mod pagination;
pub mod query;

mod serde_helpers;

pub use codec::{ensure_safe_integer, MessageCodec, MAX_SAFE_INTEGER};
pub use error::TypesError;
pub use genesis::GenesisState;
pub use msg::{
    MsgCreateNym, MsgCreateNymResponse, MsgDeleteNym, MsgDeleteNymResponse, MsgUpdateNym,
    MsgUpdateNymResponse, NymMsg,
};
pub use nym::{FieldStructure, Nym, NymId, PartialNym};
pub use pagination::{PageRequest, PageResponse, Paged};
pub use query::{QueryAllNymRequest, QueryAllNymResponse, QueryGetNymRequest, QueryGetNymResponse};

/// Protobuf package every message of the module lives in.
pub const PROTOBUF_PACKAGE: &str = "verimid.verimcosmos.verimcosmos";

/// Router key used by the module's message handler.
pub const ROUTER_KEY: &str = "verimcosmos";
