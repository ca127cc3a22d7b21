// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Client-side state for the `verimcosmos` nym queries.
//!
//! [`NymStore`] keeps the last result of every query it has performed and, for the queries
//! registered as subscriptions, fetches them again whenever [`ChainSubscriber`] reports a new
//! block.

pub mod cache;
pub mod error;
pub mod store;
pub mod subscriber;
pub mod subscription;

pub use cache::QueryCache;
pub use error::StoreError;
pub use store::NymStore;
pub use subscriber::{run_websocket_driver, ChainSubscriber, NewBlockEvent};
pub use subscription::{QueryOptions, StoreAction, Subscription, SubscriptionSet};
