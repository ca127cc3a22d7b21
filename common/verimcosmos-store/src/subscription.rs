// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use verimcosmos_types::{QueryAllNymRequest, QueryGetNymRequest};

/// A query action of the store together with its request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "action", content = "params")]
pub enum StoreAction {
    QueryNym(QueryGetNymRequest),
    QueryNymAll(QueryAllNymRequest),
}

impl StoreAction {
    pub fn name(&self) -> &'static str {
        match self {
            StoreAction::QueryNym(_) => "QueryNym",
            StoreAction::QueryNymAll(_) => "QueryNymAll",
        }
    }
}

impl Display for StoreAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreAction::QueryNym(req) => write!(f, "QueryNym(id: {})", req.id),
            StoreAction::QueryNymAll(req) => match &req.pagination {
                Some(pagination) => write!(
                    f,
                    "QueryNymAll(limit: {}, offset: {})",
                    pagination.limit, pagination.offset
                ),
                None => write!(f, "QueryNymAll"),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct QueryOptions {
    /// Register the query so that it gets re-run on every new block.
    pub subscribe: bool,

    /// Fetch every page of a list query rather than just the requested one.
    pub all: bool,
}

impl QueryOptions {
    pub fn subscribed() -> Self {
        QueryOptions {
            subscribe: true,
            all: false,
        }
    }

    #[must_use]
    pub fn with_all(mut self) -> Self {
        self.all = true;
        self
    }
}

/// Recorded action replayed on every new block.
///
/// Only the `all` option is part of the identity of a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Subscription {
    pub action: StoreAction,
    pub all: bool,
}

impl Subscription {
    pub fn new(action: StoreAction, all: bool) -> Self {
        Subscription { action, all }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubscriptionSet {
    inner: HashSet<Subscription>,
}

impl SubscriptionSet {
    /// Returns whether the subscription was not already present.
    pub fn subscribe(&mut self, subscription: Subscription) -> bool {
        self.inner.insert(subscription)
    }

    /// Returns whether the subscription was present.
    pub fn unsubscribe(&mut self, subscription: &Subscription) -> bool {
        self.inner.remove(subscription)
    }

    pub fn contains(&self, subscription: &Subscription) -> bool {
        self.inner.contains(subscription)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subscription> {
        self.inner.iter()
    }
}
