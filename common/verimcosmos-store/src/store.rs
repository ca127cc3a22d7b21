// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cache::QueryCache;
use crate::error::StoreError;
use crate::subscriber::NewBlockEvent;
use crate::subscription::{QueryOptions, StoreAction, Subscription, SubscriptionSet};
use futures::future::join_all;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use verimcosmos_client::NymQueryClient;
use verimcosmos_types::{
    FieldStructure, Nym, QueryAllNymRequest, QueryAllNymResponse, QueryGetNymRequest,
    QueryGetNymResponse,
};

#[derive(Debug, Default)]
struct StoreState {
    nym: QueryCache<QueryGetNymRequest, QueryGetNymResponse>,
    nym_all: QueryCache<QueryAllNymRequest, QueryAllNymResponse>,
    subscriptions: SubscriptionSet,
}

/// Caches the results of nym queries and re-runs the subscribed ones whenever a new block
/// gets produced.
///
/// The state lock is never held while talking to the node.
pub struct NymStore<Q> {
    query_client: Q,
    state: RwLock<StoreState>,
}

impl<Q> NymStore<Q>
where
    Q: NymQueryClient,
{
    pub fn new(query_client: Q) -> Self {
        NymStore {
            query_client,
            state: RwLock::new(StoreState::default()),
        }
    }

    pub fn query_client(&self) -> &Q {
        &self.query_client
    }

    /// Drops all cached results and subscriptions.
    pub async fn reset_all(&self) {
        *self.state.write().await = StoreState::default();
    }

    pub async fn subscribe(&self, action: StoreAction, options: QueryOptions) {
        let subscription = Subscription::new(action, options.all);
        let mut state = self.state.write().await;
        if state.subscriptions.subscribe(subscription) {
            debug!("registered new subscription");
        }
    }

    pub async fn unsubscribe(&self, action: StoreAction, options: QueryOptions) {
        let subscription = Subscription::new(action, options.all);
        if !self.state.write().await.subscriptions.unsubscribe(&subscription) {
            debug!("attempted to remove a subscription that did not exist");
        }
    }

    pub async fn subscriptions(&self) -> Vec<Subscription> {
        self.state
            .read()
            .await
            .subscriptions
            .iter()
            .cloned()
            .collect()
    }

    /// Cached result of `QueryNym` for the provided request, or an empty response.
    pub async fn get_nym(&self, request: &QueryGetNymRequest) -> QueryGetNymResponse {
        self.state.read().await.nym.query_or_default(request)
    }

    /// Cached result of `QueryNymAll` for the provided request, or an empty response.
    pub async fn get_nym_all(&self, request: &QueryAllNymRequest) -> QueryAllNymResponse {
        self.state.read().await.nym_all.query_or_default(request)
    }

    pub fn type_structure(&self) -> Vec<FieldStructure> {
        Nym::structure()
    }

    /// Fetches the nym, caches the result and returns it. Failures are logged and an empty
    /// response is returned instead; use [`Self::try_query_nym`] to tell them apart.
    pub async fn query_nym(
        &self,
        request: QueryGetNymRequest,
        options: QueryOptions,
    ) -> QueryGetNymResponse {
        match self.try_query_nym(request, options).await {
            Ok(res) => res,
            Err(err) => {
                error!("{err}");
                QueryGetNymResponse::default()
            }
        }
    }

    pub async fn try_query_nym(
        &self,
        request: QueryGetNymRequest,
        options: QueryOptions,
    ) -> Result<QueryGetNymResponse, StoreError> {
        let res = self
            .query_client
            .query_nym(request.id)
            .await
            .map_err(|source| StoreError::QueryUnavailable {
                operation: "QueryNym",
                source,
            })?;

        self.state.write().await.nym.store(request.clone(), res.clone());

        // only queries that succeeded at least once get refreshed on new blocks
        if options.subscribe {
            self.subscribe(StoreAction::QueryNym(request), options).await;
        }
        Ok(res)
    }

    /// Fetches the list of nyms (every page of it, if `options.all` is set), caches the
    /// result and returns it. Failures are logged and an empty response is returned instead.
    pub async fn query_nym_all(
        &self,
        request: QueryAllNymRequest,
        options: QueryOptions,
    ) -> QueryAllNymResponse {
        match self.try_query_nym_all(request, options).await {
            Ok(res) => res,
            Err(err) => {
                error!("{err}");
                QueryAllNymResponse::default()
            }
        }
    }

    pub async fn try_query_nym_all(
        &self,
        request: QueryAllNymRequest,
        options: QueryOptions,
    ) -> Result<QueryAllNymResponse, StoreError> {
        let pagination = request.pagination.clone();
        let res = if options.all {
            self.query_client.get_all_nyms(pagination).await
        } else {
            self.query_client.query_nym_all(pagination).await
        }
        .map_err(|source| StoreError::QueryUnavailable {
            operation: "QueryNymAll",
            source,
        })?;

        self.state.write().await.nym_all.store(request.clone(), res.clone());

        if options.subscribe {
            self.subscribe(StoreAction::QueryNymAll(request), options).await;
        }
        Ok(res)
    }

    async fn replay(&self, subscription: Subscription) -> Result<(), StoreError> {
        let options = QueryOptions {
            subscribe: false,
            all: subscription.all,
        };
        match subscription.action {
            StoreAction::QueryNym(request) => {
                self.try_query_nym(request, options).await?;
            }
            StoreAction::QueryNymAll(request) => {
                self.try_query_nym_all(request, options).await?;
            }
        }
        Ok(())
    }

    /// Re-runs every active subscription with its recorded parameters.
    ///
    /// Each subscription is refreshed independently; a failing one is logged and does not
    /// prevent the others from completing.
    pub async fn on_new_block(&self) {
        let subscriptions = self.subscriptions().await;
        if subscriptions.is_empty() {
            return;
        }
        debug!("refreshing {} subscriptions", subscriptions.len());

        let replays = subscriptions.into_iter().map(|subscription| async move {
            let action = subscription.action.clone();
            if let Err(err) = self.replay(subscription).await {
                warn!("failed to refresh subscription {action}: {err}");
            }
        });
        join_all(replays).await;
    }

    /// Refreshes the subscriptions on every block received through the channel until either
    /// the sender gets dropped or the cancellation token fires.
    ///
    /// `on_refresh` is invoked with the block once all of its refreshes have completed.
    pub async fn run_block_listener<F>(
        &self,
        mut blocks: UnboundedReceiver<NewBlockEvent>,
        cancel: CancellationToken,
        mut on_refresh: F,
    ) where
        F: FnMut(NewBlockEvent) + Send,
    {
        info!("starting new block listener");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("received cancellation token");
                    break
                }
                maybe_block = blocks.recv() => {
                    let Some(block) = maybe_block else {
                        warn!("stopped receiving new blocks");
                        break;
                    };
                    debug!("refreshing subscriptions at height {}", block.height);
                    self.on_new_block().await;
                    on_refresh(block);
                }
            }
        }
    }
}
