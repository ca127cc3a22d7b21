// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use tendermint::Block;
use tendermint_rpc::event::{Event, EventData};
use tendermint_rpc::query::EventType;
use tendermint_rpc::{
    Subscription as RpcSubscription, SubscriptionClient, WebSocketClient, WebSocketClientDriver,
};
use tokio::sync::mpsc::UnboundedSender;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

/// Consecutive bad events tolerated before the subscriber gives up.
const MAX_CONSECUTIVE_FAILURES: usize = 10;

/// How many times a subscription closed by the node gets re-established.
const MAX_RESUBSCRIPTIONS: usize = 3;

/// Notification that the chain has produced a new block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewBlockEvent {
    pub height: u64,
}

impl From<&Block> for NewBlockEvent {
    fn from(block: &Block) -> Self {
        NewBlockEvent {
            height: block.header.height.value(),
        }
    }
}

impl TryFrom<Event> for NewBlockEvent {
    type Error = StoreError;

    fn try_from(event: Event) -> Result<Self, Self::Error> {
        let block = match event.data {
            EventData::NewBlock { block, .. } | EventData::LegacyNewBlock { block, .. } => {
                block.ok_or(StoreError::EmptyBlockData)?
            }
            EventData::Tx { .. } => return Err(unexpected_event("Tx")),
            EventData::GenericJsonEvent(_) => return Err(unexpected_event("GenericJsonEvent")),
        };
        Ok(NewBlockEvent::from(block.as_ref()))
    }
}

fn unexpected_event(kind: &str) -> StoreError {
    StoreError::UnexpectedSubscriptionEvent {
        kind: kind.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockOrder {
    Next,
    Stale,
    Skipped(u64),
}

/// Remembers the last forwarded height, so that blocks redelivered after a resubscription
/// do not trigger another refresh.
#[derive(Debug, Default)]
struct HeightTracker {
    last_forwarded: Option<u64>,
}

impl HeightTracker {
    fn observe(&mut self, height: u64) -> BlockOrder {
        let order = match self.last_forwarded {
            Some(last) if height <= last => return BlockOrder::Stale,
            Some(last) if height - last > 1 => BlockOrder::Skipped(height - last - 1),
            _ => BlockOrder::Next,
        };
        self.last_forwarded = Some(height);
        order
    }
}

/// Pushes the height of every new block produced by the chain to the nym store, using the
/// node's websocket endpoint.
pub struct ChainSubscriber {
    cancel: CancellationToken,
    block_sender: UnboundedSender<NewBlockEvent>,
    heights: HeightTracker,

    websocket_client: WebSocketClient,
    websocket_driver: Option<WebSocketClientDriver>,
}

impl ChainSubscriber {
    pub async fn new(
        websocket_endpoint: &Url,
        cancel: CancellationToken,
        block_sender: UnboundedSender<NewBlockEvent>,
    ) -> Result<Self, StoreError> {
        let (client, driver) = WebSocketClient::new(websocket_endpoint.as_str())
            .await
            .map_err(|source| StoreError::WebSocketConnectionFailure {
                url: websocket_endpoint.to_string(),
                source,
            })?;

        Ok(ChainSubscriber {
            cancel,
            block_sender,
            heights: HeightTracker::default(),
            websocket_client: client,
            websocket_driver: Some(driver),
        })
    }

    /// Takes the websocket driver out of the subscriber, it has to be running
    /// (see [`run_websocket_driver`]) for any block to arrive.
    /// Returns `None` if it was taken already.
    pub fn take_websocket_driver(&mut self) -> Option<WebSocketClientDriver> {
        self.websocket_driver.take()
    }

    async fn subscribe_new_blocks(&self) -> Result<RpcSubscription, StoreError> {
        self.websocket_client
            .subscribe(EventType::NewBlock.into())
            .await
            .map_err(|source| StoreError::ChainSubscriptionFailure { source })
    }

    fn forward_block(
        &mut self,
        item: Result<Event, tendermint_rpc::Error>,
    ) -> Result<(), StoreError> {
        let event = item.map_err(|source| StoreError::SubscriptionEventFailure { source })?;
        let block = NewBlockEvent::try_from(event)?;

        match self.heights.observe(block.height) {
            BlockOrder::Stale => {
                debug!("block {} has already been forwarded", block.height);
                return Ok(());
            }
            BlockOrder::Skipped(missed) => warn!(
                "missed {missed} blocks before height {}, subscriptions are only refreshed once",
                block.height
            ),
            BlockOrder::Next => {}
        }

        if self.block_sender.send(block).is_err() {
            info!("the nym store is no longer listening for new blocks");
            self.cancel.cancel();
        }
        Ok(())
    }

    /// Forwards new blocks until cancelled or the subscription cannot be kept alive.
    ///
    /// The cancellation token is triggered on return, stopping the websocket driver
    /// and anything else sharing it.
    pub async fn run(&mut self) -> Result<(), StoreError> {
        let _drop_guard = self.cancel.clone().drop_guard();

        let mut blocks = self.subscribe_new_blocks().await?;
        let mut resubscriptions = 0;
        let mut consecutive_failures = 0;

        info!("forwarding new blocks to the nym store");
        loop {
            let item = tokio::select! {
                _ = self.cancel.cancelled() => break,
                item = blocks.next() => item,
            };

            let Some(item) = item else {
                if resubscriptions == MAX_RESUBSCRIPTIONS {
                    warn!("the node keeps closing the new block subscription, giving up");
                    break;
                }
                resubscriptions += 1;
                warn!(
                    "the node has closed the new block subscription, resubscribing ({resubscriptions}/{MAX_RESUBSCRIPTIONS})"
                );
                blocks = self.subscribe_new_blocks().await?;
                continue;
            };

            match self.forward_block(item) {
                Ok(()) => consecutive_failures = 0,
                Err(err) => {
                    consecutive_failures += 1;
                    warn!(
                        "could not forward new block ({consecutive_failures}/{MAX_CONSECUTIVE_FAILURES}): {err}"
                    );
                    if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                        return Err(StoreError::MaximumSubscriptionFailures {
                            failures: consecutive_failures,
                        });
                    }
                }
            }
        }

        info!("stopped forwarding new blocks");
        Ok(())
    }
}

/// Drives the websocket connection until it closes or `cancel` fires. A closed connection
/// cancels the token, so that the subscriber does not wait for blocks that will never come.
pub async fn run_websocket_driver(driver: WebSocketClientDriver, cancel: CancellationToken) {
    let outcome = tokio::select! {
        _ = cancel.cancelled() => return,
        outcome = driver.run() => outcome,
    };

    match outcome {
        Ok(()) => info!("websocket connection to the node was closed"),
        Err(err) => error!("websocket connection to the node has failed: {err}"),
    }
    cancel.cancel()
}
