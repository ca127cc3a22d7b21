// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cli::nym::{print_json, PaginationArgs};
use crate::context::ClientArgs;
use anyhow::anyhow;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use url::Url;
use verimcosmos_store::{run_websocket_driver, ChainSubscriber, NymStore};
use verimcosmos_types::QueryAllNymRequest;

#[derive(clap::Args, Debug)]
pub(crate) struct Args {
    #[clap(flatten)]
    pub(crate) pagination: PaginationArgs,

    /// Websocket endpoint for new block events. Derived from the RPC endpoint if not provided
    #[clap(long)]
    pub(crate) websocket_endpoint: Option<Url>,
}

pub(crate) async fn execute(args: Args, client_args: &ClientArgs) -> anyhow::Result<()> {
    let websocket_endpoint = match args.websocket_endpoint {
        Some(endpoint) => endpoint,
        None => client_args.websocket_endpoint()?,
    };
    let request = QueryAllNymRequest::new(args.pagination.page_request()?);
    let options = args.pagination.query_options(true);

    let cancel = CancellationToken::new();
    let (block_sender, block_receiver) = mpsc::unbounded_channel();
    let mut subscriber =
        ChainSubscriber::new(&websocket_endpoint, cancel.clone(), block_sender).await?;
    let driver = subscriber
        .take_websocket_driver()
        .ok_or_else(|| anyhow!("websocket driver has already been started"))?;

    let store = Arc::new(NymStore::new(client_args.query_client()?));
    let mut latest = store.try_query_nym_all(request.clone(), options).await?;
    print_json(&latest)?;

    let driver_handle = tokio::spawn(run_websocket_driver(driver, cancel.clone()));
    let subscriber_handle = tokio::spawn(async move { subscriber.run().await });

    let (refreshed_sender, mut refreshed) = mpsc::unbounded_channel();
    let listener_handle = {
        let store = Arc::clone(&store);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            store
                .run_block_listener(block_receiver, cancel, move |block| {
                    // the receiving end only goes away once we are shutting down
                    let _ = refreshed_sender.send(block.height);
                })
                .await
        })
    };

    info!("watching for new blocks on {websocket_endpoint}");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("received SIGINT");
                break
            }
            maybe_height = refreshed.recv() => {
                let Some(height) = maybe_height else {
                    warn!("stopped receiving new blocks");
                    break;
                };
                let current = store.get_nym_all(&request).await;
                if current != latest {
                    info!("nyms changed at height {height}");
                    print_json(&current)?;
                    latest = current;
                }
            }
        }
    }

    cancel.cancel();
    match subscriber_handle.await {
        Ok(Err(err)) => error!("chain subscriber has failed: {err}"),
        Err(err) => error!("chain subscriber task has panicked: {err}"),
        Ok(Ok(())) => {}
    }
    listener_handle.await?;
    driver_handle.await?;
    Ok(())
}
