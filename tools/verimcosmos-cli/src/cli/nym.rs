// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::context::ClientArgs;
use anyhow::{bail, Context};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::Subcommand;
use serde::Serialize;
use serde_json::json;
use tap::TapFallible;
use tracing::{error, info};
use verimcosmos_client::{created_nym_id, NymQueryClient, TxResponse};
use verimcosmos_store::QueryOptions;
use verimcosmos_types::{Nym, NymId, PageRequest, PartialNym};

#[derive(clap::Args)]
pub(crate) struct NymArgs {
    #[clap(subcommand)]
    pub(crate) command: NymCommands,
}

#[derive(Subcommand)]
pub(crate) enum NymCommands {
    /// Register a new nym owned by the signing account
    Create(CreateArgs),

    /// Overwrite all fields of an existing nym
    Update(UpdateArgs),

    /// Remove an existing nym
    Delete(DeleteArgs),

    /// Show a single nym
    Show(ShowArgs),

    /// List the registered nyms
    List(PaginationArgs),

    /// Describe the fields of a nym record
    Structure,
}

#[derive(clap::Args, Debug)]
pub(crate) struct CreateArgs {
    pub(crate) alias: String,
    pub(crate) verkey: String,
    pub(crate) did: String,
    pub(crate) role: String,

    /// Optional memo attached to the transaction
    #[clap(long, default_value = "")]
    pub(crate) memo: String,
}

#[derive(clap::Args, Debug)]
pub(crate) struct UpdateArgs {
    pub(crate) id: NymId,
    pub(crate) alias: String,
    pub(crate) verkey: String,
    pub(crate) did: String,
    pub(crate) role: String,

    /// Optional memo attached to the transaction
    #[clap(long, default_value = "")]
    pub(crate) memo: String,
}

#[derive(clap::Args, Debug)]
pub(crate) struct DeleteArgs {
    pub(crate) id: NymId,

    /// Optional memo attached to the transaction
    #[clap(long, default_value = "")]
    pub(crate) memo: String,
}

#[derive(clap::Args, Debug)]
pub(crate) struct ShowArgs {
    pub(crate) id: NymId,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub(crate) struct PaginationArgs {
    /// Keep fetching pages until the whole list has been retrieved
    #[clap(long)]
    pub(crate) all: bool,

    /// Maximum number of nyms per page
    #[clap(long)]
    pub(crate) limit: Option<u64>,

    /// Number of nyms to skip. Ignored by the node when a key is provided
    #[clap(long)]
    pub(crate) offset: Option<u64>,

    /// Base64 encoded key to continue from, as returned in `pagination.next_key`
    #[clap(long)]
    pub(crate) key: Option<String>,

    /// Ask the node to count the total number of nyms
    #[clap(long)]
    pub(crate) count_total: bool,

    /// List the nyms in descending order
    #[clap(long)]
    pub(crate) reverse: bool,
}

impl PaginationArgs {
    /// Pagination to attach to the request, `None` if none of the flags were set.
    pub(crate) fn page_request(&self) -> anyhow::Result<Option<PageRequest>> {
        if self.limit.is_none()
            && self.offset.is_none()
            && self.key.is_none()
            && !self.count_total
            && !self.reverse
        {
            return Ok(None);
        }

        let key = match &self.key {
            Some(raw) => STANDARD
                .decode(raw)
                .with_context(|| format!("'{raw}' is not a valid base64 pagination key"))?,
            None => Vec::new(),
        };

        Ok(Some(PageRequest {
            key,
            offset: self.offset.unwrap_or_default(),
            limit: self.limit.unwrap_or_default(),
            count_total: self.count_total,
            reverse: self.reverse,
        }))
    }

    pub(crate) fn query_options(&self, subscribe: bool) -> QueryOptions {
        QueryOptions {
            subscribe,
            all: self.all,
        }
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_tx_outcome(response: &TxResponse) -> anyhow::Result<()> {
    // a transaction rejected by `check_tx` never makes it into a block
    let (code, log) = if response.check_tx.code.is_err() {
        (response.check_tx.code, &response.check_tx.log)
    } else {
        (response.tx_result.code, &response.tx_result.log)
    };

    print_json(&json!({
        "hash": response.hash.to_string(),
        "height": response.height.value(),
        "code": code.value(),
        "gas_used": response.tx_result.gas_used,
        "log": log,
    }))?;

    if code.is_err() {
        bail!("transaction {} failed with code {}: {log}", response.hash, code.value())
    }
    Ok(())
}

pub(crate) async fn execute(args: NymArgs, client_args: &ClientArgs) -> anyhow::Result<()> {
    match args.command {
        NymCommands::Create(args) => create(args, client_args).await,
        NymCommands::Update(args) => update(args, client_args).await,
        NymCommands::Delete(args) => delete(args, client_args).await,
        NymCommands::Show(args) => show(args, &client_args.query_client()?).await,
        NymCommands::List(args) => list(args, &client_args.query_client()?).await,
        NymCommands::Structure => print_json(&Nym::structure()),
    }
}

async fn create(args: CreateArgs, client_args: &ClientArgs) -> anyhow::Result<()> {
    let nym = PartialNym {
        alias: Some(args.alias),
        verkey: Some(args.verkey),
        did: Some(args.did),
        role: Some(args.role),
        ..Default::default()
    };

    let res = client_args
        .tx_client()?
        .send_msg_create_nym(nym, client_args.fee(), args.memo)
        .await
        .tap_err(|err| error!("failed to create nym: {err}"))?;

    print_tx_outcome(&res)?;
    if let Some(id) = created_nym_id(&res)? {
        info!("created nym {id}");
        println!("{id}");
    }
    Ok(())
}

async fn update(args: UpdateArgs, client_args: &ClientArgs) -> anyhow::Result<()> {
    let id = args.id;
    let nym = PartialNym {
        id: Some(id),
        alias: Some(args.alias),
        verkey: Some(args.verkey),
        did: Some(args.did),
        role: Some(args.role),
        ..Default::default()
    };

    let res = client_args
        .tx_client()?
        .send_msg_update_nym(nym, client_args.fee(), args.memo)
        .await
        .tap_err(|err| error!("failed to update nym {id}: {err}"))?;

    print_tx_outcome(&res)
}

async fn delete(args: DeleteArgs, client_args: &ClientArgs) -> anyhow::Result<()> {
    let id = args.id;
    let nym = PartialNym {
        id: Some(id),
        ..Default::default()
    };

    let res = client_args
        .tx_client()?
        .send_msg_delete_nym(nym, client_args.fee(), args.memo)
        .await
        .tap_err(|err| error!("failed to delete nym {id}: {err}"))?;

    print_tx_outcome(&res)
}

async fn show<Q: NymQueryClient>(args: ShowArgs, client: &Q) -> anyhow::Result<()> {
    let id = args.id;
    let Some(nym) = client
        .get_nym(id)
        .await
        .tap_err(|err| error!("failed to query nym {id}: {err}"))?
    else {
        bail!("nym {id} does not exist")
    };
    print_json(&nym)
}

async fn list<Q: NymQueryClient>(args: PaginationArgs, client: &Q) -> anyhow::Result<()> {
    let pagination = args.page_request()?;
    let res = if args.all {
        client.get_all_nyms(pagination).await
    } else {
        client.query_nym_all(pagination).await
    }
    .tap_err(|err| error!("failed to list nyms: {err}"))?;

    print_json(&res)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_means_no_pagination() {
        assert!(PaginationArgs::default().page_request().unwrap().is_none());

        let all_only = PaginationArgs {
            all: true,
            ..Default::default()
        };
        assert!(all_only.page_request().unwrap().is_none());
        assert!(all_only.query_options(false).all);
    }

    #[test]
    fn pagination_flags_are_carried_over() {
        let args = PaginationArgs {
            limit: Some(10),
            offset: Some(20),
            key: Some("Sw==".to_string()),
            reverse: true,
            ..Default::default()
        };
        let request = args.page_request().unwrap().unwrap();
        assert_eq!(request.key, b"K");
        assert_eq!(request.limit, 10);
        assert_eq!(request.offset, 20);
        assert!(request.reverse);
        assert!(!request.count_total);
    }

    #[test]
    fn malformed_key_is_rejected() {
        let args = PaginationArgs {
            key: Some("not base64!".to_string()),
            ..Default::default()
        };
        assert!(args.page_request().is_err());
    }
}
