// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::context::ClientArgs;
use clap::{Parser, Subcommand};

mod genesis;
mod nym;
mod watch;

#[derive(Parser)]
#[clap(author = "Nymtech", version, about)]
pub(crate) struct Cli {
    #[clap(flatten)]
    client_args: ClientArgs,

    #[clap(subcommand)]
    command: Commands,
}

impl Cli {
    pub(crate) async fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Nym(args) => nym::execute(args, &self.client_args).await,
            Commands::Genesis(args) => genesis::execute(args, &self.client_args).await,
            Commands::Watch(args) => watch::execute(args, &self.client_args).await,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create, modify and query nym records
    Nym(nym::NymArgs),

    /// Validate or export the genesis state of the module
    Genesis(genesis::GenesisArgs),

    /// Keep a list query up to date by refreshing it on every new block
    Watch(watch::Args),
}
