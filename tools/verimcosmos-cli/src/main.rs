// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cli::Cli;
use clap::Parser;

mod cli;
mod context;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // values from `.env` have to be in place before clap reads its `env` fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::setup_tracing_logger();

    cli.execute().await
}
