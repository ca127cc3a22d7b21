// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::context::ClientArgs;
use anyhow::Context;
use clap::Subcommand;
use std::fs;
use std::path::{Path, PathBuf};
use tap::TapFallible;
use tracing::{error, info};
use verimcosmos_client::NymQueryClient;
use verimcosmos_types::{GenesisState, MessageCodec};

#[derive(clap::Args)]
pub(crate) struct GenesisArgs {
    #[clap(subcommand)]
    pub(crate) command: GenesisCommands,
}

#[derive(Subcommand)]
pub(crate) enum GenesisCommands {
    /// Check a genesis file for malformed records and duplicated ids
    Validate {
        file: PathBuf,
    },

    /// Write every nym currently registered on chain into a genesis file
    Export {
        file: PathBuf,
    },
}

pub(crate) fn read_genesis(path: &Path) -> anyhow::Result<GenesisState> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read genesis file {}", path.display()))?;
    let genesis = GenesisState::from_json_str(&raw)?;
    genesis.validate()?;
    Ok(genesis)
}

pub(crate) fn write_genesis(path: &Path, genesis: &GenesisState) -> anyhow::Result<()> {
    genesis.validate()?;
    let raw = serde_json::to_string_pretty(&genesis.to_json()?)?;
    fs::write(path, raw)
        .with_context(|| format!("failed to write genesis file {}", path.display()))
}

async fn export<Q: NymQueryClient>(file: &Path, client: &Q) -> anyhow::Result<()> {
    let nyms = client
        .get_all_nyms(None)
        .await
        .tap_err(|err| error!("failed to retrieve the list of nyms: {err}"))?;

    let genesis = GenesisState::new(nyms.nym);
    write_genesis(file, &genesis)?;
    info!(
        "exported {} nyms to {}",
        genesis.nym_list.len(),
        file.display()
    );
    Ok(())
}

pub(crate) async fn execute(args: GenesisArgs, client_args: &ClientArgs) -> anyhow::Result<()> {
    match args.command {
        GenesisCommands::Validate { file } => {
            let genesis =
                read_genesis(&file).tap_err(|err| error!("invalid genesis file: {err}"))?;
            println!("genesis is valid, it contains {} nyms", genesis.nym_list.len());
            Ok(())
        }
        GenesisCommands::Export { file } => export(&file, &client_args.query_client()?).await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use verimcosmos_types::Nym;

    fn nym(id: u64) -> Nym {
        Nym {
            creator: "cosmos1creator".to_string(),
            id,
            alias: format!("alias-{id}"),
            ..Default::default()
        }
    }

    #[test]
    fn written_genesis_can_be_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis.json");
        let genesis = GenesisState::new(vec![nym(1), nym(2)]);

        write_genesis(&path, &genesis).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("nymList"));

        assert_eq!(read_genesis(&path).unwrap(), genesis);
    }

    #[test]
    fn duplicated_ids_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis.json");
        fs::write(
            &path,
            r#"{"nymList": [{"id": "3", "alias": "a"}, {"id": 3, "alias": "b"}]}"#,
        )
        .unwrap();

        assert!(read_genesis(&path).is_err());
    }

    #[test]
    fn empty_or_null_list_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis.json");

        fs::write(&path, r#"{"nymList": null}"#).unwrap();
        assert!(read_genesis(&path).unwrap().nym_list.is_empty());

        fs::write(&path, "{}").unwrap();
        assert!(read_genesis(&path).unwrap().nym_list.is_empty());
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_genesis(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read genesis file"));
    }

    #[test]
    fn invalid_genesis_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis.json");
        let genesis = GenesisState::new(vec![nym(1), nym(1)]);

        assert!(write_genesis(&path, &genesis).is_err());
        assert!(!path.exists());
    }
}
