// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::signing::signer::{OfflineSigner, SigningError};
use crate::signing::AccountData;
use cosmrs::bip32::DerivationPath;
use cosmrs::crypto::secp256k1::SigningKey;
use cosmrs::ErrorReport;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_COSMOS_DERIVATION_PATH: &str = "m/44'/118'/0'/0/0";

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("there was an issue with bip39 - {0}")]
    Bip39Error(#[from] bip39::Error),

    #[error("there was an issue with bip32 - {0}")]
    Bip32Error(#[from] cosmrs::bip32::Error),

    #[error("failed to derive account data - {source}")]
    AccountDerivationFailure { source: ErrorReport },

    #[error(transparent)]
    SigningFailure(#[from] SigningError),
}

/// Derivation information required to derive a keypair and an address from a mnemonic.
#[derive(Debug, Clone)]
struct Secp256k1Derivation {
    hd_path: DerivationPath,
    prefix: String,
}

/// Wallet restored from a bip39 mnemonic, signing in direct mode.
///
/// Keys are not kept in memory, they get re-derived from the seed whenever accounts are requested.
pub struct DirectSecp256k1HdWallet {
    seed: [u8; 64],
    derivations: Vec<Secp256k1Derivation>,
}

impl fmt::Debug for DirectSecp256k1HdWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectSecp256k1HdWallet")
            .field("derivations", &self.derivations)
            .finish_non_exhaustive()
    }
}

impl DirectSecp256k1HdWallet {
    /// Restores a wallet from the given BIP39 mnemonic using the default cosmos derivation path.
    pub fn from_mnemonic(prefix: &str, mnemonic: bip39::Mnemonic) -> Result<Self, WalletError> {
        let hd_path = DEFAULT_COSMOS_DERIVATION_PATH.parse()?;
        let seed = mnemonic.to_seed("");

        Ok(DirectSecp256k1HdWallet {
            seed,
            derivations: vec![Secp256k1Derivation {
                hd_path,
                prefix: prefix.to_string(),
            }],
        })
    }

    pub fn from_phrase(prefix: &str, phrase: &str) -> Result<Self, WalletError> {
        Self::from_mnemonic(prefix, bip39::Mnemonic::parse(phrase)?)
    }

    fn derive_account(&self, derivation: &Secp256k1Derivation) -> Result<AccountData, WalletError> {
        let private_key = SigningKey::derive_from_path(self.seed, &derivation.hd_path)
            .map_err(|source| WalletError::AccountDerivationFailure { source: source.into() })?;
        let public_key = private_key.public_key();

        // it seems this can only fail if the provided account prefix is invalid
        let address = public_key
            .account_id(&derivation.prefix)
            .map_err(|source| WalletError::AccountDerivationFailure { source })?;

        Ok(AccountData {
            address,
            public_key,
            private_key,
        })
    }
}

impl OfflineSigner for DirectSecp256k1HdWallet {
    type Error = WalletError;

    fn get_accounts(&self) -> Result<Vec<AccountData>, Self::Error> {
        self.derivations
            .iter()
            .map(|derivation| self.derive_account(derivation))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn derivation_is_deterministic() {
        let first = DirectSecp256k1HdWallet::from_phrase("cosmos", MNEMONIC).unwrap();
        let second = DirectSecp256k1HdWallet::from_phrase("cosmos", MNEMONIC).unwrap();

        let first_address = first.first_account().unwrap().unwrap().address;
        let second_address = second.first_account().unwrap().unwrap().address;

        assert_eq!(first_address, second_address);
        assert_eq!(first_address.prefix(), "cosmos");
    }

    #[test]
    fn prefix_only_changes_the_address_encoding() {
        let cosmos = DirectSecp256k1HdWallet::from_phrase("cosmos", MNEMONIC).unwrap();
        let other = DirectSecp256k1HdWallet::from_phrase("verim", MNEMONIC).unwrap();

        let cosmos_account = cosmos.first_account().unwrap().unwrap();
        let other_account = other.first_account().unwrap().unwrap();

        assert_eq!(other_account.address.prefix(), "verim");
        assert_eq!(
            cosmos_account.address.to_bytes(),
            other_account.address.to_bytes()
        );
    }

    #[test]
    fn invalid_phrase_is_rejected() {
        assert!(matches!(
            DirectSecp256k1HdWallet::from_phrase("cosmos", "definitely not a mnemonic"),
            Err(WalletError::Bip39Error(_))
        ));
    }
}
