// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::signing::AccountData;
use cosmrs::tx::SignDoc;
use cosmrs::{tx, ErrorReport};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("failed to sign the requested message: {source}")]
    SigningFailure { source: ErrorReport },

    #[error("failed to construct the sign doc: {source}")]
    SignDocFailure { source: ErrorReport },
}

pub trait OfflineSigner {
    type Error: From<SigningError>;

    fn get_accounts(&self) -> Result<Vec<AccountData>, Self::Error>;

    /// The account used for signing whenever no explicit address is requested.
    fn first_account(&self) -> Result<Option<AccountData>, Self::Error> {
        Ok(self.get_accounts()?.into_iter().next())
    }

    fn sign_direct_with_account(
        &self,
        signer: &AccountData,
        sign_doc: SignDoc,
    ) -> Result<tx::Raw, Self::Error> {
        sign_doc
            .sign(&signer.private_key)
            .map_err(|source| SigningError::SigningFailure { source }.into())
    }
}
