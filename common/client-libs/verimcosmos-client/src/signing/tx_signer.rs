// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::signing::signer::{OfflineSigner, SigningError};
use crate::signing::{AccountData, SignerData};
use cosmrs::tx::{SignDoc, SignerInfo};
use cosmrs::{tx, Any};

/// Only responsible for signing transactions, never touches the chain.
#[derive(Debug)]
pub struct TxSigner<'a, S> {
    signer: &'a S,
}

impl<'a, S> TxSigner<'a, S>
where
    S: OfflineSigner,
{
    pub fn new(signer: &'a S) -> Self {
        TxSigner { signer }
    }

    pub fn sign_direct_with_account(
        &self,
        account: &AccountData,
        messages: Vec<Any>,
        fee: tx::Fee,
        memo: impl Into<String>,
        signer_data: SignerData,
    ) -> Result<tx::Raw, S::Error> {
        let timeout_height = 0u32;

        let tx_body = tx::Body::new(messages, memo, timeout_height);
        let signer_info =
            SignerInfo::single_direct(Some(account.public_key), signer_data.sequence);
        let auth_info = signer_info.auth_info(fee);

        let sign_doc = SignDoc::new(
            &tx_body,
            &auth_info,
            &signer_data.chain_id,
            signer_data.account_number,
        )
        .map_err(|source| SigningError::SignDocFailure { source }.into())?;

        self.signer.sign_direct_with_account(account, sign_doc)
    }
}
