// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

pub use cosmrs::Coin as CosmosCoin;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Serialize, Deserialize, Clone, Default, Debug, PartialEq, Eq)]
pub struct Coin {
    pub amount: u128,
    pub denom: String,
}

impl Coin {
    pub fn new<S: Into<String>>(amount: u128, denom: S) -> Self {
        Coin {
            amount,
            denom: denom.into(),
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoinFromStrError {
    #[error("Missing denominator")]
    MissingDenom,
    #[error("Missing amount or non-digit characters in amount")]
    MissingAmount,
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] std::num::ParseIntError),
}

impl FromStr for Coin {
    type Err = CoinFromStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pos = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or(CoinFromStrError::MissingDenom)?;
        let (amount, denom) = s.split_at(pos);

        if amount.is_empty() {
            return Err(CoinFromStrError::MissingAmount);
        }

        Ok(Coin {
            amount: amount.parse::<u128>()?,
            denom: denom.to_string(),
        })
    }
}

#[derive(Error, Debug)]
#[error("{coin} could not be converted into a cosmos coin: {reason}")]
pub struct CoinConversionError {
    coin: Coin,
    reason: String,
}

impl TryFrom<Coin> for CosmosCoin {
    type Error = CoinConversionError;

    fn try_from(coin: Coin) -> Result<Self, Self::Error> {
        let denom = coin.denom.parse().map_err(|err: cosmrs::ErrorReport| {
            CoinConversionError {
                reason: err.to_string(),
                coin: coin.clone(),
            }
        })?;

        Ok(CosmosCoin {
            denom,
            amount: coin.amount,
        })
    }
}

impl From<CosmosCoin> for Coin {
    fn from(coin: CosmosCoin) -> Self {
        Coin {
            amount: coin.amount,
            denom: coin.denom.to_string(),
        }
    }
}
