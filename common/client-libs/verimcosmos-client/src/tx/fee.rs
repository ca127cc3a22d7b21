// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::coin::{CoinConversionError, CosmosCoin};
use crate::Coin;
use cosmrs::tx;
use cosmrs::Gas;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const DEFAULT_GAS_LIMIT: Gas = 200_000;

/// Fee attached to every broadcast transaction. The module does not require any fee amount
/// by default, only the gas limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub gas_limit: Gas,
}

impl Default for Fee {
    fn default() -> Self {
        Fee {
            amount: Vec::new(),
            gas_limit: DEFAULT_GAS_LIMIT,
        }
    }
}

impl Fee {
    pub fn new(amount: Vec<Coin>, gas_limit: Gas) -> Self {
        Fee { amount, gas_limit }
    }

    pub fn with_gas_limit(gas_limit: Gas) -> Self {
        Fee {
            amount: Vec::new(),
            gas_limit,
        }
    }
}

impl Display for Fee {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.amount.is_empty() {
            write!(f, "no fee amount, ")?;
        }
        for coin in &self.amount {
            write!(f, "{coin} paid in fees, ")?;
        }
        write!(f, "{} set as gas limit", self.gas_limit)
    }
}

impl TryFrom<Fee> for tx::Fee {
    type Error = CoinConversionError;

    fn try_from(fee: Fee) -> Result<Self, Self::Error> {
        let amount = fee
            .amount
            .into_iter()
            .map(CosmosCoin::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tx::Fee {
            amount,
            gas_limit: fee.gas_limit,
            payer: None,
            granter: None,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_fee_has_no_amount_and_default_gas() {
        let fee = Fee::default();
        assert!(fee.amount.is_empty());
        assert_eq!(fee.gas_limit, 200_000);

        let converted = tx::Fee::try_from(fee).unwrap();
        assert!(converted.amount.is_empty());
        assert_eq!(converted.gas_limit, 200_000);
    }

    #[test]
    fn fee_display() {
        let fee = Fee::new(vec![Coin::new(10, "stake")], 100);
        assert_eq!(fee.to_string(), "10stake paid in fees, 100 set as gas limit");
    }
}
