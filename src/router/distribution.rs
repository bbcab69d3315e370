// Amount distribution
// This file splits a total amount into the percentage buckets that every
// route is quoted at
//
// Numan Thabit 2025 Nov

use crate::amounts::{fraction, CurrencyAmount};
use crate::errors::{Result, RouterError};

/// Buckets `G, 2G, ..., 100` and the exact share of `amount` for each.
pub fn get_amount_distribution(
    amount: &CurrencyAmount,
    distribution_percent: u32,
) -> Result<(Vec<u32>, Vec<CurrencyAmount>)> {
    if distribution_percent == 0 || distribution_percent > 100 || 100 % distribution_percent != 0 {
        return Err(RouterError::InvalidDistribution(distribution_percent));
    }

    let (percents, amounts): (Vec<u32>, Vec<CurrencyAmount>) = (1..=100 / distribution_percent)
        .map(|i| {
            let percent = i * distribution_percent;
            (percent, amount.multiply(&fraction(percent as u64, 100)))
        })
        .unzip();
    Ok((percents, amounts))
}
