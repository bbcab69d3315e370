// Heuristic gas model
// This file estimates swap gas from hop and tick-crossing counts and
// converts the cost into the quote token through the deepest WETH pool
//
// Numan Thabit 2025 Nov

use crate::amounts::{CurrencyAmount, Fraction};
use crate::chains::ChainId;
use crate::errors::Result;
use crate::gas::model::{GasModel, GasModelFactory};
use crate::router::valuation::RouteWithValidQuote;
use crate::tokens::{Token, TokenProvider};
use crate::venues::pool::Pool;
use num_bigint::BigInt;
use num_rational::BigRational;
use std::sync::Arc;
use tracing::{debug, warn};

pub const BASE_SWAP_COST: u64 = 2_000;
pub const COST_PER_HOP: u64 = 80_000;
pub const COST_PER_INIT_TICK: u64 = 31_000;

#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicGasModelFactory;

impl HeuristicGasModelFactory {
    pub fn new() -> Self {
        Self
    }
}

/// Gas units for a route crossing `ticks_crossed` initialized ticks.
pub fn estimate_gas_units(hops: usize, ticks_crossed: u64) -> u64 {
    BASE_SWAP_COST + COST_PER_HOP * hops as u64 + COST_PER_INIT_TICK * ticks_crossed
}

struct HeuristicGasModel {
    gas_price_wei: BigInt,
    quote_token: Token,
    /// Raw quote-token units per wei; None when no conversion pool exists.
    quote_per_wei: Option<Fraction>,
}

impl GasModel for HeuristicGasModel {
    fn estimate_gas_cost_in_terms_of_token(&self, route: &RouteWithValidQuote) -> CurrencyAmount {
        let Some(rate) = &self.quote_per_wei else {
            return CurrencyAmount::zero(self.quote_token.clone());
        };
        let ticks: u64 = route
            .initialized_ticks_crossed_list
            .iter()
            .map(|&t| u64::from(t))
            .sum();
        let units = estimate_gas_units(route.route.hops(), ticks);
        let wei = BigInt::from(units) * &self.gas_price_wei;
        CurrencyAmount::from_fraction(
            self.quote_token.clone(),
            BigRational::from_integer(wei) * rate,
        )
    }
}

impl GasModelFactory for HeuristicGasModelFactory {
    fn build_gas_model(
        &self,
        chain_id: ChainId,
        gas_price_wei: &BigInt,
        tokens: &TokenProvider,
        pools: &[Pool],
        quote_token: &Token,
    ) -> Result<Arc<dyn GasModel>> {
        let weth = tokens.wrapped_native(chain_id);

        let quote_per_wei = if quote_token == &weth {
            Some(BigRational::from_integer(BigInt::from(1)))
        } else {
            let deepest = pools
                .iter()
                .filter(|p| p.involves_token(&weth) && p.involves_token(quote_token))
                .filter(|p| p.price_of(&weth).is_some())
                .max_by(|a, b| a.liquidity.total_cmp(&b.liquidity));
            match deepest {
                Some(pool) => {
                    debug!(pool = %pool, quote_token = %quote_token, "pricing gas through pool");
                    pool.price_of(&weth)
                }
                None => {
                    warn!(
                        quote_token = %quote_token,
                        chain = %chain_id,
                        "no WETH pool to price gas in quote token; gas cost treated as zero"
                    );
                    None
                }
            }
        };

        Ok(Arc::new(HeuristicGasModel {
            gas_price_wei: gas_price_wei.clone(),
            quote_token: quote_token.clone(),
            quote_per_wei,
        }))
    }
}
