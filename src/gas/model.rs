// Gas model interfaces
// This file defines how a route's execution cost is priced in the quote
// token and how a model is built for one route computation
//
// Numan Thabit 2025 Nov

use crate::amounts::CurrencyAmount;
use crate::chains::ChainId;
use crate::errors::Result;
use crate::router::valuation::RouteWithValidQuote;
use crate::tokens::{Token, TokenProvider};
use crate::venues::pool::Pool;
use num_bigint::BigInt;
use std::sync::Arc;

/// Prices the execution cost of a quoted route in the quote token.
pub trait GasModel: Send + Sync {
    fn estimate_gas_cost_in_terms_of_token(&self, route: &RouteWithValidQuote) -> CurrencyAmount;
}

/// Builds a gas model for one request. `pools` are the candidate pools of
/// that request and may be used to convert native cost into `quote_token`.
pub trait GasModelFactory: Send + Sync {
    fn build_gas_model(
        &self,
        chain_id: ChainId,
        gas_price_wei: &BigInt,
        tokens: &TokenProvider,
        pools: &[Pool],
        quote_token: &Token,
    ) -> Result<Arc<dyn GasModel>>;
}
