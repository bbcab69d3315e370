// Quote valuation
// This file binds a route to one valid bucket quote and prices it with the
// gas model, dropping quotes that are missing any field
//
// Numan Thabit 2025 Nov

use crate::amounts::CurrencyAmount;
use crate::gas::model::GasModel;
use crate::metrics::QUOTES_DROPPED;
use crate::router::routes::{route_to_string, Route, RouteType};
use crate::tokens::Token;
use crate::venues::quoter::RouteWithQuotes;
use num_bigint::BigInt;
use tracing::debug;

pub struct RouteWithValidQuoteParams {
    pub route: Route,
    pub route_type: RouteType,
    pub amount: CurrencyAmount,
    pub raw_quote: BigInt,
    pub percent: u32,
    pub sqrt_price_x96_after_list: Vec<BigInt>,
    pub initialized_ticks_crossed_list: Vec<u32>,
    pub gas_estimate: BigInt,
    pub quote_token: Token,
}

/// A route quoted for one bucket, with its gas cost already priced.
#[derive(Debug, Clone)]
pub struct RouteWithValidQuote {
    pub route: Route,
    pub route_type: RouteType,
    /// Bucket amount that was quoted.
    pub amount: CurrencyAmount,
    pub raw_quote: BigInt,
    pub percent: u32,
    pub sqrt_price_x96_after_list: Vec<BigInt>,
    pub initialized_ticks_crossed_list: Vec<u32>,
    pub gas_estimate: BigInt,
    pub quote_token: Token,
    quote: CurrencyAmount,
    gas_cost_in_token: CurrencyAmount,
    quote_adjusted_for_gas: CurrencyAmount,
}

impl RouteWithValidQuote {
    pub fn new(params: RouteWithValidQuoteParams, gas_model: &dyn GasModel) -> Self {
        let quote = CurrencyAmount::from_raw(params.quote_token.clone(), params.raw_quote.clone());
        let zero = CurrencyAmount::zero(params.quote_token.clone());
        let mut valued = Self {
            route: params.route,
            route_type: params.route_type,
            amount: params.amount,
            raw_quote: params.raw_quote,
            percent: params.percent,
            sqrt_price_x96_after_list: params.sqrt_price_x96_after_list,
            initialized_ticks_crossed_list: params.initialized_ticks_crossed_list,
            gas_estimate: params.gas_estimate,
            quote_token: params.quote_token,
            quote: quote.clone(),
            gas_cost_in_token: zero,
            quote_adjusted_for_gas: quote,
        };

        let gas_cost = gas_model.estimate_gas_cost_in_terms_of_token(&valued);
        // Gas eats into output for exact in and adds to required input for exact out.
        valued.quote_adjusted_for_gas = match valued.route_type {
            RouteType::ExactIn => valued.quote.subtract(&gas_cost),
            RouteType::ExactOut => valued.quote.add(&gas_cost),
        };
        valued.gas_cost_in_token = gas_cost;

        debug!(
            route = %route_to_string(&valued.route),
            percent = valued.percent,
            quote = %valued.quote.to_fixed(4),
            gas_cost = %valued.gas_cost_in_token.to_fixed(4),
            "valued route quote"
        );
        valued
    }

    pub fn quote(&self) -> &CurrencyAmount {
        &self.quote
    }

    pub fn gas_cost_in_token(&self) -> &CurrencyAmount {
        &self.gas_cost_in_token
    }

    pub fn quote_adjusted_for_gas(&self) -> &CurrencyAmount {
        &self.quote_adjusted_for_gas
    }
}

/// Valid quotes grouped by bucket rank: entry `i` holds the quotes for
/// `percents[i]`, in quote-provider route order. Incomplete quotes are dropped.
pub fn to_valid_quotes_by_bucket(
    percents: &[u32],
    route_with_quotes: Vec<RouteWithQuotes>,
    quote_token: &Token,
    route_type: RouteType,
    gas_model: &dyn GasModel,
) -> Vec<Vec<RouteWithValidQuote>> {
    let mut by_bucket: Vec<Vec<RouteWithValidQuote>> = vec![Vec::new(); percents.len()];

    for (route, quotes) in route_with_quotes {
        for ((bucket, &percent), amount_quote) in
            by_bucket.iter_mut().zip(percents).zip(quotes)
        {
            let (Some(raw_quote), Some(sqrt_prices), Some(ticks), Some(gas_estimate)) = (
                amount_quote.quote,
                amount_quote.sqrt_price_x96_after_list,
                amount_quote.initialized_ticks_crossed_list,
                amount_quote.gas_estimate,
            ) else {
                QUOTES_DROPPED.inc();
                debug!(
                    route = %route_to_string(&route),
                    amount = %amount_quote.amount.to_fixed(2),
                    percent = percent,
                    "dropping a null quote for route"
                );
                continue;
            };

            bucket.push(RouteWithValidQuote::new(
                RouteWithValidQuoteParams {
                    route: route.clone(),
                    route_type,
                    amount: amount_quote.amount,
                    raw_quote,
                    percent,
                    sqrt_price_x96_after_list: sqrt_prices,
                    initialized_ticks_crossed_list: ticks,
                    gas_estimate,
                    quote_token: quote_token.clone(),
                },
                gas_model,
            ));
        }
    }

    by_bucket
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::router::routes::tests::{pool, token};
    use crate::venues::pool::FeeAmount;
    use crate::venues::quoter::AmountQuote;

    /// Charges a fixed cost per hop, in quote-token raw units.
    pub(crate) struct PerHopGas(pub u64);

    impl GasModel for PerHopGas {
        fn estimate_gas_cost_in_terms_of_token(&self, route: &RouteWithValidQuote) -> CurrencyAmount {
            CurrencyAmount::from_raw(
                route.quote_token.clone(),
                self.0 * route.route.hops() as u64,
            )
        }
    }

    fn full_quote(amount: CurrencyAmount, out: u64) -> AmountQuote {
        AmountQuote {
            amount,
            quote: Some(BigInt::from(out)),
            sqrt_price_x96_after_list: Some(vec![BigInt::from(1)]),
            initialized_ticks_crossed_list: Some(vec![0]),
            gas_estimate: Some(BigInt::from(1)),
        }
    }

    #[test]
    fn test_gas_adjusted_quote_subtracts_cost_for_exact_in() {
        let (a, b) = (token(1, "A"), token(2, "B"));
        let route = Route::new(vec![pool(&a, &b, FeeAmount::Medium, 1.0)], a.clone(), b.clone()).unwrap();
        let percents = [50, 100];
        let quotes = vec![(
            route,
            vec![
                full_quote(CurrencyAmount::from_raw(a.clone(), 5), 40),
                full_quote(CurrencyAmount::from_raw(a, 10), 70),
            ],
        )];

        let buckets = to_valid_quotes_by_bucket(&percents, quotes, &b, RouteType::ExactIn, &PerHopGas(3));
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[1][0].quote().quotient(), BigInt::from(70));
        assert_eq!(buckets[1][0].quote_adjusted_for_gas().quotient(), BigInt::from(67));
        assert_eq!(buckets[0][0].percent, 50);
    }

    #[test]
    fn test_incomplete_quotes_are_dropped_not_defaulted() {
        let (a, b) = (token(1, "A"), token(2, "B"));
        let route = Route::new(vec![pool(&a, &b, FeeAmount::Medium, 1.0)], a.clone(), b.clone()).unwrap();
        let mut missing_gas = full_quote(CurrencyAmount::from_raw(a.clone(), 10), 70);
        missing_gas.gas_estimate = None;
        let quotes = vec![(
            route,
            vec![AmountQuote::absent(CurrencyAmount::from_raw(a, 5)), missing_gas],
        )];

        let buckets = to_valid_quotes_by_bucket(&[50, 100], quotes, &b, RouteType::ExactIn, &PerHopGas(0));
        assert!(buckets.iter().all(Vec::is_empty));
    }
}
