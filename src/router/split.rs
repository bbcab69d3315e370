// Split optimizer
// This file searches one-, two- and three-way splits of the bucket ladder
// for the best combination of pool-disjoint routes
//
// Numan Thabit 2025 Nov

use crate::amounts::CurrencyAmount;
use crate::errors::{Result, RouterError};
use crate::router::routes::{route_to_string, Route, RouteAmount, RouteType, SwapRoute, SwapRoutes};
use crate::router::valuation::RouteWithValidQuote;
use crate::venues::pool::PoolKey;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, info};

/// Widest split the search covers.
pub const MAX_SUPPORTED_SPLITS: usize = 3;

type Objective = fn(&RouteWithValidQuote) -> &CurrencyAmount;

fn raw_objective(rq: &RouteWithValidQuote) -> &CurrencyAmount {
    rq.quote()
}

fn gas_adjusted_objective(rq: &RouteWithValidQuote) -> &CurrencyAmount {
    rq.quote_adjusted_for_gas()
}

/// Best split under the raw quote and under the gas-adjusted quote.
/// `by_bucket[i]` holds the valid quotes for `percents[i]`.
/// Returns `Ok(None)` when nothing quotes at 100%.
pub fn get_best_swap_route(
    route_type: RouteType,
    by_bucket: &[Vec<RouteWithValidQuote>],
    percents: &[u32],
    max_splits: usize,
) -> Result<Option<SwapRoutes>> {
    let Some(raw) = get_best_swap_route_by(route_type, by_bucket, percents, raw_objective, max_splits)?
    else {
        return Ok(None);
    };
    let Some(gas_adjusted) =
        get_best_swap_route_by(route_type, by_bucket, percents, gas_adjusted_objective, max_splits)?
    else {
        return Ok(None);
    };

    info!(
        route_type = %route_type,
        raw_quote = %raw.quote,
        raw_legs = raw.route_amounts.len(),
        gas_adjusted_quote = %gas_adjusted.quote_gas_adjusted,
        gas_adjusted_legs = gas_adjusted.route_amounts.len(),
        "selected best swap routes"
    );
    Ok(Some(SwapRoutes { raw, gas_adjusted }))
}

pub(crate) fn check_max_splits(max_splits: usize) -> Result<()> {
    if max_splits == 0 {
        return Err(RouterError::InvalidConfig("max_splits must be at least 1".into()));
    }
    if max_splits > MAX_SUPPORTED_SPLITS {
        return Err(RouterError::NotImplemented(format!(
            "{max_splits}-way splits (at most {MAX_SUPPORTED_SPLITS} are supported)"
        )));
    }
    Ok(())
}

/// First candidate, in rank order, sharing no pool with `used`.
fn first_route_not_using_pools<'a>(
    used: &[&Route],
    candidates: &[&'a RouteWithValidQuote],
) -> Option<&'a RouteWithValidQuote> {
    let used_pools: HashSet<PoolKey> = used
        .iter()
        .flat_map(|route| route.pool_keys().cloned())
        .collect();
    candidates
        .iter()
        .find(|rq| !rq.route.uses_any_pool(&used_pools))
        .copied()
}

/// Best split under one objective.
pub fn get_best_swap_route_by(
    route_type: RouteType,
    by_bucket: &[Vec<RouteWithValidQuote>],
    percents: &[u32],
    by: Objective,
    max_splits: usize,
) -> Result<Option<SwapRoute>> {
    check_max_splits(max_splits)?;

    // Rank each bucket best-first; the sort is stable so ties keep provider order.
    let sorted: Vec<Vec<&RouteWithValidQuote>> = by_bucket
        .iter()
        .map(|quotes| {
            let mut ranked: Vec<&RouteWithValidQuote> = quotes.iter().collect();
            ranked.sort_by(|a, b| match route_type {
                RouteType::ExactIn => by(b).raw().cmp(by(a).raw()),
                RouteType::ExactOut => by(a).raw().cmp(by(b).raw()),
            });
            ranked
        })
        .collect();

    let bucket_of = |percent: u32| percents.iter().position(|&p| p == percent);
    let is_better = |candidate: &CurrencyAmount, best: &CurrencyAmount| {
        let ord = candidate.raw().cmp(best.raw());
        match route_type {
            RouteType::ExactIn => ord == Ordering::Greater,
            RouteType::ExactOut => ord == Ordering::Less,
        }
    };

    let Some(full) = bucket_of(100).and_then(|i| sorted[i].first().copied()) else {
        info!(
            buckets_with_quotes = sorted.iter().filter(|b| !b.is_empty()).count(),
            "did not find a valid route without any splits"
        );
        return Ok(None);
    };

    let mut best_quote = by(full).clone();
    let mut best_swap: Vec<&RouteWithValidQuote> = vec![full];

    if max_splits >= 2 {
        for (i, &percent_a) in percents.iter().enumerate() {
            if percent_a > 50 {
                continue;
            }
            let Some(&a) = sorted[i].first() else {
                continue;
            };
            let Some(j) = bucket_of(100 - percent_a) else {
                continue;
            };
            let Some(b) = first_route_not_using_pools(&[&a.route], &sorted[j]) else {
                continue;
            };

            let quote = by(a).add(by(b));
            if is_better(&quote, &best_quote) {
                best_quote = quote;
                best_swap = vec![a, b];
            }
        }
    }

    if max_splits >= 3 {
        for (i, &percent_a) in percents.iter().enumerate() {
            let Some(&a) = sorted[i].first() else {
                continue;
            };
            for (j, &percent_b) in percents.iter().enumerate().skip(i + 1) {
                if percent_a + percent_b >= 100 {
                    continue;
                }
                let Some(k) = bucket_of(100 - percent_a - percent_b) else {
                    continue;
                };
                let Some(b) = first_route_not_using_pools(&[&a.route], &sorted[j]) else {
                    continue;
                };
                let Some(c) = first_route_not_using_pools(&[&a.route, &b.route], &sorted[k]) else {
                    continue;
                };

                let quote = by(a).add(by(b)).add(by(c));
                if is_better(&quote, &best_quote) {
                    best_quote = quote;
                    best_swap = vec![a, b, c];
                }
            }
        }
    }

    Ok(Some(to_swap_route(&best_swap)))
}

fn to_swap_route(legs: &[&RouteWithValidQuote]) -> SwapRoute {
    let sum = |f: Objective| {
        legs[1..]
            .iter()
            .fold(f(legs[0]).clone(), |acc, &rq| acc.add(f(rq)))
    };
    let quote = sum(raw_objective);
    let quote_gas_adjusted = sum(gas_adjusted_objective);

    let mut route_amounts: Vec<RouteAmount> = legs
        .iter()
        .map(|rq| RouteAmount {
            route: rq.route.clone(),
            input: rq.amount.clone(),
            amount: rq.quote().clone(),
            percentage: rq.percent,
        })
        .collect();
    route_amounts.sort_by(|a, b| b.percentage.cmp(&a.percentage));

    debug!(
        legs = ?route_amounts
            .iter()
            .map(|ra| format!("{}% = {}", ra.percentage, route_to_string(&ra.route)))
            .collect::<Vec<_>>(),
        quote = %quote,
        quote_gas_adjusted = %quote_gas_adjusted,
        "best split"
    );

    SwapRoute {
        quote,
        quote_gas_adjusted,
        route_amounts,
    }
}
