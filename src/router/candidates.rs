// Candidate pool selection
// This file narrows the venue universe to a bounded set of pools worth
// searching for one token pair
//
// Numan Thabit 2025 Nov

use crate::amounts::{parse_decimal, Fraction};
use crate::chains::ChainId;
use crate::router::routes::RouteType;
use crate::tokens::{Token, TokenProvider};
use crate::venues::pool::{parse_fee_amount, Pool};
use crate::venues::subgraph::SubgraphPool;
use num_bigint::BigInt;
use num_rational::BigRational;
use std::collections::HashSet;
use tracing::{debug, trace, warn};

/// Resolve subgraph records into pools. Records whose tokens are not in the
/// token list, or whose fee tier is unsupported, are skipped.
pub fn resolve_subgraph_pools(
    subgraph_pools: &[SubgraphPool],
    tokens: &TokenProvider,
    chain_id: ChainId,
) -> Vec<Pool> {
    subgraph_pools
        .iter()
        .filter_map(|sp| {
            if !sp.total_value_locked_eth.is_finite() {
                warn!(pool = %sp, tvl = sp.total_value_locked_eth, "skipping pool with non-finite liquidity");
                return None;
            }
            let token0 = tokens.get_token_if_exists(chain_id, &sp.token0.symbol)?;
            let token1 = tokens.get_token_if_exists(chain_id, &sp.token1.symbol)?;
            let fee = match parse_fee_amount(&sp.fee_tier) {
                Ok(fee) => fee,
                Err(err) => {
                    warn!(pool = %sp, error = %err, "skipping subgraph pool");
                    return None;
                }
            };
            let price = sp
                .token1_price
                .as_deref()
                .and_then(|p| raw_price(p, &token0, &token1));
            Some(Pool::new(token0, token1, fee, sp.total_value_locked_eth, price))
        })
        .collect()
}

/// Human token1-per-token0 price to raw units.
fn raw_price(human: &str, token0: &Token, token1: &Token) -> Option<Fraction> {
    let price = parse_decimal(human).ok()?;
    let scale = BigRational::new(
        num_traits::pow(BigInt::from(10u8), token1.decimals as usize),
        num_traits::pow(BigInt::from(10u8), token0.decimals as usize),
    );
    Some(price * scale)
}

fn connects(pool: &Pool, a: &Token, b: &Token) -> bool {
    pool.involves_token(a) && pool.involves_token(b)
}

fn top_by_liquidity<'a>(pools: impl Iterator<Item = &'a Pool>, top_n: usize) -> Vec<&'a Pool> {
    let mut ranked: Vec<&Pool> = pools.collect();
    ranked.sort_by(|a, b| b.liquidity.total_cmp(&a.liquidity));
    ranked.truncate(top_n);
    ranked
}

fn names(pools: &[&Pool]) -> Vec<String> {
    pools.iter().map(|p| p.to_string()).collect()
}

/// Bounded candidate set: the direct pool, the WETH pool on the relevant
/// side, then the deepest pools overall, touching `token_in` and touching
/// `token_out`, deduplicated by key in that order.
pub fn select_candidate_pools(
    pools: &[Pool],
    weth: &Token,
    token_in: &Token,
    token_out: &Token,
    route_type: RouteType,
    top_n: usize,
) -> Vec<Pool> {
    let direct = pools.iter().find(|p| connects(p, token_in, token_out));
    let weth_side = match route_type {
        RouteType::ExactIn => token_out,
        RouteType::ExactOut => token_in,
    };
    let weth_pool = pools.iter().find(|p| connects(p, weth, weth_side));

    let top = top_by_liquidity(pools.iter(), top_n);
    let top_in = top_by_liquidity(pools.iter().filter(|p| p.involves_token(token_in)), top_n);
    let top_out = top_by_liquidity(pools.iter().filter(|p| p.involves_token(token_out)), top_n);

    debug!(
        top_n = top_n,
        direct = ?direct.map(Pool::to_string),
        weth_pool = ?weth_pool.map(Pool::to_string),
        top_by_liquidity = ?names(&top),
        top_using_token_in = ?names(&top_in),
        top_using_token_out = ?names(&top_out),
        "pools for consideration"
    );

    let mut seen = HashSet::new();
    let candidates: Vec<Pool> = direct
        .into_iter()
        .chain(weth_pool)
        .chain(top)
        .chain(top_in)
        .chain(top_out)
        .filter(|p| seen.insert(p.key().clone()))
        .cloned()
        .collect();
    trace!(candidates = candidates.len(), "candidate pools selected");
    candidates
}

/// Resolve the universe and select candidates for one request.
pub fn get_candidate_pools(
    subgraph_pools: &[SubgraphPool],
    tokens: &TokenProvider,
    chain_id: ChainId,
    token_in: &Token,
    token_out: &Token,
    route_type: RouteType,
    top_n: usize,
) -> Vec<Pool> {
    let resolved = resolve_subgraph_pools(subgraph_pools, tokens, chain_id);
    let weth = tokens.wrapped_native(chain_id);
    select_candidate_pools(&resolved, &weth, token_in, token_out, route_type, top_n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amounts::fraction;
    use crate::router::routes::tests::{pool, token};
    use crate::tokens::tests::sample_list;
    use crate::venues::pool::FeeAmount;
    use crate::venues::subgraph::SubgraphToken;

    fn subgraph_pool(id: &str, a: &str, b: &str, fee: &str, tvl: f64) -> SubgraphPool {
        SubgraphPool {
            id: id.to_string(),
            token0: SubgraphToken { id: format!("{a}-id"), symbol: a.to_string() },
            token1: SubgraphToken { id: format!("{b}-id"), symbol: b.to_string() },
            fee_tier: fee.to_string(),
            liquidity: "1".to_string(),
            total_value_locked_eth: tvl,
            token1_price: None,
        }
    }

    #[test]
    fn test_resolve_skips_unknown_tokens_and_fees() {
        let tokens = TokenProvider::from_token_list(sample_list()).unwrap();
        let universe = vec![
            subgraph_pool("0x1", "USDC", "WETH", "3000", 10.0),
            subgraph_pool("0x2", "USDC", "UNI", "3000", 10.0),
            subgraph_pool("0x3", "DAI", "WETH", "2500", 10.0),
            subgraph_pool("0x4", "DAI", "ETH", "500", 10.0),
        ];
        let pools = resolve_subgraph_pools(&universe, &tokens, ChainId::Mainnet);
        assert_eq!(pools.len(), 2);
        assert_eq!(pools[1].fee, FeeAmount::Low);
    }

    #[test]
    fn test_resolve_skips_non_finite_liquidity() {
        let tokens = TokenProvider::from_token_list(sample_list()).unwrap();
        let universe = vec![
            subgraph_pool("0x1", "USDC", "WETH", "3000", f64::NAN),
            subgraph_pool("0x2", "DAI", "WETH", "3000", f64::INFINITY),
            subgraph_pool("0x3", "USDC", "DAI", "500", 4.0),
        ];
        let pools = resolve_subgraph_pools(&universe, &tokens, ChainId::Mainnet);
        assert_eq!(pools.len(), 1);
        assert_eq!(pools[0].liquidity, 4.0);
    }

    #[test]
    fn test_raw_price_scales_by_decimals() {
        let tokens = TokenProvider::from_token_list(sample_list()).unwrap();
        let usdc = tokens.get_token(ChainId::Mainnet, "USDC").unwrap();
        let weth = tokens.get_token(ChainId::Mainnet, "WETH").unwrap();
        // 1 USDC buys 0.0005 WETH: 1e6 raw USDC buys 5e14 raw WETH.
        let price = raw_price("0.0005", &usdc, &weth).unwrap();
        assert_eq!(price, fraction(500_000_000, 1));
    }

    #[test]
    fn test_direct_and_weth_pools_always_included() {
        let (a, b, weth) = (token(1, "A"), token(2, "B"), token(3, "WETH"));
        let fillers: Vec<Pool> = (10..30)
            .map(|n| pool(&token(n, "X"), &token(n + 100, "Y"), FeeAmount::Medium, 1_000.0 + n as f64))
            .collect();
        let direct = pool(&a, &b, FeeAmount::High, 0.1);
        let weth_out = pool(&weth, &b, FeeAmount::Low, 0.2);
        let mut universe = fillers;
        universe.push(direct.clone());
        universe.push(weth_out.clone());

        let selected = select_candidate_pools(&universe, &weth, &a, &b, RouteType::ExactIn, 2);
        assert_eq!(selected[0], direct);
        assert_eq!(selected[1], weth_out);
        // two overall, plus the same pools again touching a and b (deduplicated)
        assert_eq!(selected.len(), 4);
    }

    #[test]
    fn test_exact_out_uses_weth_pool_on_input_side() {
        let (a, b, weth) = (token(1, "A"), token(2, "B"), token(3, "WETH"));
        let weth_in = pool(&weth, &a, FeeAmount::Low, 0.2);
        let weth_out = pool(&weth, &b, FeeAmount::Low, 0.3);
        let universe = vec![weth_out, weth_in.clone()];
        let selected = select_candidate_pools(&universe, &weth, &a, &b, RouteType::ExactOut, 0);
        assert_eq!(selected, vec![weth_in]);
    }

    #[test]
    fn test_top_lists_rank_by_liquidity_and_dedupe() {
        let (a, b, c) = (token(1, "A"), token(2, "B"), token(3, "C"));
        let weth = token(4, "WETH");
        let shallow_ac = pool(&a, &c, FeeAmount::Low, 1.0);
        let deep_ac = pool(&a, &c, FeeAmount::Medium, 9.0);
        let mid_cb = pool(&c, &b, FeeAmount::Medium, 5.0);
        let universe = vec![shallow_ac.clone(), deep_ac.clone(), mid_cb.clone()];

        let selected = select_candidate_pools(&universe, &weth, &a, &b, RouteType::ExactIn, 1);
        assert_eq!(selected, vec![deep_ac, mid_cb]);
        let keys: HashSet<_> = selected.iter().map(|p| p.key().clone()).collect();
        assert_eq!(keys.len(), selected.len());
    }
}
