// Route types and swap route results
// This file defines paths through pools, the trade direction and the split
// results the optimizer hands back to callers
//
// Numan Thabit 2025 Nov

use crate::amounts::CurrencyAmount;
use crate::errors::{Result, RouterError};
use crate::tokens::Token;
use crate::venues::pool::{Pool, PoolKey};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Trade direction: fixed input amount or fixed output amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteType {
    ExactIn,
    ExactOut,
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteType::ExactIn => f.write_str("exact_in"),
            RouteType::ExactOut => f.write_str("exact_out"),
        }
    }
}

/// An ordered chain of pools from `input` to `output`. `token_path` lists the
/// token entering each hop followed by the final output token.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub pools: Vec<Pool>,
    pub input: Token,
    pub output: Token,
    pub token_path: Vec<Token>,
}

impl Route {
    /// Build a route, checking that pools connect `input` to `output` and none repeats.
    pub fn new(pools: Vec<Pool>, input: Token, output: Token) -> Result<Self> {
        if pools.is_empty() {
            return Err(RouterError::InvalidRoute("route must contain at least one pool".into()));
        }

        let mut seen = HashSet::new();
        let mut token_path = vec![input.clone()];
        let mut current = input.clone();
        for pool in &pools {
            if !seen.insert(pool.key().clone()) {
                return Err(RouterError::InvalidRoute(format!("pool {pool} repeats in route")));
            }
            let next = pool.other_token(&current).ok_or_else(|| {
                RouterError::InvalidRoute(format!("pool {pool} does not hold {current}"))
            })?;
            current = next.clone();
            token_path.push(current.clone());
        }
        if current != output {
            return Err(RouterError::InvalidRoute(format!(
                "route ends at {current}, expected {output}"
            )));
        }

        Ok(Self {
            pools,
            input,
            output,
            token_path,
        })
    }

    /// Route from already-walked parts; callers guarantee connectivity.
    pub(crate) fn from_parts(pools: Vec<Pool>, token_path: Vec<Token>, output: Token) -> Self {
        let input = token_path[0].clone();
        Self {
            pools,
            input,
            output,
            token_path,
        }
    }

    pub fn hops(&self) -> usize {
        self.pools.len()
    }

    pub fn pool_keys(&self) -> impl Iterator<Item = &PoolKey> {
        self.pools.iter().map(Pool::key)
    }

    pub fn uses_any_pool(&self, keys: &HashSet<PoolKey>) -> bool {
        self.pool_keys().any(|key| keys.contains(key))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&route_to_string(self))
    }
}

/// Human-readable route, e.g. `WETH -- 0.3% --> USDC -- 0.05% --> DAI`.
pub fn route_to_string(route: &Route) -> String {
    let mut out = route.token_path[0].symbol.clone();
    for (pool, token) in route.pools.iter().zip(route.token_path.iter().skip(1)) {
        out.push_str(&format!(" -- {} --> {}", pool.fee, token.symbol));
    }
    out
}

/// One leg of a split: a route, its share of the total and what it returns.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteAmount {
    pub route: Route,
    /// Bucket amount sent through this route.
    pub input: CurrencyAmount,
    /// Raw quote for the bucket, in the quote token.
    pub amount: CurrencyAmount,
    pub percentage: u32,
}

/// Best split under one objective.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapRoute {
    pub quote: CurrencyAmount,
    pub quote_gas_adjusted: CurrencyAmount,
    /// Legs sorted by percentage, largest first.
    pub route_amounts: Vec<RouteAmount>,
}

impl SwapRoute {
    pub fn total_percentage(&self) -> u32 {
        self.route_amounts.iter().map(|ra| ra.percentage).sum()
    }
}

/// Best splits under the raw and the gas-adjusted objective.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapRoutes {
    pub raw: SwapRoute,
    pub gas_adjusted: SwapRoute,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::chains::ChainId;
    use crate::venues::pool::FeeAmount;

    pub(crate) fn token(n: u8, symbol: &str) -> Token {
        Token::new(ChainId::Mainnet, &format!("0x{:040x}", n), 18, symbol, None)
    }

    pub(crate) fn pool(a: &Token, b: &Token, fee: FeeAmount, liquidity: f64) -> Pool {
        Pool::new(a.clone(), b.clone(), fee, liquidity, None)
    }

    #[test]
    fn test_route_walks_token_path() {
        let (a, b, c) = (token(1, "A"), token(2, "B"), token(3, "C"));
        let route = Route::new(
            vec![pool(&a, &c, FeeAmount::Medium, 1.0), pool(&c, &b, FeeAmount::Low, 1.0)],
            a.clone(),
            b.clone(),
        )
        .unwrap();
        assert_eq!(route.token_path, vec![a, c, b]);
        assert_eq!(route.hops(), 2);
        assert_eq!(route_to_string(&route), "A -- 0.3% --> C -- 0.05% --> B");
    }

    #[test]
    fn test_route_rejects_disconnected_and_repeated_pools() {
        let (a, b, c) = (token(1, "A"), token(2, "B"), token(3, "C"));
        let ab = pool(&a, &b, FeeAmount::Medium, 1.0);
        assert!(Route::new(vec![pool(&c, &b, FeeAmount::Medium, 1.0)], a.clone(), b.clone()).is_err());
        assert!(Route::new(vec![ab.clone(), ab.clone(), ab.clone()], a.clone(), b.clone()).is_err());
        assert!(Route::new(vec![], a.clone(), b.clone()).is_err());
        assert!(Route::new(vec![ab], a, c).is_err());
    }
}
