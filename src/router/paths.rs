// Path enumeration
// This file finds every simple path through the candidate pools from the
// input token to the output token, up to a hop limit
//
// Numan Thabit 2025 Nov

use crate::router::routes::{route_to_string, Route};
use crate::tokens::Token;
use crate::venues::pool::Pool;
use tracing::debug;

struct Search<'a> {
    pools: &'a [Pool],
    token_out: &'a Token,
    max_hops: usize,
    used: Vec<bool>,
    current: Vec<usize>,
    token_path: Vec<Token>,
    routes: Vec<Route>,
}

impl Search<'_> {
    fn walk(&mut self) {
        if let Some(&last) = self.current.last() {
            if self.pools[last].involves_token(self.token_out) {
                let pools = self.current.iter().map(|&i| self.pools[i].clone()).collect();
                self.routes.push(Route::from_parts(
                    pools,
                    self.token_path.clone(),
                    self.token_out.clone(),
                ));
                return;
            }
        }
        if self.current.len() >= self.max_hops {
            return;
        }

        let Some(frontier) = self.token_path.last().cloned() else {
            return;
        };
        for i in 0..self.pools.len() {
            if self.used[i] {
                continue;
            }
            let Some(next) = self.pools[i].other_token(&frontier) else {
                continue;
            };
            let next = next.clone();

            self.used[i] = true;
            self.current.push(i);
            self.token_path.push(next);
            self.walk();
            self.token_path.pop();
            self.current.pop();
            self.used[i] = false;
        }
    }
}

/// Depth-first enumeration of routes from `token_in` to `token_out` using
/// each pool at most once per route. Output order follows `pools` order.
pub fn compute_all_routes(
    token_in: &Token,
    token_out: &Token,
    pools: &[Pool],
    max_hops: usize,
) -> Vec<Route> {
    let mut search = Search {
        pools,
        token_out,
        max_hops,
        used: vec![false; pools.len()],
        current: Vec::with_capacity(max_hops),
        token_path: vec![token_in.clone()],
        routes: Vec::new(),
    };
    search.walk();

    let routes = search.routes;
    debug!(
        routes = ?routes.iter().map(route_to_string).collect::<Vec<_>>(),
        "computed {} possible routes",
        routes.len()
    );
    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::routes::tests::{pool, token};
    use crate::venues::pool::FeeAmount;
    use std::collections::HashSet;

    #[test]
    fn test_finds_direct_and_multi_hop_routes() {
        let (a, b, c) = (token(1, "A"), token(2, "B"), token(3, "C"));
        let pools = vec![
            pool(&a, &b, FeeAmount::Medium, 1.0),
            pool(&a, &c, FeeAmount::Medium, 1.0),
            pool(&c, &b, FeeAmount::Medium, 1.0),
            pool(&a, &b, FeeAmount::Low, 1.0),
        ];
        let routes = compute_all_routes(&a, &b, &pools, 3);
        let rendered: Vec<String> = routes.iter().map(route_to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "A -- 0.3% --> B",
                "A -- 0.3% --> C -- 0.3% --> B",
                "A -- 0.05% --> B",
            ]
        );
        for route in &routes {
            assert_eq!(route.input, a);
            assert_eq!(route.output, b);
        }
    }

    #[test]
    fn test_no_pool_repeats_and_hop_limit_holds() {
        let tokens: Vec<Token> = (1..=5).map(|n| token(n, &format!("T{n}"))).collect();
        let mut pools = Vec::new();
        for i in 0..tokens.len() {
            for j in (i + 1)..tokens.len() {
                pools.push(pool(&tokens[i], &tokens[j], FeeAmount::Medium, 1.0));
                pools.push(pool(&tokens[i], &tokens[j], FeeAmount::High, 1.0));
            }
        }

        for max_hops in 1..=3 {
            let routes = compute_all_routes(&tokens[0], &tokens[4], &pools, max_hops);
            assert!(!routes.is_empty());
            for route in &routes {
                assert!(route.hops() <= max_hops);
                let keys: HashSet<_> = route.pool_keys().collect();
                assert_eq!(keys.len(), route.hops());
                // every enumerated route passes full validation
                Route::new(route.pools.clone(), route.input.clone(), route.output.clone()).unwrap();
            }
        }
    }

    #[test]
    fn test_four_hop_chain_is_out_of_reach_at_three() {
        let t: Vec<Token> = (1..=5).map(|n| token(n, &format!("T{n}"))).collect();
        let pools: Vec<Pool> = t
            .windows(2)
            .map(|w| pool(&w[0], &w[1], FeeAmount::Medium, 1.0))
            .collect();
        assert!(compute_all_routes(&t[0], &t[4], &pools, 3).is_empty());
        assert_eq!(compute_all_routes(&t[0], &t[4], &pools, 4).len(), 1);
    }

    #[test]
    fn test_enumeration_is_deterministic() {
        let (a, b, c, d) = (token(1, "A"), token(2, "B"), token(3, "C"), token(4, "D"));
        let pools = vec![
            pool(&a, &c, FeeAmount::Medium, 1.0),
            pool(&c, &d, FeeAmount::Medium, 1.0),
            pool(&d, &b, FeeAmount::Medium, 1.0),
            pool(&c, &b, FeeAmount::Low, 1.0),
            pool(&a, &d, FeeAmount::High, 1.0),
        ];
        let first = compute_all_routes(&a, &b, &pools, 3);
        let second = compute_all_routes(&a, &b, &pools, 3);
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }
}
