// Venue universe provider
// This file retrieves pool metadata (tokens, fee tier, TVL) from a
// Uniswap-v3-style subgraph; the router narrows it down per request
//
// Numan Thabit 2025 Nov

use crate::errors::{Result, RouterError};
use crate::transport::graphql::GraphQLRpc;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::{debug, info};

const POOLS_QUERY: &str = r#"
    query Pools($pageSize: Int!, $lastId: String!) {
        pools(first: $pageSize, where: { id_gt: $lastId }, orderBy: id, orderDirection: asc) {
            id
            token0 { id symbol }
            token1 { id symbol }
            feeTier
            liquidity
            totalValueLockedETH
            token1Price
        }
    }
"#;

const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgraphToken {
    pub id: String,
    pub symbol: String,
}

/// Pool metadata as reported by the subgraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubgraphPool {
    pub id: String,
    pub token0: SubgraphToken,
    pub token1: SubgraphToken,
    pub fee_tier: String,
    pub liquidity: String,
    #[serde(rename = "totalValueLockedETH", deserialize_with = "f64_from_str_or_number")]
    pub total_value_locked_eth: f64,
    /// token1 per token0, human units.
    #[serde(default)]
    pub token1_price: Option<String>,
}

impl fmt::Display for SubgraphPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.token0.symbol, self.token1.symbol, self.fee_tier
        )
    }
}

fn f64_from_str_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(f64),
    }
    let value = match Raw::deserialize(deserializer)? {
        Raw::Num(n) => n,
        Raw::Str(s) => s.parse().map_err(serde::de::Error::custom)?,
    };
    if !value.is_finite() {
        return Err(serde::de::Error::custom(format!("non-finite value {value}")));
    }
    Ok(value)
}

/// Source of the full venue universe.
#[async_trait]
pub trait SubgraphProvider: Send + Sync {
    async fn get_pools(&self) -> Result<Vec<SubgraphPool>>;
}

/// Pages through a subgraph over GraphQL, ordered by pool id.
pub struct GraphQLSubgraphProvider {
    rpc: GraphQLRpc,
    page_size: usize,
}

#[derive(Debug, Deserialize)]
struct PoolsPage {
    pools: Vec<SubgraphPool>,
}

impl GraphQLSubgraphProvider {
    pub fn new(rpc: GraphQLRpc) -> Self {
        Self {
            rpc,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

#[async_trait]
impl SubgraphProvider for GraphQLSubgraphProvider {
    async fn get_pools(&self) -> Result<Vec<SubgraphPool>> {
        let mut pools = Vec::new();
        let mut last_id = String::new();

        loop {
            let variables = serde_json::json!({
                "pageSize": self.page_size,
                "lastId": last_id,
            });
            let page: PoolsPage = self
                .rpc
                .execute_query(POOLS_QUERY, variables, "Pools")
                .await
                .map_err(|e| match e {
                    RouterError::Retrieval(msg) => RouterError::Retrieval(msg),
                    other => RouterError::Retrieval(format!("subgraph pools: {other}")),
                })?;

            let fetched = page.pools.len();
            debug!(fetched = fetched, total = pools.len() + fetched, "fetched subgraph page");
            if let Some(last) = page.pools.last() {
                last_id = last.id.clone();
            }
            pools.extend(page.pools);
            if fetched < self.page_size {
                break;
            }
        }

        info!(
            pools = pools.len(),
            endpoint = %self.rpc.endpoint(),
            "retrieved venue universe from subgraph"
        );
        Ok(pools)
    }
}

/// Fixed universe, for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticSubgraphProvider {
    pools: Vec<SubgraphPool>,
}

impl StaticSubgraphProvider {
    pub fn new(pools: Vec<SubgraphPool>) -> Self {
        Self { pools }
    }
}

#[async_trait]
impl SubgraphProvider for StaticSubgraphProvider {
    async fn get_pools(&self) -> Result<Vec<SubgraphPool>> {
        Ok(self.pools.clone())
    }
}
