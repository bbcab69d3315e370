// Configuration management module
// This file handles loading and validating configuration settings from
// environment variables (prefix SOR, nested keys separated by "__")
//
// Numan Thabit 2025 Nov

use crate::chains::ChainId;
use crate::errors::RouterError;
use crate::router::factory::RouterId;
use crate::venues::quoter::{DEFAULT_QUOTE_BATCH_SIZE, DEFAULT_QUOTE_CONCURRENCY};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Chain to route on, e.g. 1 for mainnet
    pub chain_id: ChainId,
    /// JSON-RPC node endpoint used for gas price lookups
    pub jsonrpc_endpoint: Url,
    /// JSON-RPC quoter service endpoint
    pub quoter_endpoint: Url,
    /// Uniswap-v3-style subgraph endpoint
    pub subgraph_endpoint: Url,
    /// Token list: http(s) URI or a local .json/.yaml path
    pub token_list: String,
    #[serde(default = "default_api_addr")]
    pub api_addr: SocketAddr,
    #[serde(default)]
    pub router: RouterId,
    /// Quoter calls per JSON-RPC batch
    #[serde(default = "default_quote_batch_size")]
    pub quote_batch_size: usize,
    /// Quoter batches in flight at once
    #[serde(default = "default_quote_concurrency")]
    pub quote_concurrency: usize,
    #[serde(default)]
    pub routing: RoutingConfig,
}

fn default_api_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_quote_batch_size() -> usize {
    DEFAULT_QUOTE_BATCH_SIZE
}

fn default_quote_concurrency() -> usize {
    DEFAULT_QUOTE_CONCURRENCY
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("SOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let app: AppConfig = cfg.try_deserialize()?;
        app.routing.validate().context("validate routing configuration")?;
        Ok(app)
    }
}

/// Search parameters for one route computation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Pools kept from each liquidity ranking
    pub top_n: usize,
    /// Longest route, in pools
    pub max_hops: usize,
    /// Most routes in one split
    pub max_splits: usize,
    /// Bucket granularity, in percent
    pub distribution_percent: u32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            max_hops: 3,
            max_splits: 3,
            distribution_percent: 5,
        }
    }
}

impl RoutingConfig {
    /// Structural checks only; a split count above what the optimizer
    /// supports is rejected by the optimizer itself.
    pub fn validate(&self) -> Result<(), RouterError> {
        let p = self.distribution_percent;
        if p == 0 || p > 100 || 100 % p != 0 {
            return Err(RouterError::InvalidDistribution(p));
        }
        if self.max_hops == 0 {
            return Err(RouterError::InvalidConfig("max_hops must be at least 1".into()));
        }
        if self.max_splits == 0 {
            return Err(RouterError::InvalidConfig("max_splits must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_defaults_are_valid() {
        let routing = RoutingConfig::default();
        assert_eq!(routing.top_n, 10);
        assert_eq!(routing.distribution_percent, 5);
        routing.validate().unwrap();
    }

    #[test]
    fn test_routing_validation() {
        let bad_percent = RoutingConfig { distribution_percent: 30, ..Default::default() };
        assert!(matches!(bad_percent.validate(), Err(RouterError::InvalidDistribution(30))));

        let no_hops = RoutingConfig { max_hops: 0, ..Default::default() };
        assert!(matches!(no_hops.validate(), Err(RouterError::InvalidConfig(_))));

        let wide = RoutingConfig { max_splits: 4, ..Default::default() };
        assert!(wide.validate().is_ok());
    }

    #[test]
    fn test_app_config_deserializes_with_defaults() {
        let cfg = config::Config::builder()
            .set_override("chain_id", 1)
            .unwrap()
            .set_override("jsonrpc_endpoint", "http://localhost:8545")
            .unwrap()
            .set_override("quoter_endpoint", "http://localhost:9000")
            .unwrap()
            .set_override("subgraph_endpoint", "http://localhost:8000/subgraphs/name/v3")
            .unwrap()
            .set_override("token_list", "tokens.json")
            .unwrap()
            .set_override("routing.top_n", 4)
            .unwrap()
            .build()
            .unwrap();
        let app: AppConfig = cfg.try_deserialize().unwrap();
        assert_eq!(app.chain_id, ChainId::Mainnet);
        assert_eq!(app.api_addr, default_api_addr());
        assert_eq!(app.router, RouterId::Default);
        assert_eq!(app.quote_batch_size, 50);
        assert_eq!(app.routing.top_n, 4);
        assert_eq!(app.routing.max_hops, 3);
    }
}
