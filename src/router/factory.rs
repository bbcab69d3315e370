// Router factory
// This file selects a router implementation by id and wires it to the
// JSON-RPC and GraphQL backed providers
//
// Numan Thabit 2025 Nov

use crate::config::AppConfig;
use crate::errors::{Result, RouterError};
use crate::gas::heuristic::HeuristicGasModelFactory;
use crate::gas::price::JsonRpcGasPriceProvider;
use crate::router::router::{DefaultRouter, DefaultRouterParams, SwapRouter};
use crate::tokens::TokenProvider;
use crate::transport::graphql::GraphQLRpc;
use crate::transport::jsonrpc::JsonRpc;
use crate::venues::quoter::JsonRpcQuoteProvider;
use crate::venues::subgraph::GraphQLSubgraphProvider;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum RouterId {
    #[default]
    Default,
    V3Interface,
}

impl RouterId {
    pub const ALL: [RouterId; 2] = [RouterId::Default, RouterId::V3Interface];
}

impl fmt::Display for RouterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterId::Default => f.write_str("Default"),
            RouterId::V3Interface => f.write_str("V3Interface"),
        }
    }
}

impl FromStr for RouterId {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "default" => Ok(RouterId::Default),
            "v3interface" => Ok(RouterId::V3Interface),
            _ => Err(RouterError::InvalidConfig(format!(
                "unknown router {s:?}; expected one of {}",
                RouterId::ALL.map(|id| id.to_string()).join(", ")
            ))),
        }
    }
}

impl TryFrom<String> for RouterId {
    type Error = RouterError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Build the router named by `router_id` over the given collaborators.
pub fn router_factory(router_id: RouterId, params: DefaultRouterParams) -> Result<Arc<dyn SwapRouter>> {
    params.routing.validate()?;
    match router_id {
        RouterId::Default => Ok(Arc::new(DefaultRouter::new(params))),
        RouterId::V3Interface => Err(RouterError::NotImplemented(format!(
            "implementation of router {router_id} not found"
        ))),
    }
}

/// Wire the configured router to its network-backed providers.
pub fn build_router(config: &AppConfig, tokens: Arc<TokenProvider>) -> Result<Arc<dyn SwapRouter>> {
    let node = Arc::new(JsonRpc::new(config.jsonrpc_endpoint.to_string()));
    let quoter = Arc::new(JsonRpc::new(config.quoter_endpoint.to_string()));
    let subgraph = GraphQLRpc::new(config.subgraph_endpoint.clone())?;

    let params = DefaultRouterParams {
        chain_id: config.chain_id,
        subgraph_provider: Arc::new(GraphQLSubgraphProvider::new(subgraph)),
        quote_provider: Arc::new(
            JsonRpcQuoteProvider::new(quoter)
                .with_batch_size(config.quote_batch_size)
                .with_concurrency(config.quote_concurrency),
        ),
        token_provider: tokens,
        gas_price_provider: Arc::new(JsonRpcGasPriceProvider::new(node)),
        gas_model_factory: Arc::new(HeuristicGasModelFactory::new()),
        routing: config.routing.clone(),
    };

    info!(
        router = %config.router,
        chain = %config.chain_id,
        quoter = %config.quoter_endpoint,
        subgraph = %config.subgraph_endpoint,
        "building router"
    );
    router_factory(config.router, params)
}
