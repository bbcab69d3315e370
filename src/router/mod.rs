// Router module - split-route search and the HTTP surface around it
// This file wires candidate selection, path search, valuation and the
// split optimizer into the routers the factory hands out
//
// Numan Thabit 2025 Nov

pub mod api;
pub mod candidates;
pub mod distribution;
pub mod factory;
pub mod paths;
pub mod routes;
pub mod split;
pub mod valuation;

#[allow(clippy::module_inception)]
pub mod router;

pub use api::{create_api_router, ApiState};
pub use factory::{build_router, router_factory, RouterId};
pub use router::{DefaultRouter, DefaultRouterParams, SwapRouter};
pub use routes::{Route, RouteAmount, RouteType, SwapRoute, SwapRoutes};
pub use valuation::RouteWithValidQuote;
