// Venue layer
// This file groups the pool model, the venue universe provider and the
// batched quote provider
//
// Numan Thabit 2025 Nov

pub mod pool;
pub mod quoter;
pub mod subgraph;

pub use pool::{FeeAmount, Pool, PoolKey};
pub use quoter::{AmountQuote, QuoteProvider, RouteWithQuotes};
pub use subgraph::{SubgraphPool, SubgraphProvider};
