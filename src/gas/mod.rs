// Execution cost layer
// This file groups the gas price oracle and the gas models that price a
// route's execution cost in the quote token
//
// Numan Thabit 2025 Nov

pub mod heuristic;
pub mod model;
pub mod price;

pub use heuristic::HeuristicGasModelFactory;
pub use model::{GasModel, GasModelFactory};
pub use price::{GasPrice, GasPriceProvider, JsonRpcGasPriceProvider};
