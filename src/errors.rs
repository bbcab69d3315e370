// Error types and error handling module
// This file defines the router's error taxonomy. "No route found" is not an
// error: the router returns Ok(None) for it.
//
// Numan Thabit 2025 Nov

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("provider error: {0}")]
    Provider(String),
    #[error("retrieval error: {0}")]
    Retrieval(String),
    #[error("token {symbol} not found in token list for chain {chain_id}")]
    UnknownToken { chain_id: u64, symbol: String },
    #[error("invalid token list: {0}")]
    InvalidTokenList(String),
    #[error("fee amount {0} not supported")]
    UnsupportedFee(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid route: {0}")]
    InvalidRoute(String),
    #[error("distribution percent {0} must be between 1 and 100 and divide 100")]
    InvalidDistribution(u32),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

impl RouterError {
    /// Errors caused by the caller's request rather than a collaborator.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RouterError::UnknownToken { .. }
                | RouterError::InvalidAmount(_)
                | RouterError::UnsupportedFee(_)
        )
    }
}

pub type Result<T, E = RouterError> = std::result::Result<T, E>;
