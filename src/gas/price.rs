// Gas price oracle
// This file reads the current network gas price over JSON-RPC
//
// Numan Thabit 2025 Nov

use crate::errors::{Result, RouterError};
use crate::transport::jsonrpc::JsonRpc;
use async_trait::async_trait;
use num_bigint::BigInt;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasPrice {
    pub gas_price_wei: BigInt,
}

#[async_trait]
pub trait GasPriceProvider: Send + Sync {
    async fn get_gas_price(&self) -> Result<GasPrice>;
}

pub struct JsonRpcGasPriceProvider {
    rpc: Arc<JsonRpc>,
}

impl JsonRpcGasPriceProvider {
    pub fn new(rpc: Arc<JsonRpc>) -> Self {
        Self { rpc }
    }
}

fn parse_quantity(quantity: &str) -> Result<BigInt> {
    let hex = quantity
        .strip_prefix("0x")
        .ok_or_else(|| RouterError::Provider(format!("gas price {quantity:?} is not a hex quantity")))?;
    BigInt::parse_bytes(hex.as_bytes(), 16)
        .ok_or_else(|| RouterError::Provider(format!("gas price {quantity:?} is not a hex quantity")))
}

#[async_trait]
impl GasPriceProvider for JsonRpcGasPriceProvider {
    async fn get_gas_price(&self) -> Result<GasPrice> {
        let quantity: String = self
            .rpc
            .call("eth_gasPrice", json!([]))
            .await
            .inspect_err(|e| warn!(endpoint = %self.rpc.endpoint(), error = %e, "gas price lookup failed"))?;
        let gas_price_wei = parse_quantity(&quantity)?;
        debug!(gas_price_wei = %gas_price_wei, "fetched gas price");
        Ok(GasPrice { gas_price_wei })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x3b9aca00").unwrap(), BigInt::from(1_000_000_000u64));
        assert_eq!(parse_quantity("0x0").unwrap(), BigInt::from(0));
        assert!(parse_quantity("1000").is_err());
        assert!(parse_quantity("0xzz").is_err());
    }
}
