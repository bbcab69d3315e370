// Batched quote provider
// This file fetches per-route, per-bucket quotes from an on-chain quoter
// service over JSON-RPC, batching and retrying upstream calls
//
// Numan Thabit 2025 Nov

use crate::amounts::CurrencyAmount;
use crate::errors::{Result, RouterError};
use crate::router::routes::{Route, RouteType};
use crate::transport::jsonrpc::{JsonRpc, RpcError};
use async_trait::async_trait;
use backoff::{future::retry, ExponentialBackoff};
use futures::stream::{self, StreamExt, TryStreamExt};
use num_bigint::BigInt;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_QUOTE_BATCH_SIZE: usize = 50;
pub const DEFAULT_QUOTE_CONCURRENCY: usize = 4;

const QUOTE_EXACT_INPUT: &str = "quoter_quoteExactInput";
const QUOTE_EXACT_OUTPUT: &str = "quoter_quoteExactOutput";

/// Quote for one bucket on one route. Any field may be absent when the
/// quoter could not price the bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct AmountQuote {
    pub amount: CurrencyAmount,
    pub quote: Option<BigInt>,
    pub sqrt_price_x96_after_list: Option<Vec<BigInt>>,
    pub initialized_ticks_crossed_list: Option<Vec<u32>>,
    pub gas_estimate: Option<BigInt>,
}

impl AmountQuote {
    pub fn absent(amount: CurrencyAmount) -> Self {
        Self {
            amount,
            quote: None,
            sqrt_price_x96_after_list: None,
            initialized_ticks_crossed_list: None,
            gas_estimate: None,
        }
    }
}

/// A route with one quote slot per requested amount, in request order.
pub type RouteWithQuotes = (Route, Vec<AmountQuote>);

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn get_quotes_many_exact_in(
        &self,
        amounts: &[CurrencyAmount],
        routes: &[Route],
    ) -> Result<Vec<RouteWithQuotes>>;

    async fn get_quotes_many_exact_out(
        &self,
        amounts: &[CurrencyAmount],
        routes: &[Route],
    ) -> Result<Vec<RouteWithQuotes>>;
}

/// Packed path: `token | fee (3 bytes) | token ...`, hex with `0x`.
/// Exact-out paths are encoded from the output token backwards.
pub fn encode_route_to_path(route: &Route, route_type: RouteType) -> Result<String> {
    let mut tokens: Vec<_> = route.token_path.iter().collect();
    let mut fees: Vec<u32> = route.pools.iter().map(|p| p.fee.pips()).collect();
    if route_type == RouteType::ExactOut {
        tokens.reverse();
        fees.reverse();
    }

    let mut packed = Vec::with_capacity(20 + fees.len() * 23);
    packed.extend_from_slice(&tokens[0].address_bytes()?);
    for (fee, token) in fees.iter().zip(tokens.iter().skip(1)) {
        packed.extend_from_slice(&fee.to_be_bytes()[1..]);
        packed.extend_from_slice(&token.address_bytes()?);
    }
    Ok(format!("0x{}", hex::encode(packed)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResult {
    amount: String,
    sqrt_price_x96_after_list: Vec<String>,
    initialized_ticks_crossed_list: Vec<u32>,
    gas_estimate: String,
}

fn parse_uint(value: &str) -> Option<BigInt> {
    match value.strip_prefix("0x") {
        Some(hex) => BigInt::parse_bytes(hex.as_bytes(), 16),
        None => BigInt::parse_bytes(value.as_bytes(), 10),
    }
}

/// Turn one call result into a quote. Errors and malformed results become
/// an absent quote.
fn decode_quote(amount: &CurrencyAmount, result: Result<Value, RpcError>) -> AmountQuote {
    let value = match result {
        Ok(value) => value,
        Err(err) => {
            debug!(amount = %amount, code = err.code, message = %err.message, "quoter call reverted");
            return AmountQuote::absent(amount.clone());
        }
    };
    let Ok(parsed) = serde_json::from_value::<QuoteResult>(value) else {
        debug!(amount = %amount, "malformed quoter result");
        return AmountQuote::absent(amount.clone());
    };

    let sqrt_prices: Option<Vec<BigInt>> = parsed
        .sqrt_price_x96_after_list
        .iter()
        .map(|s| parse_uint(s))
        .collect();
    AmountQuote {
        amount: amount.clone(),
        quote: parse_uint(&parsed.amount),
        sqrt_price_x96_after_list: sqrt_prices,
        initialized_ticks_crossed_list: Some(parsed.initialized_ticks_crossed_list),
        gas_estimate: parse_uint(&parsed.gas_estimate),
    }
}

pub struct JsonRpcQuoteProvider {
    rpc: Arc<JsonRpc>,
    batch_size: usize,
    concurrency: usize,
}

impl JsonRpcQuoteProvider {
    pub fn new(rpc: Arc<JsonRpc>) -> Self {
        Self {
            rpc,
            batch_size: DEFAULT_QUOTE_BATCH_SIZE,
            concurrency: DEFAULT_QUOTE_CONCURRENCY,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    async fn batch_with_retry(
        &self,
        method: &'static str,
        params: &[Value],
    ) -> Result<Vec<Result<Value, RpcError>>> {
        let backoff = ExponentialBackoff {
            initial_interval: Duration::from_millis(100),
            max_interval: Duration::from_secs(2),
            max_elapsed_time: Some(Duration::from_secs(10)),
            multiplier: 2.0,
            ..Default::default()
        };

        retry(backoff, || async move {
            self.rpc
                .batch(method, params)
                .await
                .map_err(backoff::Error::transient)
        })
        .await
        .map_err(|e| {
            warn!(method = method, calls = params.len(), error = %e, "quote batch failed after retries");
            e
        })
    }

    async fn get_quotes(
        &self,
        amounts: &[CurrencyAmount],
        routes: &[Route],
        route_type: RouteType,
    ) -> Result<Vec<RouteWithQuotes>> {
        let method = match route_type {
            RouteType::ExactIn => QUOTE_EXACT_INPUT,
            RouteType::ExactOut => QUOTE_EXACT_OUTPUT,
        };

        let mut params = Vec::with_capacity(routes.len() * amounts.len());
        for route in routes {
            let path = encode_route_to_path(route, route_type)?;
            for amount in amounts {
                params.push(json!([path, amount.quotient().to_string()]));
            }
        }

        let batches: Vec<_> = params
            .chunks(self.batch_size)
            .map(|chunk| self.batch_with_retry(method, chunk))
            .collect();
        let chunks: Vec<Vec<Result<Value, RpcError>>> = stream::iter(batches)
            .buffered(self.concurrency)
            .try_collect()
            .await?;
        let mut results = chunks.into_iter().flatten();

        debug!(
            routes = routes.len(),
            amounts = amounts.len(),
            calls = params.len(),
            "fetched quotes"
        );

        let mut out = Vec::with_capacity(routes.len());
        for route in routes {
            let mut quotes = Vec::with_capacity(amounts.len());
            for amount in amounts {
                let result = results.next().ok_or_else(|| {
                    RouterError::Provider("quoter returned fewer results than requested".into())
                })?;
                quotes.push(decode_quote(amount, result));
            }
            out.push((route.clone(), quotes));
        }
        Ok(out)
    }
}

#[async_trait]
impl QuoteProvider for JsonRpcQuoteProvider {
    async fn get_quotes_many_exact_in(
        &self,
        amounts: &[CurrencyAmount],
        routes: &[Route],
    ) -> Result<Vec<RouteWithQuotes>> {
        self.get_quotes(amounts, routes, RouteType::ExactIn).await
    }

    async fn get_quotes_many_exact_out(
        &self,
        amounts: &[CurrencyAmount],
        routes: &[Route],
    ) -> Result<Vec<RouteWithQuotes>> {
        self.get_quotes(amounts, routes, RouteType::ExactOut).await
    }
}
