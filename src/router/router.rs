// Default swap router
// This file sequences one route computation: candidate pools, path search,
// bucket quotes, valuation and the split search
//
// Numan Thabit 2025 Nov

use crate::amounts::CurrencyAmount;
use crate::chains::ChainId;
use crate::config::RoutingConfig;
use crate::errors::{Result, RouterError};
use crate::gas::model::GasModelFactory;
use crate::gas::price::GasPriceProvider;
use crate::metrics::ROUTE_OUTCOMES;
use crate::router::candidates::get_candidate_pools;
use crate::router::distribution::get_amount_distribution;
use crate::router::paths::compute_all_routes;
use crate::router::routes::{RouteType, SwapRoutes};
use crate::router::split::{check_max_splits, get_best_swap_route};
use crate::router::valuation::to_valid_quotes_by_bucket;
use crate::tokens::{Token, TokenProvider};
use crate::venues::quoter::QuoteProvider;
use crate::venues::subgraph::SubgraphProvider;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Computes split routes between two tokens. `Ok(None)` means no route exists.
#[async_trait]
pub trait SwapRouter: Send + Sync {
    async fn route(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount: &CurrencyAmount,
        route_type: RouteType,
    ) -> Result<Option<SwapRoutes>>;

    async fn route_exact_in(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount_in: &CurrencyAmount,
    ) -> Result<Option<SwapRoutes>>;

    async fn route_exact_out(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount_out: &CurrencyAmount,
    ) -> Result<Option<SwapRoutes>>;
}

pub struct DefaultRouterParams {
    pub chain_id: ChainId,
    pub subgraph_provider: Arc<dyn SubgraphProvider>,
    pub quote_provider: Arc<dyn QuoteProvider>,
    pub token_provider: Arc<TokenProvider>,
    pub gas_price_provider: Arc<dyn GasPriceProvider>,
    pub gas_model_factory: Arc<dyn GasModelFactory>,
    pub routing: RoutingConfig,
}

pub struct DefaultRouter {
    chain_id: ChainId,
    subgraph_provider: Arc<dyn SubgraphProvider>,
    quote_provider: Arc<dyn QuoteProvider>,
    token_provider: Arc<TokenProvider>,
    gas_price_provider: Arc<dyn GasPriceProvider>,
    gas_model_factory: Arc<dyn GasModelFactory>,
    routing: RoutingConfig,
}

impl DefaultRouter {
    pub fn new(params: DefaultRouterParams) -> Self {
        Self {
            chain_id: params.chain_id,
            subgraph_provider: params.subgraph_provider,
            quote_provider: params.quote_provider,
            token_provider: params.token_provider,
            gas_price_provider: params.gas_price_provider,
            gas_model_factory: params.gas_model_factory,
            routing: params.routing,
        }
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    fn check_request(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount: &CurrencyAmount,
        expected: &Token,
    ) -> Result<()> {
        if token_in == token_out {
            return Err(RouterError::InvalidAmount(format!(
                "cannot route {token_in} to itself"
            )));
        }
        if &amount.token != expected {
            return Err(RouterError::InvalidAmount(format!(
                "amount is in {}, expected {expected}",
                amount.token
            )));
        }
        if amount.is_zero() || amount.less_than(&CurrencyAmount::zero(expected.clone())) {
            return Err(RouterError::InvalidAmount("amount must be positive".into()));
        }
        Ok(())
    }

    async fn compute_exact_in(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount_in: &CurrencyAmount,
    ) -> Result<Option<SwapRoutes>> {
        self.check_request(token_in, token_out, amount_in, token_in)?;
        check_max_splits(self.routing.max_splits)?;
        let (percents, amounts) = get_amount_distribution(amount_in, self.routing.distribution_percent)?;

        let universe = self.subgraph_provider.get_pools().await?;
        let pools = get_candidate_pools(
            &universe,
            &self.token_provider,
            self.chain_id,
            token_in,
            token_out,
            RouteType::ExactIn,
            self.routing.top_n,
        );

        let gas_price = self.gas_price_provider.get_gas_price().await?;
        let gas_model = self.gas_model_factory.build_gas_model(
            self.chain_id,
            &gas_price.gas_price_wei,
            &self.token_provider,
            &pools,
            token_out,
        )?;

        let routes = compute_all_routes(token_in, token_out, &pools, self.routing.max_hops);
        if routes.is_empty() {
            info!(candidates = pools.len(), "no routes between tokens");
            return Ok(None);
        }

        let route_with_quotes = self
            .quote_provider
            .get_quotes_many_exact_in(&amounts, &routes)
            .await?;
        debug!(routes = route_with_quotes.len(), buckets = percents.len(), "received quotes");

        let by_bucket = to_valid_quotes_by_bucket(
            &percents,
            route_with_quotes,
            token_out,
            RouteType::ExactIn,
            gas_model.as_ref(),
        );
        get_best_swap_route(RouteType::ExactIn, &by_bucket, &percents, self.routing.max_splits)
    }
}

fn record_outcome(result: &Result<Option<SwapRoutes>>) {
    let outcome = match result {
        Ok(Some(_)) => "found",
        Ok(None) => "no_route",
        Err(err) => {
            warn!(error = %err, "route computation failed");
            "error"
        }
    };
    ROUTE_OUTCOMES.with_label_values(&[outcome]).inc();
}

#[async_trait]
impl SwapRouter for DefaultRouter {
    #[tracing::instrument(
        name = "route",
        skip_all,
        fields(token_in = %token_in, token_out = %token_out, route_type = %route_type)
    )]
    async fn route(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount: &CurrencyAmount,
        route_type: RouteType,
    ) -> Result<Option<SwapRoutes>> {
        match route_type {
            RouteType::ExactIn => self.route_exact_in(token_in, token_out, amount).await,
            RouteType::ExactOut => self.route_exact_out(token_in, token_out, amount).await,
        }
    }

    async fn route_exact_in(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount_in: &CurrencyAmount,
    ) -> Result<Option<SwapRoutes>> {
        let result = self.compute_exact_in(token_in, token_out, amount_in).await;
        record_outcome(&result);
        result
    }

    async fn route_exact_out(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount_out: &CurrencyAmount,
    ) -> Result<Option<SwapRoutes>> {
        let result = self
            .check_request(token_in, token_out, amount_out, token_out)
            .and(Err(RouterError::NotImplemented("exact output routing".into())));
        record_outcome(&result);
        result
    }
}
