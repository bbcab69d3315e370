// Router HTTP API implementation
// This file provides HTTP endpoints for quoting split routes and exposing
// health and metrics
//
// Numan Thabit 2025 Nov

use crate::amounts::{parse_amount, CurrencyAmount};
use crate::chains::ChainId;
use crate::errors::RouterError;
use crate::metrics;
use crate::router::router::SwapRouter;
use crate::router::routes::{route_to_string, RouteType, SwapRoute};
use crate::tokens::TokenProvider;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state behind the HTTP handlers.
pub struct ApiState {
    pub router: Arc<dyn SwapRouter>,
    pub tokens: Arc<TokenProvider>,
    pub chain_id: ChainId,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub token_in: String,
    pub token_out: String,
    /// Human-readable amount, e.g. "1.5"
    pub amount: String,
    #[serde(default)]
    pub exact_out: bool,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub route_type: String,
    pub raw: SwapRouteResponse,
    pub gas_adjusted: SwapRouteResponse,
}

#[derive(Debug, Serialize)]
pub struct SwapRouteResponse {
    pub quote: String,
    pub quote_gas_adjusted: String,
    pub routes: Vec<RouteAmountResponse>,
}

#[derive(Debug, Serialize)]
pub struct RouteAmountResponse {
    pub route: String,
    pub percentage: u32,
    pub amount_in: String,
    pub quote: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: RouterError) -> ApiError {
    let status = match &err {
        e if e.is_input_error() => StatusCode::BAD_REQUEST,
        RouterError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
        RouterError::Transport(_) | RouterError::Provider(_) | RouterError::Retrieval(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn human(amount: &CurrencyAmount) -> String {
    amount.to_fixed(amount.token.decimals as u32)
}

fn to_response(route: &SwapRoute) -> SwapRouteResponse {
    SwapRouteResponse {
        quote: human(&route.quote),
        quote_gas_adjusted: human(&route.quote_gas_adjusted),
        routes: route
            .route_amounts
            .iter()
            .map(|ra| RouteAmountResponse {
                route: route_to_string(&ra.route),
                percentage: ra.percentage,
                amount_in: human(&ra.input),
                quote: human(&ra.amount),
            })
            .collect(),
    }
}

/// Create the HTTP router with API endpoints
pub fn create_api_router(state: Arc<ApiState>) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/api/v1/quote", post(quote_route))
        .route("/metrics", get(metrics_text))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn metrics_text() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::render(),
    )
}

/// Quote endpoint - computes both the raw and gas-adjusted best splits
async fn quote_route(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let token_in = state
        .tokens
        .get_token(state.chain_id, &req.token_in)
        .map_err(error_response)?;
    let token_out = state
        .tokens
        .get_token(state.chain_id, &req.token_out)
        .map_err(error_response)?;

    let (route_type, amount_token) = if req.exact_out {
        (RouteType::ExactOut, &token_out)
    } else {
        (RouteType::ExactIn, &token_in)
    };
    let amount = parse_amount(&req.amount, amount_token).map_err(error_response)?;

    let routes = state
        .router
        .route(&token_in, &token_out, &amount, route_type)
        .await
        .map_err(error_response)?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "no route found".to_string(),
                }),
            )
        })?;

    Ok(Json(QuoteResponse {
        route_type: route_type.to_string(),
        raw: to_response(&routes.raw),
        gas_adjusted: to_response(&routes.gas_adjusted),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Result;
    use crate::router::routes::{Route, RouteAmount, SwapRoutes};
    use crate::tokens::tests::sample_list;
    use crate::tokens::Token;
    use crate::venues::pool::{FeeAmount, Pool};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    enum Canned {
        Found,
        Nothing,
        NotImplemented,
        Upstream,
    }

    struct CannedRouter(Canned);

    fn single_leg(token_in: &Token, token_out: &Token, amount: &CurrencyAmount) -> SwapRoute {
        let pool = Pool::new(token_in.clone(), token_out.clone(), FeeAmount::Low, 1.0, None);
        let route = Route::new(vec![pool], token_in.clone(), token_out.clone()).unwrap();
        let out = CurrencyAmount::from_raw(token_out.clone(), 2_500_000u64);
        SwapRoute {
            quote: out.clone(),
            quote_gas_adjusted: out.clone(),
            route_amounts: vec![RouteAmount {
                route,
                input: amount.clone(),
                amount: out,
                percentage: 100,
            }],
        }
    }

    #[async_trait]
    impl SwapRouter for CannedRouter {
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
            match self.0 {
                Canned::Found => {
                    let leg = single_leg(token_in, token_out, amount_in);
                    Ok(Some(SwapRoutes {
                        raw: leg.clone(),
                        gas_adjusted: leg,
                    }))
                }
                Canned::Nothing => Ok(None),
                Canned::NotImplemented => Err(RouterError::NotImplemented("test".into())),
                Canned::Upstream => Err(RouterError::Retrieval("subgraph down".into())),
            }
        }

        async fn route_exact_out(
            &self,
            _token_in: &Token,
            _token_out: &Token,
            _amount_out: &CurrencyAmount,
        ) -> Result<Option<SwapRoutes>> {
            Err(RouterError::NotImplemented("exact output routing".into()))
        }
    }

    fn app(canned: Canned) -> AxumRouter {
        create_api_router(Arc::new(ApiState {
            router: Arc::new(CannedRouter(canned)),
            tokens: Arc::new(TokenProvider::from_token_list(sample_list()).unwrap()),
            chain_id: ChainId::Mainnet,
        }))
    }

    fn quote_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/quote")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Canned::Nothing)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_quote_returns_both_splits() {
        let response = app(Canned::Found)
            .oneshot(quote_request(serde_json::json!({
                "token_in": "ETH",
                "token_out": "USDC",
                "amount": "1.5"
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["route_type"], "exact_in");
        assert_eq!(body["raw"]["quote"], "2.500000");
        assert_eq!(body["raw"]["routes"][0]["percentage"], 100);
        assert_eq!(body["raw"]["routes"][0]["route"], "WETH -- 0.05% --> USDC");
        assert_eq!(body["gas_adjusted"]["routes"][0]["amount_in"], "1.500000000000000000");
    }

    #[tokio::test]
    async fn test_no_route_is_404() {
        let response = app(Canned::Nothing)
            .oneshot(quote_request(serde_json::json!({
                "token_in": "WETH",
                "token_out": "DAI",
                "amount": "1"
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "no route found");
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let unknown = app(Canned::Found)
            .oneshot(quote_request(serde_json::json!({
                "token_in": "UNI",
                "token_out": "DAI",
                "amount": "1"
            })))
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

        let too_precise = app(Canned::Found)
            .oneshot(quote_request(serde_json::json!({
                "token_in": "USDC",
                "token_out": "DAI",
                "amount": "1.0000001"
            })))
            .await
            .unwrap();
        assert_eq!(too_precise.status(), StatusCode::BAD_REQUEST);

        let exact_out = app(Canned::Found)
            .oneshot(quote_request(serde_json::json!({
                "token_in": "USDC",
                "token_out": "DAI",
                "amount": "1",
                "exact_out": true
            })))
            .await
            .unwrap();
        assert_eq!(exact_out.status(), StatusCode::NOT_IMPLEMENTED);

        let upstream = app(Canned::Upstream)
            .oneshot(quote_request(serde_json::json!({
                "token_in": "USDC",
                "token_out": "DAI",
                "amount": "1"
            })))
            .await
            .unwrap();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let not_impl = app(Canned::NotImplemented)
            .oneshot(quote_request(serde_json::json!({
                "token_in": "USDC",
                "token_out": "DAI",
                "amount": "1"
            })))
            .await
            .unwrap();
        assert_eq!(not_impl.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_metrics_endpoint_serves_text() {
        crate::metrics::ROUTE_OUTCOMES.with_label_values(&["found"]).inc();
        let response = app(Canned::Nothing)
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("sor_route_outcomes_total"));
    }
}
