// GraphQL transport layer implementation
// This file implements the GraphQL client used to page through subgraph
// indexers for venue metadata
//
// Numan Thabit 2025 Nov

use crate::errors::RouterError;
use crate::metrics::{REQ_ERRORS, REQ_LATENCY};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;
use url::Url;

/// GraphQL client for querying a subgraph endpoint
#[derive(Debug, Clone)]
pub struct GraphQLRpc {
    endpoint: Url,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

impl GraphQLRpc {
    pub fn new(endpoint: Url) -> Result<Self, RouterError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| RouterError::Transport(format!("build HTTP client for GraphQL: {e}")))?;

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Execute a GraphQL query
    pub async fn execute_query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
        operation_name: &str,
    ) -> Result<T, RouterError> {
        let _timer = REQ_LATENCY
            .with_label_values(&["graphql", operation_name])
            .start_timer();

        let request_body = serde_json::json!({
            "query": query,
            "variables": variables,
            "operationName": operation_name,
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                REQ_ERRORS
                    .with_label_values(&["graphql", operation_name])
                    .inc();
                RouterError::Transport(format!("send GraphQL request: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            REQ_ERRORS
                .with_label_values(&["graphql", operation_name])
                .inc();
            return Err(RouterError::Retrieval(format!(
                "GraphQL request failed with status: {status}"
            )));
        }

        let response_body: GraphQLResponse<T> = response
            .json()
            .await
            .map_err(|e| RouterError::Retrieval(format!("parse GraphQL response JSON: {e}")))?;

        if let Some(errors) = &response_body.errors {
            REQ_ERRORS
                .with_label_values(&["graphql", operation_name])
                .inc();
            warn!(
                operation = operation_name,
                errors = ?errors,
                "GraphQL query returned errors"
            );
            return Err(RouterError::Retrieval(format!(
                "GraphQL errors: {}",
                errors
                    .iter()
                    .map(|e| e.message.clone())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        response_body
            .data
            .ok_or_else(|| RouterError::Retrieval("missing GraphQL response data".into()))
    }
}
