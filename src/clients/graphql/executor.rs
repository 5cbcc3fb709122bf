//! Single-call GraphQL execution and outcome classification.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::clients::graphql::cost::QueryCost;
use crate::clients::graphql::errors::{
    AuthenticationError, GraphqlApiError, GraphqlError, InvalidGraphqlRequestError,
    RateLimitError,
};
use crate::clients::{
    GraphqlRequest, GraphqlTransport, HttpResponse, HttpResponseError, HttpTransport,
    TransportError,
};
use crate::config::ClientConfig;

/// The successful outcome of one GraphQL call.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphqlResult {
    /// The `data` member of the response (`Null` when absent).
    pub data: Value,
    /// Cost telemetry, when the server reported it.
    pub cost: Option<QueryCost>,
    /// The raw `extensions` member, when present.
    pub extensions: Option<Value>,
}

/// Issues exactly one GraphQL POST and classifies the outcome.
///
/// The executor owns no mutable state; one instance can serve any number of
/// concurrent pagination sessions.
///
/// | Outcome                                  | Result                          |
/// |------------------------------------------|---------------------------------|
/// | 2xx, no `errors`                         | `Ok(GraphqlResult)`             |
/// | 2xx, `errors` with a `THROTTLED` code    | [`GraphqlError::RateLimited`]   |
/// | 2xx, any other non-empty `errors`        | [`GraphqlError::Api`]           |
/// | 429                                      | [`GraphqlError::RateLimited`]   |
/// | 401, 403                                 | [`GraphqlError::Authentication`]|
/// | anything else                            | [`GraphqlError::Transport`]     |
///
/// # Example
///
/// ```rust,ignore
/// use shopify_paginator::clients::graphql::RequestExecutor;
/// use serde_json::Map;
///
/// let executor = RequestExecutor::from_config(&config);
/// let result = executor.execute("query { shop { name } }", Map::new()).await?;
/// println!("{}", result.data["shop"]["name"]);
/// ```
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn GraphqlTransport>,
    throttled_errors_are_rate_limits: bool,
}

// Verify RequestExecutor is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RequestExecutor>();
};

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field(
                "throttled_errors_are_rate_limits",
                &self.throttled_errors_are_rate_limits,
            )
            .finish_non_exhaustive()
    }
}

impl RequestExecutor {
    /// Creates an executor over an injected transport.
    #[must_use]
    pub fn new(transport: Arc<dyn GraphqlTransport>) -> Self {
        Self {
            transport,
            throttled_errors_are_rate_limits: true,
        }
    }

    /// Creates an executor that owns `transport`.
    #[must_use]
    pub fn from_transport<T: GraphqlTransport + 'static>(transport: T) -> Self {
        Self::new(Arc::new(transport))
    }

    /// Creates an executor over an [`HttpTransport`] built from `config`.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::from_transport(HttpTransport::new(config))
    }

    /// Controls whether HTTP 200 responses whose errors carry
    /// `extensions.code == "THROTTLED"` are reported as rate limits.
    ///
    /// Enabled by default. When disabled they surface as
    /// [`GraphqlError::Api`].
    #[must_use]
    pub const fn throttled_errors_are_rate_limits(mut self, enabled: bool) -> Self {
        self.throttled_errors_are_rate_limits = enabled;
        self
    }

    /// Executes `query` with `variables`.
    ///
    /// # Errors
    ///
    /// Returns the [`GraphqlError`] variant matching the outcome table above.
    /// An empty query fails with [`GraphqlError::InvalidRequest`] before any
    /// network call.
    pub async fn execute(
        &self,
        query: &str,
        variables: Map<String, Value>,
    ) -> Result<GraphqlResult, GraphqlError> {
        if query.trim().is_empty() {
            return Err(InvalidGraphqlRequestError::EmptyQuery.into());
        }

        let request = GraphqlRequest::new(query, variables);
        let response = self.transport.post_graphql(&request).await?;

        if !response.is_ok() {
            return Err(Self::classify_failure(&response));
        }

        if let Some(errors) = collect_errors(&response.body) {
            return Err(self.classify_errors(&response, &errors));
        }

        let HttpResponse { mut body, .. } = response;
        let data = body
            .as_object_mut()
            .and_then(|object| object.remove("data"))
            .unwrap_or(Value::Null);
        let extensions = body
            .as_object_mut()
            .and_then(|object| object.remove("extensions"));
        let cost = extensions.as_ref().and_then(QueryCost::from_extensions);

        if let Some(cost) = &cost {
            tracing::debug!(
                requested_query_cost = ?cost.requested_query_cost,
                actual_query_cost = ?cost.actual_query_cost,
                currently_available = cost.throttle_status.currently_available,
                maximum_available = cost.throttle_status.maximum_available,
                restore_rate = cost.throttle_status.restore_rate,
                "GraphQL query cost"
            );
        }

        Ok(GraphqlResult {
            data,
            cost,
            extensions,
        })
    }

    fn classify_failure(response: &HttpResponse) -> GraphqlError {
        let code = response.code;
        let message = serialize_error(response);
        let error_reference = response.request_id().map(String::from);

        match code {
            429 => {
                tracing::warn!(code, retry_after = ?response.retry_request_after, "GraphQL request rate limited");
                RateLimitError {
                    code,
                    message,
                    retry_after: response.retry_request_after,
                    error_reference,
                }
                .into()
            }
            401 | 403 => AuthenticationError {
                code,
                message,
                error_reference,
            }
            .into(),
            _ => TransportError::from(HttpResponseError {
                code,
                message,
                error_reference,
            })
            .into(),
        }
    }

    fn classify_errors(&self, response: &HttpResponse, errors: &[Value]) -> GraphqlError {
        let api_error = GraphqlApiError::from_errors(errors);

        if self.throttled_errors_are_rate_limits && errors.iter().any(is_throttled) {
            tracing::warn!(code = response.code, "GraphQL query throttled");
            return RateLimitError {
                code: response.code,
                message: api_error.message,
                retry_after: response.retry_request_after,
                error_reference: response.request_id().map(String::from),
            }
            .into();
        }

        api_error.into()
    }
}

/// Returns the response's GraphQL errors when there is at least one.
fn collect_errors(body: &Value) -> Option<Vec<Value>> {
    match body.get("errors")? {
        Value::Array(errors) if !errors.is_empty() => Some(errors.clone()),
        Value::String(message) if !message.is_empty() => Some(vec![json!({ "message": message })]),
        Value::Object(error) => Some(vec![Value::Object(error.clone())]),
        _ => None,
    }
}

fn is_throttled(error: &Value) -> bool {
    error
        .pointer("/extensions/code")
        .and_then(Value::as_str)
        .is_some_and(|code| code.eq_ignore_ascii_case("THROTTLED"))
}

/// Summarizes a failed response as compact JSON.
fn serialize_error(response: &HttpResponse) -> String {
    let mut error_body = Map::new();

    for key in ["errors", "error", "error_description", "raw_body"] {
        if let Some(value) = response.body.get(key) {
            error_body.insert(key.to_string(), value.clone());
        }
    }

    if let Some(request_id) = response.request_id() {
        error_body.insert(
            "error_reference".to_string(),
            json!(format!(
                "If you report this error, please include this id: {request_id}."
            )),
        );
    }

    Value::Object(error_body).to_string()
}
