//! The outbound seam between the executor and the network.
//!
//! [`RequestExecutor`](crate::clients::graphql::RequestExecutor) never talks to
//! the network directly. It hands a [`GraphqlRequest`] to whatever
//! [`GraphqlTransport`] it was constructed with, which keeps endpoint
//! resolution and credentials out of the pagination logic and lets tests
//! substitute scripted responses.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::clients::errors::TransportError;
use crate::clients::http_response::HttpResponse;

/// The JSON body of one GraphQL POST: `{ "query": ..., "variables": ... }`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphqlRequest {
    /// The GraphQL document.
    pub query: String,
    /// Variables for the document.
    pub variables: Map<String, Value>,
}

impl GraphqlRequest {
    /// Creates a request from a document and its variables.
    #[must_use]
    pub fn new(query: impl Into<String>, variables: Map<String, Value>) -> Self {
        Self {
            query: query.into(),
            variables,
        }
    }

    /// Returns a variable by name.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}

/// Sends a single GraphQL request and returns the raw HTTP response.
///
/// Implementations return `Ok` for every response the server produced,
/// whatever its status; status classification is the executor's job.
/// `Err` is reserved for requests that never yielded a response.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    /// Posts `request` to the GraphQL endpoint.
    async fn post_graphql(&self, request: &GraphqlRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_to_wire_shape() {
        let mut variables = Map::new();
        variables.insert("first".to_string(), json!(50));
        variables.insert("after".to_string(), Value::Null);

        let request = GraphqlRequest::new("query { shop { name } }", variables);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body,
            json!({
                "query": "query { shop { name } }",
                "variables": { "first": 50, "after": null }
            })
        );
        assert_eq!(request.variable("first"), Some(&json!(50)));
        assert!(request.variable("missing").is_none());
    }
}
