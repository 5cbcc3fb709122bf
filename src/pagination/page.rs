//! Decomposition of one response into a page of a connection.

use serde_json::Value;

use crate::clients::graphql::{GraphqlResult, QueryCost};

/// One page of a connection read from `data[resource]`.
///
/// Both connection shapes are accepted:
///
/// ```graphql
/// products(first: $first, after: $after) {
///   edges { node { id title } }
///   pageInfo { hasNextPage endCursor }
/// }
/// products(first: $first, after: $after) {
///   nodes { id title }
///   pageInfo { hasNextPage endCursor }
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PageResult {
    /// The page's records in server order.
    pub items: Vec<Value>,
    /// Entries in the `edges`/`nodes` array, including any `null` nodes.
    pub received: usize,
    /// `pageInfo.hasNextPage`, `false` when absent.
    pub has_next_page: bool,
    /// `pageInfo.endCursor`, when present.
    pub end_cursor: Option<String>,
    /// Cost telemetry of the response.
    pub cost: Option<QueryCost>,
}

impl PageResult {
    /// Reads the page for `resource` out of a successful call.
    ///
    /// Returns `None` when `data[resource]` is absent or `null`, or when it
    /// has neither an `edges` nor a `nodes` array. Callers treat that as the
    /// end of the resource, not as a failure.
    #[must_use]
    pub fn from_result(result: GraphqlResult, resource: &str) -> Option<Self> {
        let GraphqlResult { mut data, cost, .. } = result;

        let connection = data.get_mut(resource)?.as_object_mut()?;

        let (items, received) = match (connection.remove("edges"), connection.remove("nodes")) {
            (Some(Value::Array(edges)), _) => {
                let received = edges.len();
                let items = edges
                    .into_iter()
                    .filter_map(|mut edge| edge.get_mut("node").map(Value::take))
                    .filter(|node| !node.is_null())
                    .collect();
                (items, received)
            }
            (_, Some(Value::Array(nodes))) => {
                let received = nodes.len();
                let items = nodes.into_iter().filter(|node| !node.is_null()).collect();
                (items, received)
            }
            _ => return None,
        };

        let page_info = connection.get("pageInfo");
        let has_next_page = page_info
            .and_then(|info| info.get("hasNextPage"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let end_cursor = page_info
            .and_then(|info| info.get("endCursor"))
            .and_then(Value::as_str)
            .map(ToString::to_string);

        Some(Self {
            items,
            received,
            has_next_page,
            end_cursor,
            cost,
        })
    }
}
