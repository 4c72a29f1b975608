//! Domain operations over the Admin GraphQL API.
//!
//! Each operation is an independently awaitable async function that follows
//! the same contract: build a compile-time query/mutation string, assemble a
//! variables mapping from typed parameters (absent optionals are omitted,
//! never sent as `null`), dispatch once, then reduce the envelope:
//!
//! 1. top-level `errors` present → [`OperationError::Request`] carrying all
//!    messages;
//! 2. expected `data.<key>` missing → [`OperationError::MalformedResponse`]
//!    with the raw envelope;
//! 3. non-empty `userErrors` in a mutation payload →
//!    [`OperationError::Validation`] listing every field/message pair;
//! 4. otherwise, the payload is decoded into the operation's return type.
//!
//! Read operations are idempotent. Write operations are not: invoking
//! `create_*` twice creates two remote resources. The Admin API offers no
//! idempotency-key mechanism, so deduplication is left to callers.
//!
//! All failures are logged with the operation name before being returned.

pub mod articles;
pub mod blogs;
pub mod customers;
pub mod discounts;
mod errors;
pub mod inventory;
pub mod menus;
pub mod orders;
pub mod pages;
pub mod products;
pub mod store;

pub use errors::{OperationError, UserError};

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::client::ResponseEnvelope;

/// Cursor-based page metadata returned by list operations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether another page exists after this one.
    pub has_next_page: bool,
    /// Cursor to pass as `after` for the next page.
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// A money value as Shopify reports it: decimal string plus currency code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount, kept as a string to avoid precision loss.
    pub amount: String,
    /// ISO currency code (e.g. `USD`).
    pub currency_code: String,
}

/// `{ edges: [{ node, cursor? }] }` connection shape.
#[derive(Debug, Deserialize)]
pub(crate) struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge<T> {
    pub node: T,
}

/// `{ nodes: [...] }` connection shape.
#[derive(Debug, Deserialize)]
pub(crate) struct NodeList<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

impl<T> Connection<T> {
    pub(crate) fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }
}

/// Extracts `data.<key>` from an envelope, surfacing top-level errors first.
///
/// Returns the value even when it is JSON `null`; resolving null vs.
/// not-found is the individual operation's call.
pub(crate) fn payload(envelope: &ResponseEnvelope, key: &str) -> Result<Value, OperationError> {
    if let Some(errors) = &envelope.errors {
        if !errors.is_empty() {
            return Err(OperationError::Request {
                messages: errors.iter().map(|e| e.message.clone()).collect(),
            });
        }
    }

    envelope
        .data
        .as_ref()
        .and_then(|data| data.get(key))
        .cloned()
        .ok_or_else(|| {
            OperationError::malformed(
                format!("data.{key}"),
                serde_json::to_value(envelope).unwrap_or(Value::Null),
            )
        })
}

/// Fails with [`OperationError::Validation`] when the payload carries a
/// non-empty `userErrors` array, listing every entry.
pub(crate) fn check_user_errors(payload: &Value) -> Result<(), OperationError> {
    let Some(list) = payload.get("userErrors").and_then(Value::as_array) else {
        return Ok(());
    };
    if list.is_empty() {
        return Ok(());
    }

    let errors = list
        .iter()
        .map(|entry| {
            serde_json::from_value(entry.clone()).unwrap_or_else(|_| UserError {
                field: None,
                message: entry.to_string(),
            })
        })
        .collect();
    Err(OperationError::Validation { errors })
}

/// Extracts a non-null field from a mutation payload that has already
/// passed the `userErrors` check.
pub(crate) fn require_field(
    payload: &Value,
    field: &str,
    context: &str,
) -> Result<Value, OperationError> {
    payload
        .get(field)
        .cloned()
        .filter(|value| !value.is_null())
        .ok_or_else(|| OperationError::malformed(context.to_string(), payload.clone()))
}

/// Decodes a JSON value into `T`, mapping shape mismatches to
/// [`OperationError::MalformedResponse`] with the raw value attached.
pub(crate) fn decode<T: DeserializeOwned>(
    value: Value,
    context: &str,
) -> Result<T, OperationError> {
    serde_json::from_value(value.clone())
        .map_err(|_| OperationError::malformed(context.to_string(), value))
}

/// Runs an operation body, logging any failure with the operation name.
pub(crate) async fn traced<T, F>(operation: &'static str, body: F) -> Result<T, OperationError>
where
    F: Future<Output = Result<T, OperationError>>,
{
    match body.await {
        Ok(value) => Ok(value),
        Err(error) => {
            tracing::error!(operation, %error, "operation failed");
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> ResponseEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_payload_extracts_data_key() {
        let env = envelope(json!({"data": {"shop": {"name": "Test Shop"}}}));
        let value = payload(&env, "shop").unwrap();
        assert_eq!(value["name"], "Test Shop");
    }

    #[test]
    fn test_payload_surfaces_all_top_level_errors() {
        let env = envelope(json!({
            "errors": [{"message": "Field 'shoop' doesn't exist"}, {"message": "Access denied"}]
        }));
        let error = payload(&env, "shop").unwrap_err();
        match error {
            OperationError::Request { messages } => {
                assert_eq!(messages.len(), 2);
                assert_eq!(messages[0], "Field 'shoop' doesn't exist");
                assert_eq!(messages[1], "Access denied");
            }
            other => panic!("expected Request error, got {other:?}"),
        }
    }

    #[test]
    fn test_payload_missing_key_is_malformed() {
        let env = envelope(json!({"data": {"somethingElse": {}}}));
        let error = payload(&env, "shop").unwrap_err();
        assert!(matches!(error, OperationError::MalformedResponse { .. }));
        assert!(error.to_string().contains("data.shop"));
    }

    #[test]
    fn test_payload_returns_null_value_verbatim() {
        let env = envelope(json!({"data": {"blog": null}}));
        assert_eq!(payload(&env, "blog").unwrap(), Value::Null);
    }

    #[test]
    fn test_check_user_errors_enumerates_all() {
        let value = json!({
            "page": null,
            "userErrors": [
                {"field": ["handle"], "message": "taken"},
                {"field": ["title"], "message": "blank"},
                {"field": null, "message": "something else"}
            ]
        });
        let error = check_user_errors(&value).unwrap_err();
        match error {
            OperationError::Validation { errors } => {
                assert_eq!(errors.len(), 3);
                assert_eq!(errors[0].field.as_deref(), Some(&["handle".to_string()][..]));
                assert_eq!(errors[2].message, "something else");
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_check_user_errors_empty_is_ok() {
        assert!(check_user_errors(&json!({"userErrors": []})).is_ok());
        assert!(check_user_errors(&json!({"noErrorsKey": true})).is_ok());
    }

    #[test]
    fn test_decode_shape_mismatch_is_malformed() {
        #[derive(Debug, Deserialize)]
        struct Shop {
            #[allow(dead_code)]
            name: String,
        }
        let error = decode::<Shop>(json!({"wrong": 1}), "data.shop").unwrap_err();
        assert!(matches!(error, OperationError::MalformedResponse { .. }));
    }

    #[test]
    fn test_connection_into_nodes_preserves_order() {
        let connection: Connection<String> = serde_json::from_value(json!({
            "edges": [{"node": "a"}, {"node": "b"}]
        }))
        .unwrap();
        assert_eq!(connection.into_nodes(), vec!["a", "b"]);
    }
}
