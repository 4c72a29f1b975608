//! The standard GraphQL response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A parsed GraphQL response: `{ data?, errors? }`.
///
/// The dispatcher returns this without interpretation. Presence of `errors`
/// indicates a request-level failure (bad syntax, auth, permissions);
/// absence of an expected key under `data` indicates a malformed or
/// unexpected response. Both are distinct from `userErrors` arrays nested
/// inside mutation payloads, which signal business-rule rejections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// The `data` mapping, if the request produced any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Top-level GraphQL errors, if the request was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<TopLevelError>>,
}

impl ResponseEnvelope {
    /// Returns `true` if the envelope carries at least one top-level error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }
}

/// A single entry in the top-level `errors` array.
///
/// Shopify attaches locations/extensions alongside the message; only the
/// message is meaningful to callers, the rest is kept for diagnosis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopLevelError {
    /// The error message.
    pub message: String,
    /// Any additional fields Shopify attached (locations, extensions).
    #[serde(flatten)]
    pub details: Value,
}
