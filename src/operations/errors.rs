//! The uniform failure taxonomy shared by every domain operation.
//!
//! Each operation converts its failures into one [`OperationError`] value;
//! failures never propagate as panics past an operation's boundary, and no
//! error is retried automatically. Retry policy, if desired, belongs to the
//! caller.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::client::DispatchError;

/// Error type returned by every domain operation.
///
/// The variants distinguish where in the request/response cycle the call
/// failed:
///
/// - [`Dispatch`](Self::Dispatch): transport failure or undecodable body,
///   before any envelope existed.
/// - [`Request`](Self::Request): the query/mutation was rejected before
///   execution (top-level GraphQL `errors`: bad syntax, auth failure,
///   permission denial). Carries every message, not just the first.
/// - [`MalformedResponse`](Self::MalformedResponse): the envelope parsed
///   but lacked the expected data key or shape; carries the raw JSON for
///   diagnosis.
/// - [`Validation`](Self::Validation): a write was rejected by business
///   rules (non-empty `userErrors`); carries every field/message pair.
/// - [`NotFound`](Self::NotFound): a lookup for a specific resource
///   returned `null`, or the menu flow found no menu to fetch.
#[derive(Debug, Error)]
pub enum OperationError {
    /// Transport or decode failure from the dispatcher.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Top-level GraphQL errors: the request was rejected before execution.
    #[error("GraphQL request rejected: {}", messages.join("; "))]
    Request {
        /// All top-level error messages, in response order.
        messages: Vec<String>,
    },

    /// The response parsed but the expected data was missing or misshapen.
    #[error("malformed response while reading '{context}': {raw}")]
    MalformedResponse {
        /// What the operation was trying to extract (e.g. `data.products`).
        context: String,
        /// The raw JSON that did not match, for diagnosis.
        raw: Value,
    },

    /// Business-rule rejection of a write (non-empty `userErrors`).
    #[error("validation failed: {}", format_user_errors(errors))]
    Validation {
        /// Every `{field, message}` pair, never truncated.
        errors: Vec<UserError>,
    },

    /// A nullable lookup returned nothing.
    #[error("{what}")]
    NotFound {
        /// Human-readable description of what was missing.
        what: String,
    },
}

impl OperationError {
    pub(crate) fn malformed(context: impl Into<String>, raw: Value) -> Self {
        Self::MalformedResponse {
            context: context.into(),
            raw,
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single business-rule rejection from a mutation's `userErrors` array.
///
/// The `field` path is absent when the mutation's selection set only asked
/// for `message`, or when the error is not tied to a specific input field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserError {
    /// Path to the input field the error applies to, if any.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    /// The rejection message.
    pub message: String,
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) if !field.is_empty() => {
                write!(f, "{}: {}", field.join("."), self.message)
            }
            _ => f.write_str(&self.message),
        }
    }
}
