//! Dispatcher-level error types.
//!
//! These cover everything that can go wrong before a response envelope
//! exists: the network call itself, a non-2xx status, or a body that is not
//! JSON. GraphQL-level errors (top-level `errors`, nested `userErrors`) are
//! returned inside a successful envelope and handled by the operation layer.

use thiserror::Error;

/// Error type for a single dispatch attempt.
///
/// # Example
///
/// ```rust
/// use shopify_admin_tools::DispatchError;
///
/// let error = DispatchError::Status {
///     code: 401,
///     body: r#"{"errors":"Invalid API key or access token"}"#.to_string(),
/// };
/// assert!(error.to_string().contains("401"));
/// ```
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Network-level failure: DNS resolution, connection refused, or the
    /// 30-second timeout expiring.
    #[error("network error sending GraphQL request: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx HTTP status.
    #[error("GraphQL endpoint returned HTTP {code}: {body}")]
    Status {
        /// The HTTP status code.
        code: u16,
        /// The raw response body, for diagnosis.
        body: String,
    },

    /// The response body was not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl DispatchError {
    /// Returns `true` if this error originated at the transport level
    /// (network failure or non-2xx status) rather than from decoding.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message_includes_code_and_body() {
        let error = DispatchError::Status {
            code: 403,
            body: r#"{"errors":"forbidden"}"#.to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("403"));
        assert!(message.contains("forbidden"));
    }

    #[test]
    fn test_decode_error_wraps_serde_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error = DispatchError::Decode(serde_err);
        assert!(error.to_string().contains("not valid JSON"));
        assert!(!error.is_transport());
    }

    #[test]
    fn test_status_is_transport() {
        let error = DispatchError::Status {
            code: 500,
            body: String::new(),
        };
        assert!(error.is_transport());
    }

    #[test]
    fn test_error_implements_std_error() {
        let error: &dyn std::error::Error = &DispatchError::Status {
            code: 400,
            body: String::new(),
        };
        let _ = error;
    }
}
