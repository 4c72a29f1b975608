//! Single-request GraphQL dispatch against the Admin API.

use std::time::Duration;

use serde_json::Value;

use crate::client::envelope::ResponseEnvelope;
use crate::client::errors::DispatchError;
use crate::config::AdminConfig;

/// Fixed per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Dispatches GraphQL queries and mutations to a store's Admin API.
///
/// One instance per configured store. Each [`dispatch`](Self::dispatch) call
/// issues exactly one HTTPS POST to
/// `https://<store-domain>/admin/api/<version>/graphql.json` with the
/// access-token header attached. There is no retry and no backoff; callers
/// that want retries must re-invoke explicitly.
///
/// # Thread Safety
///
/// `GraphqlDispatcher` is `Send + Sync` and cheap to share behind an `Arc`;
/// it holds no mutable state.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_admin_tools::{AccessToken, AdminConfig, GraphqlDispatcher, ShopDomain};
/// use serde_json::json;
///
/// let config = AdminConfig::builder()
///     .store_domain(ShopDomain::new("my-store").unwrap())
///     .access_token(AccessToken::new("shpat_example").unwrap())
///     .build()
///     .unwrap();
///
/// let dispatcher = GraphqlDispatcher::new(&config);
/// let envelope = dispatcher
///     .dispatch(
///         "query GetProduct($id: ID!) { product(id: $id) { title } }",
///         Some(json!({ "id": "gid://shopify/Product/123" })),
///     )
///     .await?;
/// ```
#[derive(Debug)]
pub struct GraphqlDispatcher {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Fully resolved endpoint URL.
    endpoint: String,
    /// Access token sent as `X-Shopify-Access-Token`.
    access_token: String,
}

// Verify GraphqlDispatcher is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlDispatcher>();
};

impl GraphqlDispatcher {
    /// Creates a new dispatcher for the given configuration.
    ///
    /// The endpoint URL is resolved once here from the store domain and API
    /// version (or the host override, when configured).
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        let base = config.host().map_or_else(
            || format!("https://{}", config.store_domain().as_ref()),
            |host| host.as_ref().to_string(),
        );
        let endpoint = format!("{base}/admin/api/{}/graphql.json", config.api_version());

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint,
            access_token: config.access_token().as_ref().to_string(),
        }
    }

    /// Returns the resolved endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Executes one GraphQL request and returns the parsed envelope.
    ///
    /// The body contains `query` always and `variables` only when provided.
    /// An omitted mapping is not sent as `null`, since the Admin API treats
    /// explicit nulls differently from absent fields for several mutations.
    ///
    /// The envelope is returned uninterpreted: a 200 response whose body
    /// carries top-level `errors` is still `Ok`, because some operations
    /// tolerate partial errors. Interpreting `errors` and `userErrors` is
    /// the caller's responsibility.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::Network`]: DNS failure, connection refused, or
    ///   the 30-second timeout expiring.
    /// - [`DispatchError::Status`]: non-2xx HTTP status, with the status
    ///   code and raw body.
    /// - [`DispatchError::Decode`]: a 2xx body that is not valid JSON.
    pub async fn dispatch(
        &self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<ResponseEnvelope, DispatchError> {
        let mut payload = serde_json::Map::new();
        payload.insert("query".to_string(), Value::String(query.to_string()));
        if let Some(variables) = variables {
            payload.insert("variables".to_string(), variables);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("X-Shopify-Access-Token", &self.access_token)
            .json(&Value::Object(payload))
            .send()
            .await?;

        let code = response.status().as_u16();
        let body = response.text().await?;

        if !(200..300).contains(&code) {
            return Err(DispatchError::Status { code, body });
        }

        let envelope = serde_json::from_str(&body)?;
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccessToken, ApiVersion, HostUrl, ShopDomain};

    fn test_config() -> AdminConfig {
        AdminConfig::builder()
            .store_domain(ShopDomain::new("test-shop").unwrap())
            .access_token(AccessToken::new("test-token").unwrap())
            .api_version(ApiVersion::V2025_10)
            .build()
            .unwrap()
    }

    #[test]
    fn test_endpoint_construction_from_domain_and_version() {
        let dispatcher = GraphqlDispatcher::new(&test_config());
        assert_eq!(
            dispatcher.endpoint(),
            "https://test-shop.myshopify.com/admin/api/2025-10/graphql.json"
        );
    }

    #[test]
    fn test_endpoint_uses_host_override_when_configured() {
        let config = AdminConfig::builder()
            .store_domain(ShopDomain::new("test-shop").unwrap())
            .access_token(AccessToken::new("test-token").unwrap())
            .api_version(ApiVersion::V2025_10)
            .host(HostUrl::new("http://127.0.0.1:9999").unwrap())
            .build()
            .unwrap();

        let dispatcher = GraphqlDispatcher::new(&config);
        assert_eq!(
            dispatcher.endpoint(),
            "http://127.0.0.1:9999/admin/api/2025-10/graphql.json"
        );
    }

    #[test]
    fn test_dispatcher_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GraphqlDispatcher>();
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_network_error() {
        // Nothing listens on this port; the call must fail at the transport
        // level, not panic or hang.
        let config = AdminConfig::builder()
            .store_domain(ShopDomain::new("test-shop").unwrap())
            .access_token(AccessToken::new("test-token").unwrap())
            .host(HostUrl::new("http://127.0.0.1:1").unwrap())
            .build()
            .unwrap();

        let dispatcher = GraphqlDispatcher::new(&config);
        let result = dispatcher.dispatch("query { shop { name } }", None).await;
        assert!(matches!(result, Err(DispatchError::Network(_))));
    }
}
