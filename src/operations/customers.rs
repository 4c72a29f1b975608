//! Customer operations: filtered listing, counting, lookup, and account
//! invite delivery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::GraphqlDispatcher;
use crate::operations::{
    check_user_errors, decode, payload, traced, Money, OperationError, PageInfo,
};

/// Default page size for [`list_customers`].
pub const DEFAULT_CUSTOMER_PAGE: u32 = 10;

/// Default upper bound passed to `customersCount`.
pub const DEFAULT_COUNT_LIMIT: u64 = 10_000;

const CUSTOMERS_QUERY: &str = r"
query CustomersList($first: Int, $after: String, $query: String, $sortKey: CustomerSortKeys) {
  customers(first: $first, after: $after, query: $query, sortKey: $sortKey) {
    edges {
      cursor
      node {
        id
        firstName
        lastName
        email
        createdAt
        updatedAt
        numberOfOrders
        amountSpent {
          amount
          currencyCode
        }
        tags
        defaultAddress {
          address1
          city
          province
          country
          zip
        }
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
";

const CUSTOMERS_COUNT_QUERY: &str = r"
query CustomersCount($query: String, $limit: Int) {
  customersCount(query: $query, limit: $limit) {
    count
  }
}
";

const CUSTOMER_QUERY: &str = r"
query CustomerGet($id: ID!) {
  customer(id: $id) {
    id
    firstName
    lastName
    email
    phone
    numberOfOrders
    amountSpent {
      amount
      currencyCode
    }
    createdAt
    updatedAt
    tags
    defaultAddress {
      address1
      city
      province
      zip
      country
    }
  }
}
";

const SEND_INVITE_MUTATION: &str = r"
mutation CustomerSendAccountInviteEmail($customerId: ID!) {
  customerSendAccountInviteEmail(customerId: $customerId) {
    customer {
      id
    }
    userErrors {
      field
      message
    }
  }
}
";

/// Parameters for [`list_customers`]. Absent optionals are omitted from the
/// request entirely.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListParams {
    pub first: u32,
    /// Pagination cursor from a previous page's [`PageInfo::end_cursor`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Filter in Shopify's search syntax (e.g. `email:*@example.com`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// A `CustomerSortKeys` value (e.g. `CREATED_AT`, `NAME`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
}

impl Default for CustomerListParams {
    fn default() -> Self {
        Self {
            first: DEFAULT_CUSTOMER_PAGE,
            after: None,
            query: None,
            sort_key: None,
        }
    }
}

/// A customer record as returned by [`list_customers`] and
/// [`get_customer`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Lifetime order count. Shopify reports this as a numeric string.
    pub number_of_orders: String,
    pub amount_spent: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub default_address: Option<CustomerAddress>,
}

/// Default address components of a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerAddress {
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

/// One page of customers plus the cursor metadata for fetching the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerPage {
    pub customers: Vec<Customer>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCustomerConnection {
    #[serde(default = "Vec::new")]
    edges: Vec<RawCustomerEdge>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct RawCustomerEdge {
    node: Customer,
}

#[derive(Debug, Deserialize)]
struct RawCount {
    count: u64,
}

/// Fetches one page of customers with optional filtering and sorting.
///
/// # Errors
///
/// Returns [`OperationError`] on transport failure, request rejection, or a
/// malformed response.
pub async fn list_customers(
    dispatcher: &GraphqlDispatcher,
    params: CustomerListParams,
) -> Result<CustomerPage, OperationError> {
    traced("list_customers", async move {
        let variables = serde_json::to_value(&params)
            .map_err(|_| OperationError::malformed("customer list parameters", json!(null)))?;
        let envelope = dispatcher.dispatch(CUSTOMERS_QUERY, Some(variables)).await?;
        let value = payload(&envelope, "customers")?;
        let raw: RawCustomerConnection = decode(value, "data.customers")?;
        Ok(CustomerPage {
            customers: raw.edges.into_iter().map(|edge| edge.node).collect(),
            page_info: raw.page_info,
        })
    })
    .await
}

/// Counts customers matching an optional filter, bounded by `limit`
/// (defaulting to [`DEFAULT_COUNT_LIMIT`] when `None`).
///
/// # Errors
///
/// Returns [`OperationError`] on transport failure, request rejection, or a
/// malformed response.
pub async fn count_customers(
    dispatcher: &GraphqlDispatcher,
    query: Option<&str>,
    limit: Option<u64>,
) -> Result<u64, OperationError> {
    traced("count_customers", async move {
        let mut variables = serde_json::Map::new();
        if let Some(query) = query {
            variables.insert("query".to_string(), json!(query));
        }
        variables.insert(
            "limit".to_string(),
            json!(limit.unwrap_or(DEFAULT_COUNT_LIMIT)),
        );
        let envelope = dispatcher
            .dispatch(CUSTOMERS_COUNT_QUERY, Some(variables.into()))
            .await?;
        let value = payload(&envelope, "customersCount")?;
        let raw: RawCount = decode(value, "data.customersCount")?;
        Ok(raw.count)
    })
    .await
}

/// Fetches a customer by global ID.
///
/// # Errors
///
/// Returns [`OperationError::NotFound`] when no customer exists for the ID.
pub async fn get_customer(
    dispatcher: &GraphqlDispatcher,
    customer_id: &str,
) -> Result<Customer, OperationError> {
    traced("get_customer", async move {
        let envelope = dispatcher
            .dispatch(CUSTOMER_QUERY, Some(json!({ "id": customer_id })))
            .await?;
        let value = payload(&envelope, "customer")?;
        if value.is_null() {
            return Err(OperationError::not_found(format!(
                "no customer found with ID {customer_id}"
            )));
        }
        decode(value, "data.customer")
    })
    .await
}

/// Sends an account invite email to a customer, returning the customer ID
/// the store acknowledged.
///
/// # Errors
///
/// Returns [`OperationError::Validation`] with every `userErrors` entry when
/// the invite is rejected (e.g. the customer already has an account).
pub async fn send_account_invite(
    dispatcher: &GraphqlDispatcher,
    customer_id: &str,
) -> Result<String, OperationError> {
    traced("send_account_invite", async move {
        let envelope = dispatcher
            .dispatch(SEND_INVITE_MUTATION, Some(json!({ "customerId": customer_id })))
            .await?;
        let value = payload(&envelope, "customerSendAccountInviteEmail")?;
        check_user_errors(&value)?;

        #[derive(Deserialize)]
        struct RawInvitedCustomer {
            id: String,
        }
        // The customer object can legitimately be absent in the acknowledgement.
        let acknowledged = value
            .get("customer")
            .filter(|customer| !customer.is_null())
            .cloned();
        match acknowledged {
            Some(customer) => {
                let raw: RawInvitedCustomer =
                    decode(customer, "data.customerSendAccountInviteEmail.customer")?;
                Ok(raw.id)
            }
            None => Ok(customer_id.to_string()),
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_omit_absent_optionals() {
        let params = CustomerListParams::default();
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["first"], 10);
        assert!(value.get("after").is_none());
        assert!(value.get("query").is_none());
        assert!(value.get("sortKey").is_none());
    }

    #[test]
    fn test_list_params_serialize_sort_key_camel_case() {
        let params = CustomerListParams {
            sort_key: Some("CREATED_AT".to_string()),
            ..CustomerListParams::default()
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["sortKey"], "CREATED_AT");
    }

    #[test]
    fn test_customer_parses_with_sparse_fields() {
        let customer: Customer = serde_json::from_value(json!({
            "id": "gid://shopify/Customer/1",
            "firstName": "Ada",
            "lastName": null,
            "email": "ada@example.com",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-06-01T12:30:00Z",
            "numberOfOrders": "4",
            "amountSpent": {"amount": "120.50", "currencyCode": "USD"},
            "tags": [],
            "defaultAddress": null
        }))
        .unwrap();
        assert_eq!(customer.number_of_orders, "4");
        assert_eq!(customer.amount_spent.amount, "120.50");
        assert!(customer.default_address.is_none());
        assert!(customer.phone.is_none());
    }

    #[test]
    fn test_customer_connection_carries_page_info() {
        let raw: RawCustomerConnection = serde_json::from_value(json!({
            "edges": [],
            "pageInfo": {"hasNextPage": true, "endCursor": "abc"}
        }))
        .unwrap();
        assert!(raw.page_info.has_next_page);
        assert_eq!(raw.page_info.end_cursor.as_deref(), Some("abc"));
    }
}
