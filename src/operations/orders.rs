//! Order operations: filtered listing with line items and counting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::GraphqlDispatcher;
use crate::operations::{decode, payload, traced, Connection, Money, OperationError, PageInfo};

/// Default page size for [`list_orders`].
pub const DEFAULT_ORDER_PAGE: u32 = 10;

/// Default upper bound passed to `ordersCount`.
pub const DEFAULT_COUNT_LIMIT: u64 = 10_000;

const ORDERS_QUERY: &str = r"
query OrdersList($first: Int, $after: String, $query: String, $sortKey: OrderSortKeys) {
  orders(first: $first, after: $after, query: $query, sortKey: $sortKey) {
    edges {
      cursor
      node {
        id
        name
        createdAt
        totalPriceSet {
          shopMoney {
            amount
            currencyCode
          }
        }
        customer {
          id
          firstName
          lastName
          email
        }
        lineItems(first: 10) {
          edges {
            node {
              title
              quantity
              price
            }
          }
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

const ORDERS_COUNT_QUERY: &str = r"
query OrdersCount($query: String, $limit: Int) {
  ordersCount(query: $query, limit: $limit) {
    count
  }
}
";

/// Parameters for [`list_orders`]. Absent optionals are omitted from the
/// request entirely.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListParams {
    pub first: u32,
    /// Pagination cursor from a previous page's [`PageInfo::end_cursor`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Filter in Shopify's search syntax (e.g. `financial_status:paid`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// An `OrderSortKeys` value (e.g. `CREATED_AT`, `TOTAL_PRICE`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
}

impl Default for OrderListParams {
    fn default() -> Self {
        Self {
            first: DEFAULT_ORDER_PAGE,
            after: None,
            query: None,
            sort_key: None,
        }
    }
}

/// An order with its total, customer, and leading line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: String,
    /// Human-facing order name (e.g. `#1001`).
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Total in the shop's currency.
    pub total_price: Money,
    pub customer: Option<OrderCustomer>,
    /// First ten line items of the order.
    pub line_items: Vec<LineItem>,
}

/// The customer attached to an order, when one exists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A single line item of an order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LineItem {
    pub title: String,
    pub quantity: i64,
    /// Unit price as a decimal string.
    pub price: String,
}

/// One page of orders plus the cursor metadata for fetching the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOrderConnection {
    #[serde(default = "Vec::new")]
    edges: Vec<RawOrderEdge>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct RawOrderEdge {
    node: RawOrder,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOrder {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
    total_price_set: RawPriceSet,
    #[serde(default)]
    customer: Option<OrderCustomer>,
    line_items: Connection<LineItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPriceSet {
    shop_money: Money,
}

#[derive(Debug, Deserialize)]
struct RawCount {
    count: u64,
}

/// Fetches one page of orders with optional filtering and sorting.
///
/// # Errors
///
/// Returns [`OperationError`] on transport failure, request rejection, or a
/// malformed response.
pub async fn list_orders(
    dispatcher: &GraphqlDispatcher,
    params: OrderListParams,
) -> Result<OrderPage, OperationError> {
    traced("list_orders", async move {
        let variables = serde_json::to_value(&params)
            .map_err(|_| OperationError::malformed("order list parameters", json!(null)))?;
        let envelope = dispatcher.dispatch(ORDERS_QUERY, Some(variables)).await?;
        let value = payload(&envelope, "orders")?;
        let raw: RawOrderConnection = decode(value, "data.orders")?;
        Ok(OrderPage {
            orders: raw
                .edges
                .into_iter()
                .map(|edge| {
                    let node = edge.node;
                    Order {
                        id: node.id,
                        name: node.name,
                        created_at: node.created_at,
                        total_price: node.total_price_set.shop_money,
                        customer: node.customer,
                        line_items: node.line_items.into_nodes(),
                    }
                })
                .collect(),
            page_info: raw.page_info,
        })
    })
    .await
}

/// Counts orders matching an optional filter, bounded by `limit`
/// (defaulting to [`DEFAULT_COUNT_LIMIT`] when `None`).
///
/// # Errors
///
/// Returns [`OperationError`] on transport failure, request rejection, or a
/// malformed response.
pub async fn count_orders(
    dispatcher: &GraphqlDispatcher,
    query: Option<&str>,
    limit: Option<u64>,
) -> Result<u64, OperationError> {
    traced("count_orders", async move {
        let mut variables = serde_json::Map::new();
        if let Some(query) = query {
            variables.insert("query".to_string(), json!(query));
        }
        variables.insert(
            "limit".to_string(),
            json!(limit.unwrap_or(DEFAULT_COUNT_LIMIT)),
        );
        let envelope = dispatcher
            .dispatch(ORDERS_COUNT_QUERY, Some(variables.into()))
            .await?;
        let value = payload(&envelope, "ordersCount")?;
        let raw: RawCount = decode(value, "data.ordersCount")?;
        Ok(raw.count)
    })
    .await
}
