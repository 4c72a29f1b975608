//! Inventory item listing.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::client::GraphqlDispatcher;
use crate::operations::{decode, payload, traced, Connection, OperationError};

/// Default page size for [`list_inventory_items`].
pub const DEFAULT_INVENTORY_PAGE: u32 = 5;

const INVENTORY_ITEMS_QUERY: &str = r"
query InventoryItems($first: Int!) {
  inventoryItems(first: $first) {
    edges {
      node {
        id
        tracked
        sku
        createdAt
        updatedAt
        inventoryLevels(first: 1) {
          edges {
            node {
              available
            }
          }
        }
      }
    }
  }
}
";

/// An inventory item with its first location's availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItemSummary {
    pub id: String,
    pub sku: Option<String>,
    pub tracked: bool,
    /// Units available at the first inventory level, when reported.
    pub available: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInventoryItem {
    id: String,
    #[serde(default)]
    sku: Option<String>,
    tracked: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    inventory_levels: Connection<RawInventoryLevel>,
}

#[derive(Debug, Deserialize)]
struct RawInventoryLevel {
    #[serde(default)]
    available: Option<i64>,
}

/// Fetches the first `first` inventory items with their leading stock level.
///
/// The catalogue default is [`DEFAULT_INVENTORY_PAGE`].
///
/// # Errors
///
/// Returns [`OperationError`] on transport failure, request rejection, or a
/// malformed response.
pub async fn list_inventory_items(
    dispatcher: &GraphqlDispatcher,
    first: u32,
) -> Result<Vec<InventoryItemSummary>, OperationError> {
    traced("list_inventory_items", async move {
        let envelope = dispatcher
            .dispatch(INVENTORY_ITEMS_QUERY, Some(json!({ "first": first })))
            .await?;
        let value = payload(&envelope, "inventoryItems")?;
        let connection: Connection<RawInventoryItem> = decode(value, "data.inventoryItems")?;
        Ok(connection
            .into_nodes()
            .into_iter()
            .map(|raw| InventoryItemSummary {
                id: raw.id,
                sku: raw.sku,
                tracked: raw.tracked,
                available: raw
                    .inventory_levels
                    .into_nodes()
                    .into_iter()
                    .next()
                    .and_then(|level| level.available),
                created_at: raw.created_at,
                updated_at: raw.updated_at,
            })
            .collect())
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_item_with_no_levels_has_no_availability() {
        let raw: RawInventoryItem = serde_json::from_value(json!({
            "id": "gid://shopify/InventoryItem/1",
            "tracked": true,
            "sku": "SKU-1",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-06-01T12:30:00Z",
            "inventoryLevels": {"edges": []}
        }))
        .unwrap();

        assert!(raw.inventory_levels.into_nodes().is_empty());
    }

    #[test]
    fn test_raw_item_parses_first_level_availability() {
        let raw: RawInventoryItem = serde_json::from_value(json!({
            "id": "gid://shopify/InventoryItem/1",
            "tracked": false,
            "sku": null,
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-06-01T12:30:00Z",
            "inventoryLevels": {"edges": [{"node": {"available": 7}}]}
        }))
        .unwrap();

        let available = raw
            .inventory_levels
            .into_nodes()
            .into_iter()
            .next()
            .and_then(|level| level.available);
        assert_eq!(available, Some(7));
    }
}
