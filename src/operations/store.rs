//! Store metadata operations: shop info, locations, sales channel
//! publications, and product publishing.

use serde::Deserialize;
use serde_json::json;

use crate::client::GraphqlDispatcher;
use crate::operations::{
    check_user_errors, decode, payload, require_field, traced, NodeList, OperationError,
};

/// Default page size for [`list_locations`]. Shopify caps `first` at 250.
pub const DEFAULT_LOCATION_PAGE: u32 = 50;

/// Default page size for [`list_publications`].
pub const DEFAULT_PUBLICATION_PAGE: u32 = 20;

const SHOP_INFO_QUERY: &str = r"
query GetShopInfo {
  shop {
    id
    name
    description
    email
    contactEmail
    url
    features {
      storefront
    }
  }
}
";

const LOCATIONS_QUERY: &str = r"
query GetLocations($first: Int!) {
  locations(first: $first) {
    nodes {
      id
      name
      address {
        address1
        address2
        city
        province
        country
        zip
      }
    }
  }
}
";

const PUBLICATIONS_QUERY: &str = r"
query GetPublications($first: Int!) {
  publications(first: $first) {
    nodes {
      id
      name
      channel {
        handle
      }
    }
  }
}
";

const PUBLISH_MUTATION: &str = r"
mutation PublishProduct($id: ID!, $publicationIds: [ID!]!) {
  publishablePublish(id: $id, input: { publicationIds: $publicationIds }) {
    publishable {
      ... on Product {
        id
        title
        publishedOnCurrentPublication
      }
    }
    userErrors {
      field
      message
    }
  }
}
";

const PUBLISHED_ON_PUBLICATION_QUERY: &str = r"
query ProductShow($id: ID!, $publicationId: ID!) {
  product(id: $id) {
    id
    title
    publishedOnPublication(publicationId: $publicationId)
  }
}
";

/// Shop identity and contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopInfo {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub email: String,
    pub contact_email: String,
    pub url: String,
    /// Whether the shop has an online storefront.
    pub storefront_enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawShop {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    email: String,
    contact_email: String,
    url: String,
    features: RawShopFeatures,
}

#[derive(Debug, Deserialize)]
struct RawShopFeatures {
    storefront: bool,
}

/// A fulfillment/retail location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub address: LocationAddress,
}

/// Postal address of a location. Every component is optional on the remote
/// side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocationAddress {
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

/// A sales channel publication (e.g. Online Store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub id: String,
    pub name: String,
    /// Handle of the backing channel (e.g. `online_store`).
    pub channel_handle: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPublication {
    id: String,
    name: String,
    #[serde(default)]
    channel: Option<RawChannel>,
}

#[derive(Debug, Deserialize)]
struct RawChannel {
    handle: String,
}

/// The product state echoed back by `publishablePublish`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedProduct {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub published_on_current_publication: bool,
}

/// Retrieves shop identity, contact, and storefront feature information.
///
/// # Errors
///
/// Returns [`OperationError`] on transport failure, request rejection, or a
/// malformed response.
pub async fn get_shop_info(dispatcher: &GraphqlDispatcher) -> Result<ShopInfo, OperationError> {
    traced("get_shop_info", async move {
        let envelope = dispatcher.dispatch(SHOP_INFO_QUERY, None).await?;
        let value = payload(&envelope, "shop")?;
        let raw: RawShop = decode(value, "data.shop")?;
        Ok(ShopInfo {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            email: raw.email,
            contact_email: raw.contact_email,
            url: raw.url,
            storefront_enabled: raw.features.storefront,
        })
    })
    .await
}

/// Fetches the first `first` locations with their addresses.
///
/// The catalogue default is [`DEFAULT_LOCATION_PAGE`].
///
/// # Errors
///
/// Returns [`OperationError`] on transport failure, request rejection, or a
/// malformed response.
pub async fn list_locations(
    dispatcher: &GraphqlDispatcher,
    first: u32,
) -> Result<Vec<Location>, OperationError> {
    traced("list_locations", async move {
        let envelope = dispatcher
            .dispatch(LOCATIONS_QUERY, Some(json!({ "first": first })))
            .await?;
        let value = payload(&envelope, "locations")?;
        let list: NodeList<Location> = decode(value, "data.locations")?;
        Ok(list.nodes)
    })
    .await
}

/// Retrieves the store's sales channel publications.
///
/// # Errors
///
/// Returns [`OperationError`] on transport failure, request rejection, or a
/// malformed response.
pub async fn list_publications(
    dispatcher: &GraphqlDispatcher,
    first: u32,
) -> Result<Vec<Publication>, OperationError> {
    traced("list_publications", async move {
        let envelope = dispatcher
            .dispatch(PUBLICATIONS_QUERY, Some(json!({ "first": first })))
            .await?;
        let value = payload(&envelope, "publications")?;
        let list: NodeList<RawPublication> = decode(value, "data.publications")?;
        Ok(list
            .nodes
            .into_iter()
            .map(|raw| Publication {
                id: raw.id,
                name: raw.name,
                channel_handle: raw.channel.map(|channel| channel.handle),
            })
            .collect())
    })
    .await
}

/// Publishes a product to a sales channel via `publishablePublish`.
///
/// # Errors
///
/// Returns [`OperationError::Validation`] with every `userErrors` entry when
/// the publish is rejected.
pub async fn publish_product(
    dispatcher: &GraphqlDispatcher,
    product_id: &str,
    publication_id: &str,
) -> Result<PublishedProduct, OperationError> {
    traced("publish_product", async move {
        let variables = json!({ "id": product_id, "publicationIds": [publication_id] });
        let envelope = dispatcher
            .dispatch(PUBLISH_MUTATION, Some(variables))
            .await?;
        let value = payload(&envelope, "publishablePublish")?;
        check_user_errors(&value)?;
        let publishable = require_field(
            &value,
            "publishable",
            "data.publishablePublish.publishable",
        )?;
        decode(publishable, "data.publishablePublish.publishable")
    })
    .await
}

/// Checks whether a product is published on a specific publication.
///
/// # Errors
///
/// Returns [`OperationError::NotFound`] when no product exists for the ID.
pub async fn is_product_published(
    dispatcher: &GraphqlDispatcher,
    product_id: &str,
    publication_id: &str,
) -> Result<bool, OperationError> {
    traced("is_product_published", async move {
        let variables = json!({ "id": product_id, "publicationId": publication_id });
        let envelope = dispatcher
            .dispatch(PUBLISHED_ON_PUBLICATION_QUERY, Some(variables))
            .await?;
        let value = payload(&envelope, "product")?;
        if value.is_null() {
            return Err(OperationError::not_found(format!(
                "no product found with ID {product_id}"
            )));
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct RawPublishedCheck {
            published_on_publication: bool,
        }
        let raw: RawPublishedCheck = decode(value, "data.product")?;
        Ok(raw.published_on_publication)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_shop_parses_feature_flag() {
        let raw: RawShop = serde_json::from_value(json!({
            "id": "gid://shopify/Shop/1",
            "name": "Test Shop",
            "description": null,
            "email": "owner@example.com",
            "contactEmail": "contact@example.com",
            "url": "https://test-shop.myshopify.com",
            "features": {"storefront": true}
        }))
        .unwrap();
        assert!(raw.features.storefront);
        assert!(raw.description.is_none());
    }

    #[test]
    fn test_location_address_tolerates_missing_components() {
        let location: Location = serde_json::from_value(json!({
            "id": "gid://shopify/Location/1",
            "name": "Warehouse",
            "address": {"city": "Berlin", "country": "Germany"}
        }))
        .unwrap();
        assert_eq!(location.address.city.as_deref(), Some("Berlin"));
        assert!(location.address.address1.is_none());
        assert!(location.address.zip.is_none());
    }

    #[test]
    fn test_publication_without_channel() {
        let raw: RawPublication = serde_json::from_value(json!({
            "id": "gid://shopify/Publication/1",
            "name": "Online Store",
            "channel": null
        }))
        .unwrap();
        assert!(raw.channel.is_none());
    }
}
