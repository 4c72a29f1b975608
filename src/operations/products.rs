//! Product catalog operations: listing, lookup, create/update/delete, and
//! bulk variant creation.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

use crate::client::GraphqlDispatcher;
use crate::operations::{
    check_user_errors, decode, payload, require_field, traced, Connection, OperationError,
};

/// Default page size for [`list_products`].
pub const DEFAULT_PRODUCT_PAGE: u32 = 3;

const PRODUCTS_QUERY: &str = r"
query Products($first: Int!) {
  products(first: $first) {
    edges {
      node {
        id
        title
        handle
        status
        totalInventory
        variants(first: 3) {
          edges {
            node {
              title
              price
              sku
            }
          }
        }
      }
    }
  }
}
";

const PRODUCT_QUERY: &str = r"
query GetProduct($id: ID!) {
  product(id: $id) {
    id
    title
    descriptionHtml
    handle
    metafields(first: 5) {
      edges {
        node {
          namespace
          key
          value
        }
      }
    }
  }
}
";

const PRODUCT_CREATE_MUTATION: &str = r"
mutation ProductCreate($input: ProductInput!, $media: [CreateMediaInput!]) {
  productCreate(input: $input, media: $media) {
    product {
      id
      title
    }
    userErrors {
      field
      message
    }
  }
}
";

const PRODUCT_UPDATE_MUTATION: &str = r"
mutation ProductUpdate($product: ProductUpdateInput!, $media: [CreateMediaInput!]) {
  productUpdate(product: $product, media: $media) {
    product {
      id
      title
      media(first: 10) {
        nodes {
          alt
          mediaContentType
          preview {
            status
          }
        }
      }
    }
    userErrors {
      field
      message
    }
  }
}
";

const PRODUCT_DELETE_MUTATION: &str = r"
mutation ProductDelete($input: ProductDeleteInput!, $sync: Boolean) {
  productDelete(input: $input, synchronous: $sync) {
    deletedProductId
    userErrors {
      field
      message
    }
  }
}
";

const VARIANTS_BULK_CREATE_MUTATION: &str = r"
mutation ProductVariantsBulkCreate(
  $productId: ID!,
  $variants: [ProductVariantsBulkInput!]!,
  $media: [CreateMediaInput!],
  $strategy: ProductVariantsBulkCreateStrategy
) {
  productVariantsBulkCreate(
    productId: $productId,
    variants: $variants,
    media: $media,
    strategy: $strategy
  ) {
    productVariants {
      id
      title
      price
    }
    userErrors {
      field
      message
    }
  }
}
";

/// Fields for creating a product via `productCreate`.
///
/// Absent optionals are omitted from the variables mapping entirely.
/// Plain-string option values are transmitted as `{ name }` objects; the
/// mutation's `productOptions` input demands nested objects, not bare
/// strings.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreateInput {
    /// Product title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// URL handle (slug).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// HTML description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    /// Vendor name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    /// Product type label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    /// Product status: `ACTIVE`, `DRAFT`, or `ARCHIVED`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Free-form tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Named options with their values (e.g. Color: Red, Blue).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub product_options: Vec<ProductOptionInput>,
    /// Open-ended metafield inputs, passed through as-is.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metafields: Vec<Value>,
}

/// A named product option and its values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOptionInput {
    /// Option name (e.g. `Color`).
    pub name: String,
    /// Option values as plain strings; serialized as `[{ "name": v }]`.
    #[serde(serialize_with = "option_values_as_objects")]
    pub values: Vec<String>,
}

fn option_values_as_objects<S>(values: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(values.iter().map(|name| json!({ "name": name })))
}

/// Fields for updating a product via `productUpdate`. `id` is required.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdateInput {
    /// Global ID of the product to update.
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ProductUpdateInput {
    /// Creates an update input targeting the given product, with no field
    /// changes yet.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            handle: None,
            description_html: None,
            status: None,
            tags: Vec::new(),
        }
    }
}

/// A `CreateMediaInput` attached to product create/update and bulk variant
/// mutations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInput {
    /// Alt text for the media.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Media content type (e.g. `IMAGE`, `VIDEO`).
    pub media_content_type: String,
    /// Source URL of the media asset.
    pub original_source: String,
}

/// One variant specification for [`create_product_variants`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantBulkInput {
    /// Price as a decimal string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Compare-at price as a decimal string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<String>,
    /// Option values selecting this variant (e.g. Color = Red).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub option_values: Vec<VariantOptionValue>,
    /// Per-location starting inventory.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inventory_quantities: Vec<InventoryQuantity>,
    /// Stock keeping unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Barcode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Whether the variant is taxable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxable: Option<bool>,
    /// Inventory policy: `DENY` or `CONTINUE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_policy: Option<String>,
    /// Open-ended metafield inputs, passed through as-is.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metafields: Vec<Value>,
}

/// An option value naming which existing product option a variant maps to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantOptionValue {
    /// The value name (e.g. `Red`).
    pub name: String,
    /// Global ID of the product option, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_id: Option<String>,
    /// Name of the product option, as an alternative to `option_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_name: Option<String>,
}

/// Starting inventory for one location.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryQuantity {
    /// Units available at the location.
    pub available_quantity: i64,
    /// Global ID of the location.
    pub location_id: String,
}

/// Strategy for `productVariantsBulkCreate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulkCreateStrategy {
    /// Keep the standalone variant Shopify creates with the product.
    #[default]
    Default,
    /// Remove the standalone variant when adding the new ones.
    RemoveStandaloneVariant,
}

/// A product row from [`list_products`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub status: String,
    pub total_inventory: Option<i64>,
    /// Up to the first three variants.
    pub variants: Vec<VariantSummary>,
}

/// A variant row nested under a product listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSummary {
    pub title: String,
    pub price: String,
    #[serde(default)]
    pub sku: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProduct {
    id: String,
    title: String,
    handle: String,
    status: String,
    #[serde(default)]
    total_inventory: Option<i64>,
    variants: Connection<VariantSummary>,
}

impl From<RawProduct> for ProductSummary {
    fn from(raw: RawProduct) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            handle: raw.handle,
            status: raw.status,
            total_inventory: raw.total_inventory,
            variants: raw.variants.into_nodes(),
        }
    }
}

/// A single product with description and metafields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetail {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub description_html: String,
    /// Up to the first five metafields.
    pub metafields: Vec<Metafield>,
}

/// A metafield entry on a product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Metafield {
    pub namespace: String,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProductDetail {
    id: String,
    title: String,
    handle: String,
    description_html: String,
    metafields: Connection<Metafield>,
}

/// Identifier and title of a freshly created or updated product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductRef {
    pub id: String,
    pub title: String,
}

/// Result of [`update_product`]: the product plus the state of its media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedProduct {
    pub id: String,
    pub title: String,
    pub media: Vec<MediaSummary>,
}

/// One media node echoed back by `productUpdate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSummary {
    pub alt: Option<String>,
    pub media_content_type: String,
    /// Processing status of the media preview, when available.
    pub preview_status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUpdatedProduct {
    id: String,
    title: String,
    media: super::NodeList<RawMediaNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMediaNode {
    #[serde(default)]
    alt: Option<String>,
    media_content_type: String,
    #[serde(default)]
    preview: Option<RawPreview>,
}

#[derive(Debug, Deserialize)]
struct RawPreview {
    #[serde(default)]
    status: Option<String>,
}

/// Fetches the first `first` products with their leading variants.
///
/// The catalogue default is [`DEFAULT_PRODUCT_PAGE`].
///
/// # Errors
///
/// Returns [`OperationError`] on transport failure, request rejection, or a
/// malformed response.
pub async fn list_products(
    dispatcher: &GraphqlDispatcher,
    first: u32,
) -> Result<Vec<ProductSummary>, OperationError> {
    traced("list_products", async move {
        let envelope = dispatcher
            .dispatch(PRODUCTS_QUERY, Some(json!({ "first": first })))
            .await?;
        let value = payload(&envelope, "products")?;
        let connection: Connection<RawProduct> = decode(value, "data.products")?;
        Ok(connection
            .into_nodes()
            .into_iter()
            .map(ProductSummary::from)
            .collect())
    })
    .await
}

/// Fetches one product by global ID, including description HTML and the
/// first five metafields.
///
/// # Errors
///
/// Returns [`OperationError::NotFound`] when no product exists for the ID.
pub async fn get_product(
    dispatcher: &GraphqlDispatcher,
    product_id: &str,
) -> Result<ProductDetail, OperationError> {
    traced("get_product", async move {
        let envelope = dispatcher
            .dispatch(PRODUCT_QUERY, Some(json!({ "id": product_id })))
            .await?;
        let value = payload(&envelope, "product")?;
        if value.is_null() {
            return Err(OperationError::not_found(format!(
                "no product found with ID {product_id}"
            )));
        }
        let raw: RawProductDetail = decode(value, "data.product")?;
        Ok(ProductDetail {
            id: raw.id,
            title: raw.title,
            handle: raw.handle,
            description_html: raw.description_html,
            metafields: raw.metafields.into_nodes(),
        })
    })
    .await
}

/// Creates a product, optionally with media.
///
/// Not idempotent: calling this twice creates two products.
///
/// # Errors
///
/// Returns [`OperationError::Validation`] with every `userErrors` entry when
/// the input is rejected.
pub async fn create_product(
    dispatcher: &GraphqlDispatcher,
    input: ProductCreateInput,
    media: Vec<MediaInput>,
) -> Result<ProductRef, OperationError> {
    traced("create_product", async move {
        let variables = json!({ "input": input, "media": media });
        let envelope = dispatcher
            .dispatch(PRODUCT_CREATE_MUTATION, Some(variables))
            .await?;
        let value = payload(&envelope, "productCreate")?;
        check_user_errors(&value)?;
        let product = require_field(&value, "product", "data.productCreate.product")?;
        decode(product, "data.productCreate.product")
    })
    .await
}

/// Updates a product and optionally attaches new media, returning the
/// product with its media processing state.
///
/// # Errors
///
/// Returns [`OperationError::Validation`] with every `userErrors` entry when
/// the update is rejected.
pub async fn update_product(
    dispatcher: &GraphqlDispatcher,
    input: ProductUpdateInput,
    media: Vec<MediaInput>,
) -> Result<UpdatedProduct, OperationError> {
    traced("update_product", async move {
        let variables = json!({ "product": input, "media": media });
        let envelope = dispatcher
            .dispatch(PRODUCT_UPDATE_MUTATION, Some(variables))
            .await?;
        let value = payload(&envelope, "productUpdate")?;
        check_user_errors(&value)?;
        let product = require_field(&value, "product", "data.productUpdate.product")?;
        let raw: RawUpdatedProduct = decode(product, "data.productUpdate.product")?;
        Ok(UpdatedProduct {
            id: raw.id,
            title: raw.title,
            media: raw
                .media
                .nodes
                .into_iter()
                .map(|node| MediaSummary {
                    alt: node.alt,
                    media_content_type: node.media_content_type,
                    preview_status: node.preview.and_then(|preview| preview.status),
                })
                .collect(),
        })
    })
    .await
}

/// Deletes a product, returning the deleted product's ID.
///
/// `synchronous` defaults to `true` in the published tool schema.
///
/// # Errors
///
/// Returns [`OperationError::Validation`] when the deletion is rejected.
pub async fn delete_product(
    dispatcher: &GraphqlDispatcher,
    product_id: &str,
    synchronous: bool,
) -> Result<String, OperationError> {
    traced("delete_product", async move {
        let variables = json!({ "input": { "id": product_id }, "sync": synchronous });
        let envelope = dispatcher
            .dispatch(PRODUCT_DELETE_MUTATION, Some(variables))
            .await?;
        let value = payload(&envelope, "productDelete")?;
        check_user_errors(&value)?;
        let deleted = require_field(&value, "deletedProductId", "data.productDelete.deletedProductId")?;
        decode(deleted, "data.productDelete.deletedProductId")
    })
    .await
}

/// Creates one or more variants on an existing product in a single bulk
/// mutation, returning the new variant IDs in creation order.
///
/// Any single invalid variant spec fails the whole batch; the remote API
/// exposes no partial-success semantics and none are fabricated here.
///
/// # Errors
///
/// Returns [`OperationError::Validation`] with every rejected spec's
/// `userErrors` entry.
pub async fn create_product_variants(
    dispatcher: &GraphqlDispatcher,
    product_id: &str,
    variants: Vec<VariantBulkInput>,
    media: Vec<MediaInput>,
    strategy: BulkCreateStrategy,
) -> Result<Vec<String>, OperationError> {
    traced("create_product_variants", async move {
        let variables = json!({
            "productId": product_id,
            "variants": variants,
            "media": media,
            "strategy": strategy,
        });
        let envelope = dispatcher
            .dispatch(VARIANTS_BULK_CREATE_MUTATION, Some(variables))
            .await?;
        let value = payload(&envelope, "productVariantsBulkCreate")?;
        check_user_errors(&value)?;
        let created = require_field(
            &value,
            "productVariants",
            "data.productVariantsBulkCreate.productVariants",
        )?;

        #[derive(Deserialize)]
        struct CreatedVariant {
            id: String,
        }
        let created: Vec<CreatedVariant> =
            decode(created, "data.productVariantsBulkCreate.productVariants")?;
        Ok(created.into_iter().map(|variant| variant.id).collect())
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_option_values_become_name_objects() {
        let input = ProductCreateInput {
            title: Some("Shirt".to_string()),
            product_options: vec![ProductOptionInput {
                name: "Color".to_string(),
                values: vec!["Red".to_string(), "Blue".to_string()],
            }],
            ..ProductCreateInput::default()
        };

        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(
            value["productOptions"][0]["values"],
            json!([{ "name": "Red" }, { "name": "Blue" }])
        );
    }

    #[test]
    fn test_create_input_omits_absent_optionals() {
        let input = ProductCreateInput {
            title: Some("Shirt".to_string()),
            ..ProductCreateInput::default()
        };

        let value = serde_json::to_value(&input).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("title"));
        assert!(!object.contains_key("handle"));
        assert!(!object.contains_key("descriptionHtml"));
        assert!(!object.contains_key("tags"));
    }

    #[test]
    fn test_update_input_always_carries_id() {
        let input = ProductUpdateInput::new("gid://shopify/Product/1");
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value, json!({ "id": "gid://shopify/Product/1" }));
    }

    #[test]
    fn test_variant_input_field_names_are_camel_case() {
        let input = VariantBulkInput {
            price: Some("19.99".to_string()),
            compare_at_price: Some("29.99".to_string()),
            option_values: vec![VariantOptionValue {
                name: "Red".to_string(),
                option_id: Some("gid://shopify/ProductOption/1".to_string()),
                option_name: None,
            }],
            inventory_quantities: vec![InventoryQuantity {
                available_quantity: 10,
                location_id: "gid://shopify/Location/1".to_string(),
            }],
            inventory_policy: Some("DENY".to_string()),
            ..VariantBulkInput::default()
        };

        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["compareAtPrice"], "29.99");
        assert_eq!(value["optionValues"][0]["optionId"], "gid://shopify/ProductOption/1");
        assert!(value["optionValues"][0].get("optionName").is_none());
        assert_eq!(value["inventoryQuantities"][0]["availableQuantity"], 10);
        assert_eq!(value["inventoryPolicy"], "DENY");
        assert!(value.get("sku").is_none());
    }

    #[test]
    fn test_bulk_strategy_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_value(BulkCreateStrategy::Default).unwrap(),
            json!("DEFAULT")
        );
        assert_eq!(
            serde_json::to_value(BulkCreateStrategy::RemoveStandaloneVariant).unwrap(),
            json!("REMOVE_STANDALONE_VARIANT")
        );
    }

    #[test]
    fn test_product_summary_from_raw_flattens_variants() {
        let raw: RawProduct = serde_json::from_value(json!({
            "id": "gid://shopify/Product/1",
            "title": "Shirt",
            "handle": "shirt",
            "status": "ACTIVE",
            "totalInventory": 42,
            "variants": {
                "edges": [
                    {"node": {"title": "Small", "price": "10.00", "sku": "S-1"}},
                    {"node": {"title": "Large", "price": "12.00", "sku": null}}
                ]
            }
        }))
        .unwrap();

        let summary = ProductSummary::from(raw);
        assert_eq!(summary.total_inventory, Some(42));
        assert_eq!(summary.variants.len(), 2);
        assert_eq!(summary.variants[0].sku.as_deref(), Some("S-1"));
        assert_eq!(summary.variants[1].sku, None);
    }
}
