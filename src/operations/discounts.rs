//! Discount code operations: listing code discount nodes, fetching one with
//! its lead code, and deleting.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::GraphqlDispatcher;
use crate::operations::{
    check_user_errors, decode, payload, require_field, traced, OperationError, PageInfo,
};

/// Default page size for [`list_discount_codes`].
pub const DEFAULT_DISCOUNT_PAGE: u32 = 10;

const DISCOUNT_CODES_QUERY: &str = r"
query DiscountCodesList($first: Int, $after: String, $query: String) {
  codeDiscountNodes(first: $first, after: $after, query: $query) {
    nodes {
      id
      codeDiscount {
        ... on DiscountCodeBasic {
          title
          summary
        }
        ... on DiscountCodeBxgy {
          title
          codesCount {
            count
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

const DISCOUNT_CODE_QUERY: &str = r"
query DiscountCodeGet($id: ID!) {
  codeDiscountNode(id: $id) {
    id
    codeDiscount {
      ... on DiscountCodeBasic {
        title
        summary
        codes(first: 1) {
          nodes {
            code
            id
          }
        }
      }
    }
  }
}
";

const DISCOUNT_CODE_DELETE_MUTATION: &str = r"
mutation DiscountCodeDelete($id: ID!) {
  discountCodeDelete(id: $id) {
    deletedDiscountCodeId
    userErrors {
      field
      message
    }
  }
}
";

/// Parameters for [`list_discount_codes`]. Absent optionals are omitted
/// from the request entirely.
#[derive(Debug, Clone, Serialize)]
pub struct DiscountListParams {
    pub first: u32,
    /// Pagination cursor from a previous page's [`PageInfo::end_cursor`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Filter in Shopify's search syntax.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl Default for DiscountListParams {
    fn default() -> Self {
        Self {
            first: DEFAULT_DISCOUNT_PAGE,
            after: None,
            query: None,
        }
    }
}

/// A code discount node from [`list_discount_codes`]. The inner discount is
/// typed; unrecognized discount classes decode as
/// [`DiscountSummary::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountNode {
    pub id: String,
    pub discount: DiscountSummary,
}

/// The discriminated discount payload inside a code discount node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountSummary {
    /// An amount-off or percentage discount (`DiscountCodeBasic`).
    Basic {
        title: String,
        summary: Option<String>,
    },
    /// A buy-X-get-Y discount (`DiscountCodeBxgy`).
    BuyXGetY { title: String, codes_count: u64 },
    /// A discount class the query's fragments do not cover.
    Other,
}

/// A discount node with its lead redemption code, from
/// [`get_discount_code`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountDetail {
    pub id: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    /// The first redemption code attached to the discount, when visible.
    pub code: Option<RedemptionCode>,
}

/// A single redemption code of a discount.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RedemptionCode {
    pub id: String,
    pub code: String,
}

/// One page of discount nodes plus cursor metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountPage {
    pub discounts: Vec<DiscountNode>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDiscountConnection {
    #[serde(default = "Vec::new")]
    nodes: Vec<RawDiscountNode>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDiscountNode {
    id: String,
    code_discount: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBasicDiscount {
    title: String,
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBxgyDiscount {
    title: String,
    codes_count: RawCodesCount,
}

#[derive(Debug, Deserialize)]
struct RawCodesCount {
    count: u64,
}

/// Inline fragments leave no `__typename` discriminator, so the shape of
/// the object decides: a `codesCount` key means Bxgy, a `summary` or bare
/// `title` means Basic, an empty object means a class the query skipped.
fn classify_discount(value: &serde_json::Value) -> DiscountSummary {
    if value.get("codesCount").is_some() {
        if let Ok(bxgy) = serde_json::from_value::<RawBxgyDiscount>(value.clone()) {
            return DiscountSummary::BuyXGetY {
                title: bxgy.title,
                codes_count: bxgy.codes_count.count,
            };
        }
    }
    if let Ok(basic) = serde_json::from_value::<RawBasicDiscount>(value.clone()) {
        return DiscountSummary::Basic {
            title: basic.title,
            summary: basic.summary,
        };
    }
    DiscountSummary::Other
}

/// Fetches one page of code discount nodes.
///
/// # Errors
///
/// Returns [`OperationError`] on transport failure, request rejection, or a
/// malformed response.
pub async fn list_discount_codes(
    dispatcher: &GraphqlDispatcher,
    params: DiscountListParams,
) -> Result<DiscountPage, OperationError> {
    traced("list_discount_codes", async move {
        let variables = serde_json::to_value(&params)
            .map_err(|_| OperationError::malformed("discount list parameters", json!(null)))?;
        let envelope = dispatcher
            .dispatch(DISCOUNT_CODES_QUERY, Some(variables))
            .await?;
        let value = payload(&envelope, "codeDiscountNodes")?;
        let raw: RawDiscountConnection = decode(value, "data.codeDiscountNodes")?;
        Ok(DiscountPage {
            discounts: raw
                .nodes
                .into_iter()
                .map(|node| DiscountNode {
                    discount: classify_discount(&node.code_discount),
                    id: node.id,
                })
                .collect(),
            page_info: raw.page_info,
        })
    })
    .await
}

/// Fetches a discount node by global ID with its first redemption code.
///
/// # Errors
///
/// Returns [`OperationError::NotFound`] when no discount node exists for
/// the ID.
pub async fn get_discount_code(
    dispatcher: &GraphqlDispatcher,
    discount_node_id: &str,
) -> Result<DiscountDetail, OperationError> {
    traced("get_discount_code", async move {
        let envelope = dispatcher
            .dispatch(DISCOUNT_CODE_QUERY, Some(json!({ "id": discount_node_id })))
            .await?;
        let value = payload(&envelope, "codeDiscountNode")?;
        if value.is_null() {
            return Err(OperationError::not_found(format!(
                "no discount found with ID {discount_node_id}"
            )));
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct RawDetailNode {
            id: String,
            code_discount: RawDetailDiscount,
        }
        #[derive(Deserialize)]
        struct RawDetailDiscount {
            #[serde(default)]
            title: Option<String>,
            #[serde(default)]
            summary: Option<String>,
            #[serde(default)]
            codes: Option<RawCodes>,
        }
        #[derive(Deserialize)]
        struct RawCodes {
            #[serde(default = "Vec::new")]
            nodes: Vec<RedemptionCode>,
        }

        let raw: RawDetailNode = decode(value, "data.codeDiscountNode")?;
        Ok(DiscountDetail {
            id: raw.id,
            title: raw.code_discount.title,
            summary: raw.code_discount.summary,
            code: raw
                .code_discount
                .codes
                .and_then(|codes| codes.nodes.into_iter().next()),
        })
    })
    .await
}

/// Deletes a discount, returning the deleted discount's ID.
///
/// # Errors
///
/// Returns [`OperationError::Validation`] when the deletion is rejected.
pub async fn delete_discount_code(
    dispatcher: &GraphqlDispatcher,
    discount_node_id: &str,
) -> Result<String, OperationError> {
    traced("delete_discount_code", async move {
        let envelope = dispatcher
            .dispatch(
                DISCOUNT_CODE_DELETE_MUTATION,
                Some(json!({ "id": discount_node_id })),
            )
            .await?;
        let value = payload(&envelope, "discountCodeDelete")?;
        check_user_errors(&value)?;
        let deleted = require_field(
            &value,
            "deletedDiscountCodeId",
            "data.discountCodeDelete.deletedDiscountCodeId",
        )?;
        decode(deleted, "data.discountCodeDelete.deletedDiscountCodeId")
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_basic_discount() {
        let discount = classify_discount(&json!({
            "title": "SUMMER10",
            "summary": "10% off all items"
        }));
        assert_eq!(
            discount,
            DiscountSummary::Basic {
                title: "SUMMER10".to_string(),
                summary: Some("10% off all items".to_string()),
            }
        );
    }

    #[test]
    fn test_classify_bxgy_discount() {
        let discount = classify_discount(&json!({
            "title": "BOGO",
            "codesCount": {"count": 3}
        }));
        assert_eq!(
            discount,
            DiscountSummary::BuyXGetY {
                title: "BOGO".to_string(),
                codes_count: 3,
            }
        );
    }

    #[test]
    fn test_classify_uncovered_class_is_other() {
        assert_eq!(classify_discount(&json!({})), DiscountSummary::Other);
    }

    #[test]
    fn test_discount_params_omit_absent_optionals() {
        let params = DiscountListParams::default();
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["first"], 10);
        assert!(value.get("after").is_none());
        assert!(value.get("query").is_none());
    }
}
