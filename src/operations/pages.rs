//! Online store page operations: list, create, read body HTML, update, and
//! delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::GraphqlDispatcher;
use crate::operations::{
    check_user_errors, decode, payload, require_field, traced, Connection, OperationError,
};

/// Default page size for [`list_pages`].
pub const DEFAULT_PAGE_PAGE: u32 = 5;

const PAGES_QUERY: &str = r"
query GetPages($first: Int!) {
  pages(first: $first) {
    edges {
      node {
        id
        title
        handle
        publishedAt
      }
    }
  }
}
";

const PAGE_QUERY: &str = r"
query GetPageHtml($id: ID!) {
  page(id: $id) {
    id
    title
    body
    handle
  }
}
";

const PAGE_CREATE_MUTATION: &str = r"
mutation CreatePage($page: PageCreateInput!) {
  pageCreate(page: $page) {
    page {
      id
      title
      handle
    }
    userErrors {
      code
      field
      message
    }
  }
}
";

const PAGE_UPDATE_MUTATION: &str = r"
mutation UpdatePageHtml($id: ID!, $page: PageUpdateInput!) {
  pageUpdate(id: $id, page: $page) {
    page {
      id
      title
      body
    }
    userErrors {
      field
      message
    }
  }
}
";

const PAGE_DELETE_MUTATION: &str = r"
mutation DeletePage($id: ID!) {
  pageDelete(id: $id) {
    deletedPageId
    userErrors {
      code
      field
      message
    }
  }
}
";

/// Fields for creating a page via `pageCreate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCreateInput {
    /// Page title.
    pub title: String,
    /// URL handle (slug).
    pub handle: String,
    /// HTML content.
    pub body: String,
    /// Whether the page is published immediately. Tool default: `true`.
    pub is_published: bool,
    /// Theme template suffix. Tool default: `custom`.
    pub template_suffix: String,
}

impl PageCreateInput {
    /// Creates a page input with the tool defaults: published immediately,
    /// `custom` template suffix.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        handle: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            handle: handle.into(),
            body: body.into(),
            is_published: true,
            template_suffix: "custom".to_string(),
        }
    }
}

/// A page row from [`list_pages`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: String,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// A page with its body HTML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageContent {
    pub id: String,
    pub title: String,
    pub handle: String,
    /// The body HTML.
    pub body: String,
}

/// Identifier, title, and handle of a freshly created page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedPage {
    pub id: String,
    pub title: String,
    pub handle: String,
}

/// The page state echoed back by `pageUpdate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdatedPage {
    pub id: String,
    pub title: String,
    pub body: String,
}

/// Fetches the first `first` online store pages.
///
/// The catalogue default is [`DEFAULT_PAGE_PAGE`].
///
/// # Errors
///
/// Returns [`OperationError`] on transport failure, request rejection, or a
/// malformed response.
pub async fn list_pages(
    dispatcher: &GraphqlDispatcher,
    first: u32,
) -> Result<Vec<PageSummary>, OperationError> {
    traced("list_pages", async move {
        let envelope = dispatcher
            .dispatch(PAGES_QUERY, Some(json!({ "first": first })))
            .await?;
        let value = payload(&envelope, "pages")?;
        let connection: Connection<PageSummary> = decode(value, "data.pages")?;
        Ok(connection.into_nodes())
    })
    .await
}

/// Fetches a page's body HTML by global ID.
///
/// # Errors
///
/// Returns [`OperationError::NotFound`] when no page exists for the ID.
pub async fn get_page(
    dispatcher: &GraphqlDispatcher,
    page_id: &str,
) -> Result<PageContent, OperationError> {
    traced("get_page", async move {
        let envelope = dispatcher
            .dispatch(PAGE_QUERY, Some(json!({ "id": page_id })))
            .await?;
        let value = payload(&envelope, "page")?;
        if value.is_null() {
            return Err(OperationError::not_found(format!(
                "no page found with ID {page_id}"
            )));
        }
        decode(value, "data.page")
    })
    .await
}

/// Creates an online store page.
///
/// After creating a page, callers typically fetch the menu and add an entry
/// for it so the page is reachable from navigation.
///
/// # Errors
///
/// Returns [`OperationError::Validation`] with every `userErrors` entry when
/// the input is rejected.
pub async fn create_page(
    dispatcher: &GraphqlDispatcher,
    input: PageCreateInput,
) -> Result<CreatedPage, OperationError> {
    traced("create_page", async move {
        let envelope = dispatcher
            .dispatch(PAGE_CREATE_MUTATION, Some(json!({ "page": input })))
            .await?;
        let value = payload(&envelope, "pageCreate")?;
        check_user_errors(&value)?;
        let page = require_field(&value, "page", "data.pageCreate.page")?;
        decode(page, "data.pageCreate.page")
    })
    .await
}

/// Replaces a page's body HTML.
///
/// # Errors
///
/// Returns [`OperationError::Validation`] with every `userErrors` entry when
/// the update is rejected.
pub async fn update_page_body(
    dispatcher: &GraphqlDispatcher,
    page_id: &str,
    new_html: &str,
) -> Result<UpdatedPage, OperationError> {
    traced("update_page_body", async move {
        let variables = json!({ "id": page_id, "page": { "body": new_html } });
        let envelope = dispatcher
            .dispatch(PAGE_UPDATE_MUTATION, Some(variables))
            .await?;
        let value = payload(&envelope, "pageUpdate")?;
        check_user_errors(&value)?;
        let page = require_field(&value, "page", "data.pageUpdate.page")?;
        decode(page, "data.pageUpdate.page")
    })
    .await
}

/// Deletes a page, returning the deleted page's ID.
///
/// # Errors
///
/// Returns [`OperationError::Validation`] when the deletion is rejected.
pub async fn delete_page(
    dispatcher: &GraphqlDispatcher,
    page_id: &str,
) -> Result<String, OperationError> {
    traced("delete_page", async move {
        let envelope = dispatcher
            .dispatch(PAGE_DELETE_MUTATION, Some(json!({ "id": page_id })))
            .await?;
        let value = payload(&envelope, "pageDelete")?;
        check_user_errors(&value)?;
        let deleted = require_field(&value, "deletedPageId", "data.pageDelete.deletedPageId")?;
        decode(deleted, "data.pageDelete.deletedPageId")
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_input_defaults() {
        let input = PageCreateInput::new("About Us", "about-us", "<h1>About</h1>");
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["isPublished"], true);
        assert_eq!(value["templateSuffix"], "custom");
        assert_eq!(value["handle"], "about-us");
    }

    #[test]
    fn test_page_summary_tolerates_null_published_at() {
        let summary: PageSummary = serde_json::from_value(json!({
            "id": "gid://shopify/Page/1",
            "title": "Draft",
            "handle": "draft",
            "publishedAt": null
        }))
        .unwrap();
        assert!(summary.published_at.is_none());
    }
}
