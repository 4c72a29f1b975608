//! Blog operations: list, fetch, create, rename, and delete blogs.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::client::GraphqlDispatcher;
use crate::operations::{
    check_user_errors, decode, payload, require_field, traced, NodeList, OperationError,
};

/// Default page size for [`list_blogs`].
pub const DEFAULT_BLOG_PAGE: u32 = 5;

/// Comment policy applied when [`create_blog`] is not given one explicitly.
pub const DEFAULT_COMMENT_POLICY: &str = "MODERATED";

const BLOGS_QUERY: &str = r"
query GetBlogs($first: Int!) {
  blogs(first: $first) {
    nodes {
      id
      title
      handle
      updatedAt
      commentPolicy
      createdAt
      templateSuffix
      tags
    }
  }
}
";

const BLOG_QUERY: &str = r"
query BlogByID($id: ID!) {
  blog(id: $id) {
    id
    title
    handle
    commentPolicy
    createdAt
    updatedAt
    templateSuffix
    tags
  }
}
";

const BLOG_CREATE_MUTATION: &str = r"
mutation BlogCreate($blog: BlogCreateInput!) {
  blogCreate(blog: $blog) {
    blog { id title handle }
    userErrors { message }
  }
}
";

const BLOG_UPDATE_MUTATION: &str = r"
mutation BlogUpdate($id: ID!, $blog: BlogInput!) {
  blogUpdate(id: $id, blog: $blog) {
    blog { id title }
    userErrors { message }
  }
}
";

const BLOG_DELETE_MUTATION: &str = r"
mutation BlogDelete($id: ID!) {
  blogDelete(id: $id) {
    deletedBlogId
    userErrors { message }
  }
}
";

/// A blog with its metadata. Returned by both [`list_blogs`] and
/// [`get_blog`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: String,
    pub title: String,
    pub handle: String,
    /// One of `MODERATED`, `AUTO_PUBLISHED`, `CLOSED`.
    pub comment_policy: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub template_suffix: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Identifier, title, and handle of a freshly created blog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedBlog {
    pub id: String,
    pub title: String,
    pub handle: String,
}

/// The blog state echoed back by `blogUpdate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdatedBlog {
    pub id: String,
    pub title: String,
}

/// Fetches the first `first` blogs with their full metadata.
///
/// The catalogue default is [`DEFAULT_BLOG_PAGE`].
///
/// # Errors
///
/// Returns [`OperationError`] on transport failure, request rejection, or a
/// malformed response.
pub async fn list_blogs(
    dispatcher: &GraphqlDispatcher,
    first: u32,
) -> Result<Vec<Blog>, OperationError> {
    traced("list_blogs", async move {
        let envelope = dispatcher
            .dispatch(BLOGS_QUERY, Some(json!({ "first": first })))
            .await?;
        let value = payload(&envelope, "blogs")?;
        let list: NodeList<Blog> = decode(value, "data.blogs")?;
        Ok(list.nodes)
    })
    .await
}

/// Fetches a single blog by global ID.
///
/// # Errors
///
/// Returns [`OperationError::NotFound`] when no blog exists for the ID.
pub async fn get_blog(
    dispatcher: &GraphqlDispatcher,
    blog_id: &str,
) -> Result<Blog, OperationError> {
    traced("get_blog", async move {
        let envelope = dispatcher
            .dispatch(BLOG_QUERY, Some(json!({ "id": blog_id })))
            .await?;
        let value = payload(&envelope, "blog")?;
        if value.is_null() {
            return Err(OperationError::not_found(format!(
                "no blog found with ID {blog_id}"
            )));
        }
        decode(value, "data.blog")
    })
    .await
}

/// Creates a blog. `comment_policy` falls back to
/// [`DEFAULT_COMMENT_POLICY`] when `None`.
///
/// # Errors
///
/// Returns [`OperationError::Validation`] with every `userErrors` entry when
/// the input is rejected.
pub async fn create_blog(
    dispatcher: &GraphqlDispatcher,
    title: &str,
    handle: &str,
    comment_policy: Option<&str>,
) -> Result<CreatedBlog, OperationError> {
    traced("create_blog", async move {
        let variables = json!({
            "blog": {
                "title": title,
                "handle": handle,
                "commentPolicy": comment_policy.unwrap_or(DEFAULT_COMMENT_POLICY),
            }
        });
        let envelope = dispatcher
            .dispatch(BLOG_CREATE_MUTATION, Some(variables))
            .await?;
        let value = payload(&envelope, "blogCreate")?;
        check_user_errors(&value)?;
        let blog = require_field(&value, "blog", "data.blogCreate.blog")?;
        decode(blog, "data.blogCreate.blog")
    })
    .await
}

/// Renames a blog.
///
/// # Errors
///
/// Returns [`OperationError::Validation`] with every `userErrors` entry when
/// the update is rejected.
pub async fn update_blog(
    dispatcher: &GraphqlDispatcher,
    blog_id: &str,
    title: &str,
) -> Result<UpdatedBlog, OperationError> {
    traced("update_blog", async move {
        let variables = json!({ "id": blog_id, "blog": { "title": title } });
        let envelope = dispatcher
            .dispatch(BLOG_UPDATE_MUTATION, Some(variables))
            .await?;
        let value = payload(&envelope, "blogUpdate")?;
        check_user_errors(&value)?;
        let blog = require_field(&value, "blog", "data.blogUpdate.blog")?;
        decode(blog, "data.blogUpdate.blog")
    })
    .await
}

/// Deletes a blog, returning the deleted blog's ID.
///
/// Deleting a blog also deletes its articles on the remote side.
///
/// # Errors
///
/// Returns [`OperationError::Validation`] when the deletion is rejected.
pub async fn delete_blog(
    dispatcher: &GraphqlDispatcher,
    blog_id: &str,
) -> Result<String, OperationError> {
    traced("delete_blog", async move {
        let envelope = dispatcher
            .dispatch(BLOG_DELETE_MUTATION, Some(json!({ "id": blog_id })))
            .await?;
        let value = payload(&envelope, "blogDelete")?;
        check_user_errors(&value)?;
        let deleted = require_field(&value, "deletedBlogId", "data.blogDelete.deletedBlogId")?;
        decode(deleted, "data.blogDelete.deletedBlogId")
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_parses_full_metadata() {
        let blog: Blog = serde_json::from_value(json!({
            "id": "gid://shopify/Blog/1",
            "title": "News",
            "handle": "news",
            "commentPolicy": "MODERATED",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-06-01T12:30:00Z",
            "templateSuffix": null,
            "tags": ["press", "updates"]
        }))
        .unwrap();
        assert_eq!(blog.comment_policy, "MODERATED");
        assert!(blog.template_suffix.is_none());
        assert_eq!(blog.tags.len(), 2);
    }

    #[test]
    fn test_blog_tolerates_missing_tags() {
        let blog: Blog = serde_json::from_value(json!({
            "id": "gid://shopify/Blog/2",
            "title": "Bare",
            "handle": "bare",
            "commentPolicy": "CLOSED",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(blog.tags.is_empty());
    }
}
