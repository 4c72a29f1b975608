//! Blog article operations: create, update, delete, and read articles.

use serde::Deserialize;
use serde_json::json;

use crate::client::GraphqlDispatcher;
use crate::operations::{
    check_user_errors, decode, payload, require_field, traced, NodeList, OperationError,
};

/// Default page size for [`list_blog_articles`].
pub const DEFAULT_ARTICLE_PAGE: u32 = 5;

const ARTICLE_CREATE_MUTATION: &str = r"
mutation ArticleCreate($article: ArticleCreateInput!) {
  articleCreate(article: $article) {
    article {
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

const ARTICLE_UPDATE_MUTATION: &str = r"
mutation ArticleUpdate($id: ID!, $article: ArticleInput!) {
  articleUpdate(id: $id, article: $article) {
    article { id title body }
    userErrors { message }
  }
}
";

const ARTICLE_DELETE_MUTATION: &str = r"
mutation ArticleDelete($id: ID!) {
  articleDelete(id: $id) {
    deletedArticleId
    userErrors { message }
  }
}
";

const BLOG_ARTICLES_QUERY: &str = r"
query GetArticles($id: ID!, $first: Int!) {
  blog(id: $id) {
    articles(first: $first) {
      nodes {
        id
        title
        body
      }
    }
  }
}
";

const ARTICLE_QUERY: &str = r"
query GetArticle($id: ID!) {
  article(id: $id) {
    id
    title
    body
    authorV2 { name }
    blog { id title }
  }
}
";

/// An article with its body HTML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub body: String,
}

/// An article with its author and owning blog, as returned by
/// [`get_article`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDetail {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author_name: Option<String>,
    pub blog_id: String,
    pub blog_title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticleDetail {
    id: String,
    title: String,
    body: String,
    #[serde(default)]
    author_v2: Option<RawAuthor>,
    blog: RawArticleBlog,
}

#[derive(Debug, Deserialize)]
struct RawAuthor {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawArticleBlog {
    id: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct RawBlogArticles {
    articles: NodeList<Article>,
}

/// Creates an article in a blog. The article is published immediately and
/// the author is recorded by name.
///
/// # Errors
///
/// Returns [`OperationError::Validation`] with every `userErrors` entry when
/// the input is rejected.
pub async fn create_article(
    dispatcher: &GraphqlDispatcher,
    blog_id: &str,
    title: &str,
    body: &str,
    author_name: &str,
) -> Result<Article, OperationError> {
    traced("create_article", async move {
        let variables = json!({
            "article": {
                "blogId": blog_id,
                "title": title,
                "body": body,
                "author": { "name": author_name },
                "isPublished": true,
            }
        });
        let envelope = dispatcher
            .dispatch(ARTICLE_CREATE_MUTATION, Some(variables))
            .await?;
        let value = payload(&envelope, "articleCreate")?;
        check_user_errors(&value)?;
        let article = require_field(&value, "article", "data.articleCreate.article")?;
        decode(article, "data.articleCreate.article")
    })
    .await
}

/// Replaces an article's title and body.
///
/// # Errors
///
/// Returns [`OperationError::Validation`] with every `userErrors` entry when
/// the update is rejected.
pub async fn update_article(
    dispatcher: &GraphqlDispatcher,
    article_id: &str,
    title: &str,
    body: &str,
) -> Result<Article, OperationError> {
    traced("update_article", async move {
        let variables = json!({
            "id": article_id,
            "article": { "title": title, "body": body }
        });
        let envelope = dispatcher
            .dispatch(ARTICLE_UPDATE_MUTATION, Some(variables))
            .await?;
        let value = payload(&envelope, "articleUpdate")?;
        check_user_errors(&value)?;
        let article = require_field(&value, "article", "data.articleUpdate.article")?;
        decode(article, "data.articleUpdate.article")
    })
    .await
}

/// Deletes an article, returning the deleted article's ID.
///
/// # Errors
///
/// Returns [`OperationError::Validation`] when the deletion is rejected.
pub async fn delete_article(
    dispatcher: &GraphqlDispatcher,
    article_id: &str,
) -> Result<String, OperationError> {
    traced("delete_article", async move {
        let envelope = dispatcher
            .dispatch(ARTICLE_DELETE_MUTATION, Some(json!({ "id": article_id })))
            .await?;
        let value = payload(&envelope, "articleDelete")?;
        check_user_errors(&value)?;
        let deleted = require_field(
            &value,
            "deletedArticleId",
            "data.articleDelete.deletedArticleId",
        )?;
        decode(deleted, "data.articleDelete.deletedArticleId")
    })
    .await
}

/// Fetches the first `first` articles of a blog.
///
/// The catalogue default is [`DEFAULT_ARTICLE_PAGE`].
///
/// # Errors
///
/// Returns [`OperationError::NotFound`] when no blog exists for the ID.
pub async fn list_blog_articles(
    dispatcher: &GraphqlDispatcher,
    blog_id: &str,
    first: u32,
) -> Result<Vec<Article>, OperationError> {
    traced("list_blog_articles", async move {
        let envelope = dispatcher
            .dispatch(
                BLOG_ARTICLES_QUERY,
                Some(json!({ "id": blog_id, "first": first })),
            )
            .await?;
        let value = payload(&envelope, "blog")?;
        if value.is_null() {
            return Err(OperationError::not_found(format!(
                "no blog found with ID {blog_id}"
            )));
        }
        let raw: RawBlogArticles = decode(value, "data.blog")?;
        Ok(raw.articles.nodes)
    })
    .await
}

/// Fetches an article by global ID, including its author and owning blog.
///
/// # Errors
///
/// Returns [`OperationError::NotFound`] when no article exists for the ID.
pub async fn get_article(
    dispatcher: &GraphqlDispatcher,
    article_id: &str,
) -> Result<ArticleDetail, OperationError> {
    traced("get_article", async move {
        let envelope = dispatcher
            .dispatch(ARTICLE_QUERY, Some(json!({ "id": article_id })))
            .await?;
        let value = payload(&envelope, "article")?;
        if value.is_null() {
            return Err(OperationError::not_found(format!(
                "no article found with ID {article_id}"
            )));
        }
        let raw: RawArticleDetail = decode(value, "data.article")?;
        Ok(ArticleDetail {
            id: raw.id,
            title: raw.title,
            body: raw.body,
            author_name: raw.author_v2.map(|author| author.name),
            blog_id: raw.blog.id,
            blog_title: raw.blog.title,
        })
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_article_detail_maps_author_and_blog() {
        let raw: RawArticleDetail = serde_json::from_value(json!({
            "id": "gid://shopify/Article/1",
            "title": "Hello",
            "body": "<p>World</p>",
            "authorV2": {"name": "Jamie"},
            "blog": {"id": "gid://shopify/Blog/1", "title": "News"}
        }))
        .unwrap();
        assert_eq!(raw.author_v2.unwrap().name, "Jamie");
        assert_eq!(raw.blog.title, "News");
    }

    #[test]
    fn test_raw_article_detail_tolerates_missing_author() {
        let raw: RawArticleDetail = serde_json::from_value(json!({
            "id": "gid://shopify/Article/2",
            "title": "Anon",
            "body": "",
            "authorV2": null,
            "blog": {"id": "gid://shopify/Blog/1", "title": "News"}
        }))
        .unwrap();
        assert!(raw.author_v2.is_none());
    }

    #[test]
    fn test_blog_articles_wrapper_unwraps_nodes() {
        let raw: RawBlogArticles = serde_json::from_value(json!({
            "articles": {"nodes": [
                {"id": "gid://shopify/Article/1", "title": "A", "body": ""},
                {"id": "gid://shopify/Article/2", "title": "B", "body": ""}
            ]}
        }))
        .unwrap();
        assert_eq!(raw.articles.nodes.len(), 2);
    }
}
