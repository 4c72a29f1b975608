//! Navigation menu operations: fetch the store menu, replace its items, and
//! render an item tree for display.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::GraphqlDispatcher;
use crate::operations::{
    check_user_errors, decode, payload, require_field, traced, Connection, OperationError,
};

/// Hard cap on nesting depth when rendering menu items. Shopify menus nest at
/// most two levels; the cap guards against pathological input.
pub const MAX_RENDER_DEPTH: usize = 8;

const FIRST_MENU_QUERY: &str = r"
query FirstMenu {
  menus(first: 1) {
    edges {
      node {
        id
      }
    }
  }
}
";

const MENU_QUERY: &str = r"
query GetMenu($id: ID!) {
  menu(id: $id) {
    id
    title
    handle
    items {
      id
      title
      type
      url
      items {
        id
        title
        type
        url
      }
    }
  }
}
";

const MENU_UPDATE_MUTATION: &str = r"
mutation UpdateMenu($id: ID!, $title: String!, $handle: String!, $items: [MenuItemUpdateInput!]!) {
  menuUpdate(id: $id, title: $title, handle: $handle, items: $items) {
    menu {
      id
      handle
      items {
        id
        title
        items {
          id
          title
        }
      }
    }
    userErrors {
      message
      field
    }
  }
}
";

/// A menu with its (possibly nested) items.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Menu {
    pub id: String,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// A single menu entry. Shopify nests items one level deep in practice.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    /// Item type (e.g. `PAGE`, `FRONTPAGE`, `HTTP`).
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// Input for one item of [`update_menu`]. Replaces the menu's item tree
/// wholesale: any remote item not listed here is removed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemInput {
    /// Existing item ID, when updating in place rather than creating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    /// Item type (e.g. `PAGE`, `HTTP`).
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Resource the item points at, for typed items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<MenuItemInput>,
}

impl MenuItemInput {
    /// Creates a new top-level item pointing at a URL.
    #[must_use]
    pub fn link(title: impl Into<String>, item_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            item_type: item_type.into(),
            url: Some(url.into()),
            resource_id: None,
            items: Vec::new(),
        }
    }
}

/// The menu state echoed back by `menuUpdate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdatedMenu {
    pub id: String,
    pub handle: String,
    #[serde(default)]
    pub items: Vec<UpdatedMenuItem>,
}

/// A menu entry as echoed by `menuUpdate` (ID and title only).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdatedMenuItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<UpdatedMenuItem>,
}

#[derive(Debug, Deserialize)]
struct RawMenuId {
    id: String,
}

/// Fetches the store's first menu with its full item tree.
///
/// This is a two-step flow: the first dispatch resolves the menu's ID, the
/// second fetches the menu itself. When the store has no menus at all the
/// first step short-circuits and no second request is made.
///
/// # Errors
///
/// Returns [`OperationError::NotFound`] when the store has no menus, or when
/// the resolved ID no longer maps to a menu.
pub async fn get_menu(dispatcher: &GraphqlDispatcher) -> Result<Menu, OperationError> {
    traced("get_menu", async move {
        let envelope = dispatcher.dispatch(FIRST_MENU_QUERY, None).await?;
        let value = payload(&envelope, "menus")?;
        let connection: Connection<RawMenuId> = decode(value, "data.menus")?;
        let Some(first) = connection.into_nodes().into_iter().next() else {
            return Err(OperationError::not_found("no menus found in the store"));
        };

        let envelope = dispatcher
            .dispatch(MENU_QUERY, Some(json!({ "id": first.id })))
            .await?;
        let value = payload(&envelope, "menu")?;
        if value.is_null() {
            return Err(OperationError::not_found(
                "menu not found or could not be fetched",
            ));
        }
        decode(value, "data.menu")
    })
    .await
}

/// Replaces a menu's title, handle, and item tree via `menuUpdate`.
///
/// # Errors
///
/// Returns [`OperationError::Validation`] with every `userErrors` entry when
/// the update is rejected.
pub async fn update_menu(
    dispatcher: &GraphqlDispatcher,
    menu_id: &str,
    title: &str,
    handle: &str,
    items: Vec<MenuItemInput>,
) -> Result<UpdatedMenu, OperationError> {
    traced("update_menu", async move {
        let variables = json!({
            "id": menu_id,
            "title": title,
            "handle": handle,
            "items": items,
        });
        let envelope = dispatcher
            .dispatch(MENU_UPDATE_MUTATION, Some(variables))
            .await?;
        let value = payload(&envelope, "menuUpdate")?;
        check_user_errors(&value)?;
        let menu = require_field(&value, "menu", "data.menuUpdate.menu")?;
        decode(menu, "data.menuUpdate.menu")
    })
    .await
}

/// Renders a menu item tree as an indented bullet list.
///
/// Each line is `- {title} ({type}): {url}` with `N/A` standing in for a
/// missing URL. Indentation starts at two spaces and grows by two per level,
/// up to [`MAX_RENDER_DEPTH`]. An empty tree renders as `  - No items`.
#[must_use]
pub fn render_menu_items(items: &[MenuItem]) -> String {
    let mut lines = Vec::new();
    render_level(items, 1, &mut lines);
    if lines.is_empty() {
        return "  - No items".to_string();
    }
    lines.join("\n")
}

fn render_level(items: &[MenuItem], depth: usize, lines: &mut Vec<String>) {
    if depth > MAX_RENDER_DEPTH {
        return;
    }
    for item in items {
        let url = item.url.as_deref().unwrap_or("N/A");
        lines.push(format!(
            "{}- {} ({}): {}",
            "  ".repeat(depth),
            item.title,
            item.item_type,
            url
        ));
        if !item.items.is_empty() {
            render_level(&item.items, depth + 1, lines);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, url: Option<&str>, children: Vec<MenuItem>) -> MenuItem {
        MenuItem {
            id: format!("gid://shopify/MenuItem/{title}"),
            title: title.to_string(),
            item_type: "PAGE".to_string(),
            url: url.map(ToString::to_string),
            items: children,
        }
    }

    #[test]
    fn test_render_empty_tree() {
        assert_eq!(render_menu_items(&[]), "  - No items");
    }

    #[test]
    fn test_render_nested_items_indent_by_level() {
        let items = vec![
            item("Home", Some("/"), Vec::new()),
            item(
                "Catalog",
                Some("/collections/all"),
                vec![item("Sale", None, Vec::new())],
            ),
        ];
        let rendered = render_menu_items(&items);
        assert_eq!(
            rendered,
            "  - Home (PAGE): /\n  - Catalog (PAGE): /collections/all\n    - Sale (PAGE): N/A"
        );
    }

    #[test]
    fn test_render_stops_at_depth_cap() {
        let mut deepest = item("leaf", None, Vec::new());
        for i in 0..20 {
            deepest = item(&format!("level{i}"), None, vec![deepest]);
        }
        let rendered = render_menu_items(&[deepest]);
        assert_eq!(rendered.lines().count(), MAX_RENDER_DEPTH);
    }

    #[test]
    fn test_menu_item_input_omits_absent_optionals() {
        let input = MenuItemInput::link("Home", "FRONTPAGE", "/");
        let value = serde_json::to_value(&input).unwrap();
        assert!(value.get("id").is_none());
        assert!(value.get("resourceId").is_none());
        assert!(value.get("items").is_none());
        assert_eq!(value["type"], "FRONTPAGE");
    }

    #[test]
    fn test_menu_parses_nested_tree() {
        let menu: Menu = serde_json::from_value(json!({
            "id": "gid://shopify/Menu/1",
            "title": "Main menu",
            "handle": "main-menu",
            "items": [
                {
                    "id": "gid://shopify/MenuItem/1",
                    "title": "Home",
                    "type": "FRONTPAGE",
                    "url": "/",
                    "items": [
                        {"id": "gid://shopify/MenuItem/2", "title": "Sub", "type": "HTTP", "url": null, "items": []}
                    ]
                }
            ]
        }))
        .unwrap();
        assert_eq!(menu.items[0].items[0].title, "Sub");
        assert!(menu.items[0].items[0].url.is_none());
    }
}
