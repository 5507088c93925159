use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::{NewMenuItem, non_empty};

pub const MENU_URL: &str = "https://raw.githubusercontent.com/Meta-Mobile-Developer-PC/Working-With-Data-API/main/capstone.json";
pub const IMAGE_BASE_URL: &str =
    "https://github.com/Meta-Mobile-Developer-PC/Working-With-Data-API/blob/main/images";

/// Entries stay untyped so one malformed item cannot sink the whole document.
#[derive(Debug, Deserialize)]
pub struct MenuDocument {
    pub menu: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct RemoteMenuItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<RemotePrice>,
    pub image: Option<String>,
    pub category: Option<String>,
}

/// The feed has shipped prices both as numbers and as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RemotePrice {
    Number(f64),
    Text(String),
}

impl RemotePrice {
    fn value(&self) -> Option<f64> {
        let value = match self {
            RemotePrice::Number(n) => *n,
            RemotePrice::Text(s) => s.trim().trim_start_matches('$').parse().ok()?,
        };
        (value.is_finite() && value >= 0.0).then_some(value)
    }
}

#[must_use]
pub fn remote_item_to_menu_item(item: RemoteMenuItem) -> Option<NewMenuItem> {
    let name = non_empty(item.name)?;
    let category = non_empty(item.category)?;
    let price = item.price.as_ref().and_then(RemotePrice::value)?;

    Some(NewMenuItem {
        name,
        description: non_empty(item.description),
        price,
        image: item.image,
        category,
    })
}

/// Parse a menu document body, keeping only items that can be stored.
pub fn parse_menu_document(body: &str) -> Result<Vec<NewMenuItem>> {
    let doc: MenuDocument =
        serde_json::from_str(body).context("Failed to parse menu document")?;
    let total = doc.menu.len();

    let items: Vec<NewMenuItem> = doc
        .menu
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<RemoteMenuItem>(entry).ok())
        .filter_map(remote_item_to_menu_item)
        .collect();

    if items.len() < total {
        tracing::warn!(
            dropped = total - items.len(),
            total,
            "menu document contained incomplete or malformed items"
        );
    }
    Ok(items)
}

#[must_use]
pub fn image_url(image: &str) -> String {
    format!("{IMAGE_BASE_URL}/{image}?raw=true")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_item() -> RemoteMenuItem {
        RemoteMenuItem {
            name: Some("Greek Salad".to_string()),
            description: Some("The famous greek salad of crispy lettuce.".to_string()),
            price: Some(RemotePrice::Number(12.99)),
            image: Some("greekSalad.jpg".to_string()),
            category: Some("starters".to_string()),
        }
    }

    #[test]
    fn test_remote_item_to_menu_item_complete() {
        let item = remote_item_to_menu_item(full_item()).unwrap();
        assert_eq!(item.name, "Greek Salad");
        assert_eq!(
            item.description.as_deref(),
            Some("The famous greek salad of crispy lettuce.")
        );
        assert!((item.price - 12.99).abs() < f64::EPSILON);
        assert_eq!(item.image.as_deref(), Some("greekSalad.jpg"));
        assert_eq!(item.category, "starters");
    }

    #[test]
    fn test_remote_item_to_menu_item_missing_name() {
        let mut item = full_item();
        item.name = None;
        assert!(remote_item_to_menu_item(item).is_none());

        // Blank names are dropped too
        let mut item = full_item();
        item.name = Some("  ".to_string());
        assert!(remote_item_to_menu_item(item).is_none());
    }

    #[test]
    fn test_remote_item_to_menu_item_missing_category() {
        let mut item = full_item();
        item.category = None;
        assert!(remote_item_to_menu_item(item).is_none());
    }

    #[test]
    fn test_remote_item_to_menu_item_price() {
        let mut item = full_item();
        item.price = None;
        assert!(remote_item_to_menu_item(item).is_none());

        let mut item = full_item();
        item.price = Some(RemotePrice::Text("$7.50".to_string()));
        let parsed = remote_item_to_menu_item(item).unwrap();
        assert!((parsed.price - 7.5).abs() < f64::EPSILON);

        let mut item = full_item();
        item.price = Some(RemotePrice::Text("free".to_string()));
        assert!(remote_item_to_menu_item(item).is_none());

        let mut item = full_item();
        item.price = Some(RemotePrice::Number(-1.0));
        assert!(remote_item_to_menu_item(item).is_none());
    }

    #[test]
    fn test_remote_item_to_menu_item_minimal() {
        let item = RemoteMenuItem {
            name: Some("Lemon Dessert".to_string()),
            description: Some(String::new()),
            price: Some(RemotePrice::Number(5.0)),
            image: None,
            category: Some("desserts".to_string()),
        };
        let parsed = remote_item_to_menu_item(item).unwrap();
        assert!(parsed.description.is_none());
        assert!(parsed.image.is_none());
    }

    #[test]
    fn test_parse_menu_document() {
        let body = r#"{
            "menu": [
                {"name": "Greek Salad", "price": 12.99, "description": "Crispy lettuce", "image": "greekSalad.jpg", "category": "starters"},
                {"name": "Pasta", "price": "18.99", "description": "Penne", "image": "pasta.jpg", "category": "mains"},
                {"price": 5.0, "category": "desserts"}
            ]
        }"#;
        let items = parse_menu_document(body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Greek Salad");
        assert_eq!(items[1].name, "Pasta");
        assert!((items[1].price - 18.99).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_menu_document_skips_mistyped_items() {
        let body = r#"{
            "menu": [
                {"name": "Greek Salad", "price": 12.99, "category": "starters"},
                {"name": "Pasta", "price": true, "category": "mains"},
                {"name": 5, "price": 6.5, "category": "desserts"},
                "Lemon Dessert",
                {"name": "Bruschetta", "price": "7.99", "category": "starters"}
            ]
        }"#;
        let items = parse_menu_document(body).unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Greek Salad", "Bruschetta"]);
    }

    #[test]
    fn test_parse_menu_document_empty_menu() {
        let items = parse_menu_document(r#"{"menu": []}"#).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_parse_menu_document_malformed() {
        assert!(parse_menu_document("not json").is_err());
        // `menu` is required
        assert!(parse_menu_document(r#"{"items": []}"#).is_err());
        assert!(parse_menu_document(r#"{"menu": null}"#).is_err());
    }

    #[test]
    fn test_image_url() {
        assert_eq!(
            image_url("lemonDessert.jpg"),
            "https://github.com/Meta-Mobile-Developer-PC/Working-With-Data-API/blob/main/images/lemonDessert.jpg?raw=true"
        );
    }
}
