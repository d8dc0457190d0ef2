//! Menu Item Model

use serde::{Deserialize, Serialize};

use super::schedule::Schedule;
use super::serde_helpers;

fn default_true() -> bool {
    true
}

/// Menu item entity (菜品)
///
/// Stored as one element of the menu JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Assigned by the store; missing or non-numeric ids read as 0
    #[serde(default, deserialize_with = "serde_helpers::flexible_id")]
    pub id: i64,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Inline image (data URL or raw base64)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Manual availability toggle, independent of `schedule`
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unavailable_reason: Option<String>,
    /// A schedule that is not an object reads as no schedule
    #[serde(
        default,
        deserialize_with = "serde_helpers::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub schedule: Option<Schedule>,
}

/// Create / replace menu item payload
///
/// Updates replace the stored item wholesale, so the same shape serves both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemInput {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub unavailable_reason: Option<String>,
    #[serde(default)]
    pub schedule: Option<Schedule>,
}

/// Availability toggle payload (one-click admin switch)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityUpdate {
    pub available: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

impl MenuItem {
    /// Build a stored item from validated input
    pub fn from_input(id: i64, input: MenuItemInput) -> Self {
        let available = input.available.unwrap_or(true);
        Self {
            id,
            name: input.name.trim().to_string(),
            category: input.category.trim().to_string(),
            description: input.description.unwrap_or_default().trim().to_string(),
            price: input.price,
            tags: input
                .tags
                .unwrap_or_default()
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            image: input.image.filter(|i| !i.is_empty()),
            available,
            unavailable_reason: if available {
                None
            } else {
                input.unavailable_reason.filter(|r| !r.trim().is_empty())
            },
            schedule: input.schedule.filter(|s| !s.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_sparse_json() {
        let item: MenuItem = serde_json::from_value(json!({
            "id": 4,
            "name": "Burger",
            "category": "mains",
            "price": 9.99
        }))
        .unwrap();
        assert_eq!(item.id, 4);
        assert!(item.available);
        assert!(item.tags.is_empty());
        assert!(item.schedule.is_none());
        assert_eq!(item.description, "");
    }

    #[test]
    fn test_non_numeric_id_reads_as_zero() {
        let item: MenuItem = serde_json::from_value(json!({
            "id": "oops",
            "name": "Soup",
            "category": "starters",
            "price": 4,
            "available": null
        }))
        .unwrap();
        assert_eq!(item.id, 0);
        assert!(item.available);
    }

    #[test]
    fn test_serializes_camel_case() {
        let item = MenuItem::from_input(
            1,
            MenuItemInput {
                name: " Burger ".into(),
                category: "mains".into(),
                price: 9.99,
                available: Some(false),
                unavailable_reason: Some("Sold out".into()),
                ..Default::default()
            },
        );
        let v = serde_json::to_value(&item).unwrap();
        assert_eq!(v["name"], "Burger");
        assert_eq!(v["unavailableReason"], "Sold out");
        assert!(v.get("image").is_none());
    }

    #[test]
    fn test_reason_dropped_when_available() {
        let item = MenuItem::from_input(
            2,
            MenuItemInput {
                name: "Fries".into(),
                category: "sides".into(),
                price: 3.0,
                unavailable_reason: Some("stale".into()),
                tags: Some(vec!["vegan".into(), "  ".into()]),
                ..Default::default()
            },
        );
        assert!(item.available);
        assert!(item.unavailable_reason.is_none());
        assert_eq!(item.tags, vec!["vegan".to_string()]);
    }
}
