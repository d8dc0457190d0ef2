//! Collection types that can live in a [`RecordStore`](super::RecordStore)

use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{MenuItem, Settings};
use std::fmt;

/// Expected top-level JSON shape of a collection file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Array,
    Object,
}

impl Shape {
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            Shape::Array => value.is_array(),
            Shape::Object => value.is_object(),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Array => write!(f, "array"),
            Shape::Object => write!(f, "object"),
        }
    }
}

/// A whole-file collection: the unit read and rewritten by a store
///
/// `Default` is the empty value persisted on first run.
pub trait Collection:
    Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static
{
    const SHAPE: Shape;

    /// Highest numeric record id, 0 for collections without ids
    fn max_id(&self) -> i64 {
        0
    }
}

impl Collection for Vec<MenuItem> {
    const SHAPE: Shape = Shape::Array;

    fn max_id(&self) -> i64 {
        self.iter().map(|item| item.id).max().unwrap_or(0).max(0)
    }
}

impl Collection for Settings {
    const SHAPE: Shape = Shape::Object;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shape_matches() {
        assert!(Shape::Array.matches(&json!([])));
        assert!(!Shape::Array.matches(&json!({})));
        assert!(Shape::Object.matches(&json!({})));
        assert!(!Shape::Object.matches(&json!(null)));
    }

    #[test]
    fn test_menu_max_id_treats_bad_ids_as_zero() {
        let items: Vec<MenuItem> = serde_json::from_value(json!([
            {"id": 3, "name": "a", "category": "c", "price": 1},
            {"id": "junk", "name": "b", "category": "c", "price": 1},
            {"name": "c", "category": "c", "price": 1},
            {"id": 11, "name": "d", "category": "c", "price": 1}
        ]))
        .unwrap();
        assert_eq!(items.max_id(), 11);
        assert_eq!(Vec::<MenuItem>::new().max_id(), 0);
        assert_eq!(Settings::default().max_id(), 0);
    }
}
