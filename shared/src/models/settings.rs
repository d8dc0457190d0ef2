//! Display Settings Model
//!
//! Theme colors, display size knobs and the category filter bar.

use serde::{Deserialize, Serialize};

/// Inclusive range and default of one display size knob
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl KnobRange {
    const fn new(min: f64, max: f64, default: f64) -> Self {
        Self { min, max, default }
    }

    /// Clamp into range; non-finite values fall back to the default
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_finite() {
            value.clamp(self.min, self.max)
        } else {
            self.default
        }
    }
}

pub const HEADING_SIZE: KnobRange = KnobRange::new(16.0, 72.0, 32.0);
pub const ITEM_NAME_SIZE: KnobRange = KnobRange::new(12.0, 48.0, 18.0);
pub const DESCRIPTION_SIZE: KnobRange = KnobRange::new(10.0, 32.0, 14.0);
pub const PRICE_SIZE: KnobRange = KnobRange::new(12.0, 48.0, 18.0);
pub const IMAGE_SIZE: KnobRange = KnobRange::new(40.0, 400.0, 120.0);

/// Display settings (主题设置)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub primary_color: String,
    pub secondary_color: String,
    pub text_color: String,
    pub accent_color: String,
    pub heading_size: f64,
    pub item_name_size: f64,
    pub description_size: f64,
    pub price_size: f64,
    pub image_size: f64,
    /// Category filter bar, in display order
    pub filter_categories: Vec<FilterCategory>,
}

/// Category filter entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCategory {
    /// Lowercase key matched against `MenuItem::category`
    pub category: String,
    /// Display label
    pub label: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Partial settings update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub text_color: Option<String>,
    pub accent_color: Option<String>,
    pub heading_size: Option<f64>,
    pub item_name_size: Option<f64>,
    pub description_size: Option<f64>,
    pub price_size: Option<f64>,
    pub image_size: Option<f64>,
    pub filter_categories: Option<Vec<FilterCategory>>,
}

fn default_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            primary_color: "#2c3e50".to_string(),
            secondary_color: "#ecf0f1".to_string(),
            text_color: "#333333".to_string(),
            accent_color: "#e74c3c".to_string(),
            heading_size: HEADING_SIZE.default,
            item_name_size: ITEM_NAME_SIZE.default,
            description_size: DESCRIPTION_SIZE.default,
            price_size: PRICE_SIZE.default,
            image_size: IMAGE_SIZE.default,
            filter_categories: Vec::new(),
        }
    }
}

impl FilterCategory {
    pub fn new(category: impl Into<String>, label: impl Into<String>, enabled: bool) -> Self {
        Self {
            category: category.into(),
            label: label.into(),
            enabled,
        }
    }
}
