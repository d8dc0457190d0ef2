//! Data models
//!
//! Shared between menu-server and frontend (via API).
//! JSON field names are camelCase to match the persisted files.
//! All IDs are `i64`.

pub mod menu_item;
pub mod schedule;
pub mod serde_helpers;
pub mod settings;

// Re-exports
pub use menu_item::*;
pub use schedule::*;
pub use settings::{FilterCategory, KnobRange, Settings, SettingsUpdate};
