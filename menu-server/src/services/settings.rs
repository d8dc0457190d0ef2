//! Settings Service - 主题设置

use std::sync::Arc;

use shared::models::settings::{
    DESCRIPTION_SIZE, HEADING_SIZE, IMAGE_SIZE, ITEM_NAME_SIZE, KnobRange, PRICE_SIZE,
};
use shared::models::{FilterCategory, Settings, SettingsUpdate};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::store::RecordStore;
use crate::utils::validation::{MAX_CATEGORY_LEN, validate_hex_color, validate_required_text};
use crate::utils::{AppError, ErrorCode};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{0}")]
    Validation(#[from] AppError),

    #[error("Settings data file is damaged")]
    Corrupted,

    #[error("Failed to persist settings")]
    Persistence,
}

pub type SettingsResult<T> = Result<T, SettingsError>;

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Validation(e) => e,
            SettingsError::Corrupted => {
                AppError::corrupted("Settings data file is damaged, fix or restore it")
            }
            SettingsError::Persistence => AppError::storage("Failed to persist settings"),
        }
    }
}

#[derive(Debug)]
pub struct SettingsService {
    store: Arc<RecordStore<Settings>>,
    mutation: Mutex<()>,
}

impl SettingsService {
    pub fn new(store: Arc<RecordStore<Settings>>) -> Self {
        Self {
            store,
            mutation: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &RecordStore<Settings> {
        &self.store
    }

    /// Current settings, defaults when nothing has been saved yet
    pub async fn get(&self) -> Settings {
        self.store.read().await
    }

    pub fn defaults(&self) -> Settings {
        Settings::default()
    }

    /// Merge `update` into the stored settings.
    ///
    /// Size knobs are clamped into range rather than rejected. Colors must be
    /// hex. Filter categories are lowercased and de-duplicated (first wins),
    /// their order is kept.
    pub async fn update(&self, update: SettingsUpdate) -> SettingsResult<Settings> {
        for (value, field) in [
            (&update.primary_color, "primaryColor"),
            (&update.secondary_color, "secondaryColor"),
            (&update.text_color, "textColor"),
            (&update.accent_color, "accentColor"),
        ] {
            if let Some(color) = value {
                validate_hex_color(color, field)?;
            }
        }
        let filter_categories = update
            .filter_categories
            .map(normalize_filter_categories)
            .transpose()?;

        let _guard = self.mutation.lock().await;
        let mut settings = self.store.read_for_update().await.map_err(|e| {
            tracing::error!(error = %e, "Refusing to modify unreadable settings file");
            if e.is_corruption() {
                SettingsError::Corrupted
            } else {
                SettingsError::Persistence
            }
        })?;

        let colors = [
            (update.primary_color, &mut settings.primary_color),
            (update.secondary_color, &mut settings.secondary_color),
            (update.text_color, &mut settings.text_color),
            (update.accent_color, &mut settings.accent_color),
        ];
        for (value, slot) in colors {
            if let Some(color) = value {
                *slot = color;
            }
        }

        let knobs: [(Option<f64>, &mut f64, KnobRange); 5] = [
            (update.heading_size, &mut settings.heading_size, HEADING_SIZE),
            (update.item_name_size, &mut settings.item_name_size, ITEM_NAME_SIZE),
            (update.description_size, &mut settings.description_size, DESCRIPTION_SIZE),
            (update.price_size, &mut settings.price_size, PRICE_SIZE),
            (update.image_size, &mut settings.image_size, IMAGE_SIZE),
        ];
        for (value, slot, range) in knobs {
            if let Some(value) = value {
                *slot = range.clamp(value);
            }
        }

        if let Some(filter_categories) = filter_categories {
            settings.filter_categories = filter_categories;
        }

        if !self.store.write(&settings).await {
            return Err(SettingsError::Persistence);
        }

        tracing::info!(
            filter_categories = settings.filter_categories.len(),
            "Settings updated"
        );
        Ok(settings)
    }
}

/// Trim + lowercase keys, fill blank labels from the key, drop repeated keys
fn normalize_filter_categories(
    entries: Vec<FilterCategory>,
) -> Result<Vec<FilterCategory>, AppError> {
    let mut normalized: Vec<FilterCategory> = Vec::with_capacity(entries.len());
    for entry in entries {
        let category = entry.category.trim().to_lowercase();
        if category.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::InvalidFilterCategory,
                "filter category key must not be empty",
            ));
        }
        let label = match entry.label.trim() {
            "" => category.clone(),
            label => label.to_string(),
        };
        validate_required_text(&category, "filterCategories.category", MAX_CATEGORY_LEN)?;
        validate_required_text(&label, "filterCategories.label", MAX_CATEGORY_LEN)?;

        if normalized.iter().any(|existing| existing.category == category) {
            continue;
        }
        normalized.push(FilterCategory::new(category, label, entry.enabled));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_filter_categories() {
        let entries = vec![
            FilterCategory::new(" Starters ", "Starters", true),
            FilterCategory::new("mains", "", false),
            FilterCategory::new("STARTERS", "Duplicate", true),
        ];
        let normalized = normalize_filter_categories(entries).unwrap();
        assert_eq!(
            normalized,
            vec![
                FilterCategory::new("starters", "Starters", true),
                FilterCategory::new("mains", "mains", false),
            ]
        );
    }

    #[test]
    fn test_blank_filter_key_rejected() {
        let err = normalize_filter_categories(vec![FilterCategory::new("  ", "x", true)])
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFilterCategory);
    }

    #[test]
    fn test_error_maps_to_app_error() {
        let err: AppError = SettingsError::Persistence.into();
        assert_eq!(err.code, ErrorCode::StorageError);
        let err: AppError = SettingsError::Corrupted.into();
        assert_eq!(err.code, ErrorCode::StorageCorrupted);
    }
}
