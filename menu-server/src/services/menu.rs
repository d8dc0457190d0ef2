//! Menu Service - 菜品管理
//!
//! CRUD over the menu collection plus schedule evaluation for the public
//! listing. Every mutation rewrites the whole `menu.json`.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use shared::models::{MenuItem, MenuItemInput};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::availability::{Availability, evaluate};
use crate::store::RecordStore;
use crate::utils::validation::{MAX_REASON_LEN, validate_menu_input, validate_optional_text};
use crate::utils::{AppError, ErrorCode};

/// Menu service errors
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("{0}")]
    Validation(#[from] AppError),

    #[error("Menu item {0} not found")]
    NotFound(i64),

    #[error("Menu data file is damaged")]
    Corrupted,

    #[error("Failed to persist menu changes")]
    Persistence,
}

pub type MenuResult<T> = Result<T, MenuError>;

impl From<MenuError> for AppError {
    fn from(err: MenuError) -> Self {
        match err {
            MenuError::Validation(e) => e,
            MenuError::NotFound(id) => {
                AppError::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {id} not found"))
                    .with_detail("id", id)
            }
            MenuError::Corrupted => AppError::corrupted("Menu data file is damaged, fix or restore it"),
            MenuError::Persistence => AppError::storage("Failed to persist menu changes"),
        }
    }
}

/// Menu item as served to clients: stored fields + schedule evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemView {
    #[serde(flatten)]
    pub item: MenuItem,
    /// Manual toggle AND schedule
    pub visible: bool,
    pub availability: Availability,
}

impl MenuItemView {
    pub fn new(item: MenuItem, now: NaiveDateTime) -> Self {
        let availability = evaluate(item.schedule.as_ref(), now);
        Self {
            visible: item.available && availability.is_available,
            item,
            availability,
        }
    }
}

/// 菜品服务
#[derive(Debug)]
pub struct MenuService {
    store: Arc<RecordStore<Vec<MenuItem>>>,
    /// Serializes read-modify-write cycles
    mutation: Mutex<()>,
}

impl MenuService {
    pub fn new(store: Arc<RecordStore<Vec<MenuItem>>>) -> Self {
        Self {
            store,
            mutation: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &RecordStore<Vec<MenuItem>> {
        &self.store
    }

    /// All items, each annotated with its availability at `now` (local time).
    ///
    /// Nothing is filtered out; clients decide what to do with invisible items.
    pub async fn list_visible(&self, now: NaiveDateTime) -> Vec<MenuItemView> {
        self.store
            .read()
            .await
            .into_iter()
            .map(|item| MenuItemView::new(item, now))
            .collect()
    }

    pub async fn get(&self, id: i64) -> MenuResult<MenuItem> {
        self.store
            .read()
            .await
            .into_iter()
            .find(|item| item.id == id)
            .ok_or(MenuError::NotFound(id))
    }

    /// Distinct categories in first-seen order
    pub async fn list_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for item in self.store.read().await {
            if !categories.contains(&item.category) {
                categories.push(item.category);
            }
        }
        categories
    }

    pub async fn count(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn create(&self, input: MenuItemInput) -> MenuResult<MenuItem> {
        validate_menu_input(&input)?;

        let _guard = self.mutation.lock().await;
        let mut items = self.load_for_update().await?;

        // Reserved ids only grow, so this settles even if the file was edited by hand
        let mut id = self.store.reserve_id(&items);
        while items.iter().any(|item| item.id == id) {
            id = self.store.reserve_id(&items);
        }

        let item = MenuItem::from_input(id, input);
        items.push(item.clone());
        self.persist(&items).await?;

        tracing::info!(id, name = %item.name, "Menu item created");
        Ok(item)
    }

    /// Replace item `id` with `input`.
    ///
    /// With `keep_previous_image_if_omitted`, an input without `image` keeps
    /// the stored one; an empty string still clears it.
    pub async fn update(
        &self,
        id: i64,
        mut input: MenuItemInput,
        keep_previous_image_if_omitted: bool,
    ) -> MenuResult<MenuItem> {
        validate_menu_input(&input)?;

        let _guard = self.mutation.lock().await;
        let mut items = self.load_for_update().await?;
        let slot = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(MenuError::NotFound(id))?;

        if keep_previous_image_if_omitted && input.image.is_none() {
            input.image = slot.image.clone();
        }
        let item = MenuItem::from_input(id, input);
        *slot = item.clone();
        self.persist(&items).await?;

        tracing::info!(id, name = %item.name, "Menu item updated");
        Ok(item)
    }

    pub async fn delete(&self, id: i64) -> MenuResult<()> {
        let _guard = self.mutation.lock().await;
        let mut items = self.load_for_update().await?;
        let pos = items
            .iter()
            .position(|item| item.id == id)
            .ok_or(MenuError::NotFound(id))?;

        let removed = items.remove(pos);
        self.persist(&items).await?;

        tracing::info!(id, name = %removed.name, "Menu item deleted");
        Ok(())
    }

    /// Flip the manual availability toggle; everything else is left alone
    pub async fn set_availability(
        &self,
        id: i64,
        available: bool,
        reason: Option<String>,
    ) -> MenuResult<MenuItem> {
        validate_optional_text(&reason, "reason", MAX_REASON_LEN)?;

        let _guard = self.mutation.lock().await;
        let mut items = self.load_for_update().await?;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(MenuError::NotFound(id))?;

        item.available = available;
        item.unavailable_reason = if available {
            None
        } else {
            reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
        };
        let item = item.clone();
        self.persist(&items).await?;

        tracing::info!(id, available, "Menu item availability changed");
        Ok(item)
    }

    async fn load_for_update(&self) -> MenuResult<Vec<MenuItem>> {
        self.store.read_for_update().await.map_err(|e| {
            tracing::error!(error = %e, "Refusing to modify unreadable menu file");
            if e.is_corruption() {
                MenuError::Corrupted
            } else {
                MenuError::Persistence
            }
        })
    }

    async fn persist(&self, items: &Vec<MenuItem>) -> MenuResult<()> {
        if self.store.write(items).await {
            Ok(())
        } else {
            Err(MenuError::Persistence)
        }
    }
}
