//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use shared::models::{AvailabilityUpdate, MenuItem, MenuItemInput};

use crate::core::ServerState;
use crate::services::MenuItemView;
use crate::utils::{ApiResponse, AppResult};

#[derive(Debug, Serialize)]
pub struct ItemPayload {
    pub item: MenuItem,
}

#[derive(Debug, Serialize)]
pub struct ItemsPayload {
    pub items: Vec<MenuItemView>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesPayload {
    pub categories: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Drop items that are switched off or outside their schedule
    #[serde(default)]
    pub visible_only: bool,
}

/// GET /api/menu - 全部菜品 (含供应状态)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> ApiResponse<ItemsPayload> {
    let mut items = state.menu.list_visible(state.now()).await;
    if query.visible_only {
        items.retain(|view| view.visible);
    }
    ApiResponse::success(ItemsPayload { items })
}

/// GET /api/menu/categories - 分类列表 (首次出现顺序)
pub async fn list_categories(State(state): State<ServerState>) -> ApiResponse<CategoriesPayload> {
    let categories = state.menu.list_categories().await;
    ApiResponse::success(CategoriesPayload { categories })
}

/// GET /api/menu/{id} - 获取单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<ItemPayload>> {
    let item = state.menu.get(id).await?;
    Ok(ApiResponse::success(ItemPayload { item }))
}

/// POST /api/menu - 新建菜品
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<MenuItemInput>, JsonRejection>,
) -> AppResult<ApiResponse<ItemPayload>> {
    let Json(input) = payload?;
    let item = state.menu.create(input).await?;
    Ok(ApiResponse::success_with_message(
        "Menu item created",
        ItemPayload { item },
    ))
}

/// PUT /api/menu/{id} - 替换菜品 (未提供图片时保留原图)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    payload: Result<Json<MenuItemInput>, JsonRejection>,
) -> AppResult<ApiResponse<ItemPayload>> {
    let Json(input) = payload?;
    let item = state.menu.update(id, input, true).await?;
    Ok(ApiResponse::success_with_message(
        "Menu item updated",
        ItemPayload { item },
    ))
}

/// DELETE /api/menu/{id} - 删除菜品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    state.menu.delete(id).await?;
    Ok(ApiResponse::ok("Menu item deleted"))
}

/// PATCH /api/menu/{id}/availability - 手动上下架
pub async fn set_availability(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    payload: Result<Json<AvailabilityUpdate>, JsonRejection>,
) -> AppResult<ApiResponse<ItemPayload>> {
    let Json(payload) = payload?;
    let item = state
        .menu
        .set_availability(id, payload.available, payload.reason)
        .await?;
    let message = if item.available {
        "Menu item enabled"
    } else {
        "Menu item disabled"
    };
    Ok(ApiResponse::success_with_message(message, ItemPayload { item }))
}
