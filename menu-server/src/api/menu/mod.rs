//! Menu API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/menu | GET | 全部菜品 + 供应状态 |
//! | /api/menu | POST | 新建菜品 |
//! | /api/menu/categories | GET | 分类列表 |
//! | /api/menu/{id} | GET / PUT / DELETE | 单个菜品 |
//! | /api/menu/{id}/availability | PATCH | 手动上下架 |

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", menu_routes())
}

fn menu_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/categories", get(handler::list_categories))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/availability", patch(handler::set_availability))
}
