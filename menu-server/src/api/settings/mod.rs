//! Settings API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/settings | GET | 当前设置 |
//! | /api/settings | PUT | 部分更新 |
//! | /api/settings/defaults | GET | 默认设置 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/settings", settings_routes())
}

fn settings_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get).put(handler::update))
        .route("/defaults", get(handler::defaults))
}
