//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`menu`] - 菜品管理接口
//! - [`settings`] - 主题设置接口
//!
//! Handlers are thin: they extract, call one service method and wrap the
//! result in [`ApiResponse`](crate::utils::ApiResponse).

pub mod health;
pub mod menu;
pub mod settings;

use axum::{Router, extract::DefaultBodyLimit, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::core::ServerState;

/// Request body limit: a 5 MiB inline image grows by a third when base64 encoded
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(menu::router())
        .merge(settings::router())
}

/// Router bound to `state`, with CORS, compression and access logging
pub fn build_router(state: ServerState) -> Router {
    build_app()
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
}
