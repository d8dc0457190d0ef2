use thiserror::Error;

/// 服务器启动 / 运行错误
///
/// 请求级错误走 [`AppError`](crate::utils::AppError)，这里只覆盖进程级故障。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
