//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义应用级 `AppError` 枚举，命令行入口统一返回 `Result<T, AppError>`，
//! 替代分散的 `.map_err(|e| e.to_string())` 与 `expect()`。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ImageError` 提供 `From` 转换，命令行入口直接使用 `?`。

use crate::editing::ImageError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 图片处理错误（探测 / 解码 / 缩放 / 保存）
    #[error("{0}")]
    Image(#[from] ImageError),

    /// 命令行参数不合法
    #[error("参数错误: {0}")]
    Usage(String),
}

impl AppError {
    /// 稳定错误码，沿用 `ImageError::code`。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Image(err) => err.code(),
            Self::Usage(_) => "usage",
        }
    }

    /// 进程退出码：参数错误 2，其余 1。
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Image(ImageError::InvalidArgument(_)) | Self::Usage(_) => 2,
            _ => 1,
        }
    }
}
