//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] - 应用错误类型 (HTTP boundary)
//! - [`AppResponse`] - API 响应结构
//! - 日志等工具

pub mod error;
pub mod logger;

pub use error::{AppError, AppResponse, AppResult};
