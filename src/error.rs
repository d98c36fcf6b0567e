//! # 统一错误处理模块
//!
//! 定义 gizmo-tools 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// gizmo-tools 统一错误类型
#[derive(Error, Debug)]
pub enum GizmoError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown site '{0}' (see `gizmo sites`)")]
    UnknownSite(String),

    // ─────────────────────────────────────────────────────────────
    // 序列化错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid site configuration: {0}")]
    SiteConfigError(#[from] serde_json::Error),
}

impl GizmoError {
    /// 由外部命令的 `spawn` 错误构造：区分命令不存在与其他 I/O 错误
    pub fn from_spawn(command: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            GizmoError::CommandNotFound {
                command: command.to_string(),
            }
        } else {
            GizmoError::CommandFailed {
                command: command.to_string(),
                stderr: err.to_string(),
            }
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, GizmoError>;
