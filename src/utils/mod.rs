//! # 工具函数模块
//!
//! 提供美化输出、进度条、外部命令执行、原子文件写入等工具。
//!
//! ## 依赖关系
//! - 被 `commands/`, `scheduler/`, `makefile/`, `tracker/` 模块使用
//! - 子模块: command, fs, output, progress

pub mod command;
pub mod fs;
pub mod output;
pub mod progress;
