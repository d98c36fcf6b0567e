//! # clone 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/clone.rs`

use clap::Args;
use std::path::PathBuf;

/// clone 子命令参数
#[derive(Args, Debug)]
pub struct CloneArgs {
    /// Repository alias (gizmo_imf_sk, gizmo_public, ...) or a git URL
    #[arg(long, default_value = "gizmo_imf_sk")]
    pub repo_name: String,

    /// Destination directory
    #[arg(long, default_value = "./")]
    pub dest_dir: PathBuf,
}
