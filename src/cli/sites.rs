//! # sites 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/sites.rs`

use clap::Args;

/// sites 子命令参数
#[derive(Args, Debug)]
pub struct SitesArgs {
    /// Print the JSON configuration of one site (usable with `submit --site-file`)
    #[arg(long)]
    pub dump: Option<String>,
}
