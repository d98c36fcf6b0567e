//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `models/`, `scheduler/`, `makefile/`, `tracker/`, `utils/`
//! - 子模块: submit, setup, clone, track, sites

pub mod clone;
pub mod setup;
pub mod sites;
pub mod submit;
pub mod track;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Submit(args) => submit::execute(args),
        Commands::Setup(args) => setup::execute(args),
        Commands::Clone(args) => clone::execute(args),
        Commands::Track(args) => track::execute(args),
        Commands::Sites(args) => sites::execute(args),
    }
}
