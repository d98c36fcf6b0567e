//! # gizmo-tools - GIZMO 模拟工作流工具箱
//!
//! 将 GIZMO 模拟相关的辅助脚本用 Rust 重构，统一成单一可执行文件。
//!
//! ## 子命令
//! - `submit` - 生成并提交相互依赖的作业链 (SLURM / PBS)
//! - `setup`  - 配置 GIZMO 源码目录 (Makefile.systype, Makefile, 冷却表, 作业脚本)
//! - `clone`  - 克隆 GIZMO 代码仓库
//! - `track`  - 跟踪 `cpu.txt` 并写入 `progress.csv`
//! - `sites`  - 列出内置站点配置
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── scheduler/ (作业脚本渲染与作业链提交)
//!   │     ├── makefile/  (Makefile 编辑)
//!   │     ├── tracker/   (进度跟踪)
//!   │     └── models/    (数据模型与站点配置)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod error;
mod makefile;
mod models;
mod scheduler;
mod tracker;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
