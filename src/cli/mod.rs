//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `submit`: 生成并提交 GIZMO 作业链
//! - `setup`: 配置 GIZMO 源码目录（Makefile、冷却表、作业脚本）
//! - `clone`: 克隆 GIZMO 代码仓库
//! - `track`: 跟踪模拟进度并写入 CSV
//! - `sites`: 列出内置站点配置
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: submit, setup, clone, track, sites

pub mod clone;
pub mod setup;
pub mod sites;
pub mod submit;
pub mod track;

use clap::{Parser, Subcommand};

/// gizmo - GIZMO 模拟工作流工具箱
#[derive(Parser)]
#[command(name = "gizmo")]
#[command(author = "Shivan Khullar")]
#[command(version)]
#[command(about = "Build, job-chain submission and progress tracking utilities for GIZMO simulations", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Generate and submit a chain of dependent GIZMO jobs
    Submit(submit::SubmitArgs),

    /// Configure a GIZMO checkout for a system type
    Setup(setup::SetupArgs),

    /// Clone a GIZMO code repository
    Clone(clone::CloneArgs),

    /// Track simulation progress from cpu.txt into a CSV file
    Track(track::TrackArgs),

    /// List the built-in HPC site configurations
    Sites(sites::SitesArgs),
}
