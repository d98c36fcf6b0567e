//! # setup 子命令 CLI 定义
//!
//! 为指定系统类型配置 GIZMO 源码目录
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/setup.rs`

use clap::Args;
use std::path::PathBuf;

/// setup 子命令参数
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Path to the GIZMO repository
    #[arg(long, default_value = "./")]
    pub repo_dir: PathBuf,

    /// System type (CITA_starq, SciNet, Frontera or an alias)
    #[arg(long, default_value = "CITA_starq")]
    pub systype: String,

    /// Directory holding per-system Makefile blocks and job scripts
    #[arg(long, default_value = "./system_setup_scripts")]
    pub scripts_dir: PathBuf,

    /// Line of the Makefile where the system block is inserted
    #[arg(long, default_value_t = crate::makefile::BLOCK_INSERT_LINE)]
    pub insert_line: usize,

    /// URL of the cooling tables archive
    #[arg(
        long,
        default_value = "http://www.tapir.caltech.edu/~phopkins/public/spcool_tables.tgz"
    )]
    pub cooling_url: String,

    /// Skip copying TREECOOL and downloading the cooling tables
    #[arg(long, default_value_t = false)]
    pub skip_cooling: bool,

    /// Skip copying the job submission scripts
    #[arg(long, default_value_t = false)]
    pub skip_scripts: bool,
}
