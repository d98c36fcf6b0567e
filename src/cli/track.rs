//! # track 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/track.rs`

use clap::Args;
use std::path::PathBuf;

/// track 子命令参数
#[derive(Args, Debug)]
pub struct TrackArgs {
    /// Path to the simulation output folder
    #[arg(long, default_value = "../output/")]
    pub out_dir: PathBuf,

    /// Log file to watch inside the output folder
    #[arg(long, default_value = "cpu.txt")]
    pub log_file: String,

    /// CSV file written inside the output folder
    #[arg(long, default_value = "progress.csv")]
    pub csv: String,

    /// Number of trailing log lines read on each change
    #[arg(long, default_value_t = crate::tracker::TAIL_LINES)]
    pub tail: usize,

    /// Polling interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub interval_ms: u64,
}
