//! # submit 子命令 CLI 定义
//!
//! 生成并提交 GIZMO 作业链到 SLURM / PBS
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/submit.rs`

use crate::models::RestartMode;

use clap::Args;
use std::path::PathBuf;

/// submit 子命令参数
#[derive(Args, Debug)]
pub struct SubmitArgs {
    // ─────────────────────────────────────────────────────────────
    // 站点
    // ─────────────────────────────────────────────────────────────
    /// Built-in site configuration (niagara, cita, rusty)
    #[arg(long, env = "GIZMO_SITE", default_value = "niagara")]
    pub site: String,

    /// Load the site configuration from a JSON file instead
    #[arg(long)]
    pub site_file: Option<PathBuf>,

    /// SLURM account (overrides the site default)
    #[arg(long, env = "GIZMO_ACCOUNT")]
    pub account: Option<String>,

    /// Submission command (overrides sbatch/qsub)
    #[arg(long, env = "GIZMO_SUBMIT_CMD")]
    pub submit_cmd: Option<String>,

    // ─────────────────────────────────────────────────────────────
    // 作业链
    // ─────────────────────────────────────────────────────────────
    /// Number of jobs to submit in the chain
    #[arg(long, default_value_t = 1)]
    pub num_jobs: u32,

    /// Parameter file for the GIZMO simulation
    #[arg(long, default_value = "params.txt")]
    pub param_file: String,

    /// Base name for the jobs
    #[arg(long, default_value = "gizmo_sim")]
    pub job_name: String,

    /// Restart mode passed to GIZMO (1 or 2)
    #[arg(long, value_enum)]
    pub restart: Option<RestartMode>,

    /// New simulation: the first job runs without the restart flag
    #[arg(long, default_value_t = false)]
    pub new_sim: bool,

    /// Job ID the first job in the chain depends on
    #[arg(long)]
    pub initial_dependency: Option<String>,

    // ─────────────────────────────────────────────────────────────
    // 资源
    // ─────────────────────────────────────────────────────────────
    /// Number of nodes to request
    #[arg(long, default_value_t = 1)]
    pub num_nodes: u32,

    /// Cores per node (default: from CPU type, queue or site)
    #[arg(long, visible_alias = "ppn")]
    pub cores_per_node: Option<u32>,

    /// Partition or queue
    #[arg(long, visible_alias = "queue")]
    pub partition: Option<String>,

    /// CPU architecture
    #[arg(long)]
    pub cpu_type: Option<String>,

    /// Wall time in hours
    #[arg(long)]
    pub wall_time: Option<f64>,

    // ─────────────────────────────────────────────────────────────
    // 执行控制
    // ─────────────────────────────────────────────────────────────
    /// Directory the generated scripts are written to
    #[arg(long, default_value = ".")]
    pub script_dir: PathBuf,

    /// Only generate job scripts, do not submit
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}
