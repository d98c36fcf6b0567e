//! # 站点配置数据模型
//!
//! 每个 HPC 集群的固定常量（账户、模块加载、队列、CPU 架构等）作为数据描述，
//! 而非硬编码在脚本生成逻辑中。内置 Niagara / CITA / Rusty 三个站点，
//! 也可以从 JSON 文件加载自定义站点。
//!
//! ## 依赖关系
//! - 被 `models/job.rs`, `scheduler/render.rs`, `commands/` 使用
//! - 使用 `serde`, `serde_json`, `indexmap`

use crate::error::{GizmoError, Result};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 批处理调度器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerKind {
    Slurm,
    Pbs,
}

impl SchedulerKind {
    /// 指令行前缀
    pub fn directive_prefix(self) -> &'static str {
        match self {
            SchedulerKind::Slurm => "#SBATCH",
            SchedulerKind::Pbs => "#PBS",
        }
    }

    /// 依赖指令（不含前缀）
    pub fn dependency_directive(self, job_id: &str) -> String {
        match self {
            SchedulerKind::Slurm => format!("--dependency=afterany:{}", job_id),
            SchedulerKind::Pbs => format!("-W depend=afterany:{}", job_id),
        }
    }

    /// 默认提交命令
    pub fn submit_command(self) -> &'static str {
        match self {
            SchedulerKind::Slurm => "sbatch",
            SchedulerKind::Pbs => "qsub",
        }
    }
}

impl std::fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerKind::Slurm => write!(f, "SLURM"),
            SchedulerKind::Pbs => write!(f, "PBS"),
        }
    }
}

/// 分区 / 队列配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartitionConfig {
    /// 该队列的每节点核数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores_per_node: Option<u32>,
    /// 选择该分区时追加的指令（如抢占 QoS）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<String>,
}

/// CPU 架构配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchConfig {
    pub cores_per_node: u32,
    pub constraint: String,
}

/// 并行启动命令配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchConfig {
    #[serde(default = "default_executable")]
    pub executable: String,
    /// 多节点时附加给 mpirun 的参数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_node_args: Option<String>,
    /// stderr 重定向文件
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        LaunchConfig {
            executable: default_executable(),
            multi_node_args: None,
            stderr: None,
        }
    }
}

fn default_executable() -> String {
    "./GIZMO".to_string()
}

fn default_shell() -> String {
    "#!/bin/bash".to_string()
}

/// 站点配置
///
/// `directives` 中的模板支持以下占位符：
/// `{nodes}`, `{ppn}`, `{cores}`, `{name}`, `{account}`, `{walltime}`,
/// `{partition}`, `{constraint}`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub description: String,
    pub scheduler: SchedulerKind,
    /// 解释器行
    #[serde(default = "default_shell")]
    pub shell: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// 覆盖调度器默认的提交命令
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_command: Option<String>,
    /// 资源、作业名、输出文件等指令模板
    pub directives: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores_per_node: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_partition: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub partitions: IndexMap<String, PartitionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_arch: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub architectures: IndexMap<String, ArchConfig>,
    /// 默认墙钟时间（小时）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_wall_time: Option<f64>,
    /// 环境准备命令（模块加载、切换目录）
    #[serde(default)]
    pub setup: Vec<String>,
    /// 执行 `prep_restart.py` 之前的命令
    #[serde(default)]
    pub restart_prep: Vec<String>,
    #[serde(default)]
    pub launch: LaunchConfig,
}

impl SiteConfig {
    /// 按名称或别名查找内置站点（大小写不敏感）
    pub fn builtin(name: &str) -> Result<SiteConfig> {
        let wanted = name.to_lowercase();
        builtin_sites()
            .into_iter()
            .find(|s| {
                s.name.to_lowercase() == wanted
                    || s.aliases.iter().any(|a| a.to_lowercase() == wanted)
            })
            .ok_or_else(|| GizmoError::UnknownSite(name.to_string()))
    }

    /// 从 JSON 文件加载站点配置
    pub fn from_json_file(path: &Path) -> Result<SiteConfig> {
        let text = fs::read_to_string(path).map_err(|e| GizmoError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        let site: SiteConfig = serde_json::from_str(&text)?;
        site.check()?;
        Ok(site)
    }

    /// 序列化为 JSON（供 `gizmo sites --dump` 使用）
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 检查默认分区/架构是否存在于表中
    pub fn check(&self) -> Result<()> {
        if let Some(p) = &self.default_partition {
            self.partition(p)?;
        }
        if let Some(a) = &self.default_arch {
            self.arch(a)?;
        }
        Ok(())
    }

    pub fn partition(&self, name: &str) -> Result<&PartitionConfig> {
        self.partitions.get(name).ok_or_else(|| {
            GizmoError::InvalidInput(format!(
                "unknown partition '{}' for site '{}'{}",
                name,
                self.name,
                choices(self.partitions.keys())
            ))
        })
    }

    pub fn arch(&self, name: &str) -> Result<&ArchConfig> {
        self.architectures.get(name).ok_or_else(|| {
            GizmoError::InvalidInput(format!(
                "unknown CPU type '{}' for site '{}'{}",
                name,
                self.name,
                choices(self.architectures.keys())
            ))
        })
    }

    /// 实际使用的提交命令
    pub fn submit_command(&self) -> &str {
        self.submit_command
            .as_deref()
            .unwrap_or_else(|| self.scheduler.submit_command())
    }
}

fn choices<'a>(keys: impl Iterator<Item = &'a String>) -> String {
    let keys: Vec<&str> = keys.map(|k| k.as_str()).collect();
    if keys.is_empty() {
        " (site defines none)".to_string()
    } else {
        format!(" (valid: {})", keys.join(", "))
    }
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// 内置站点列表
pub fn builtin_sites() -> Vec<SiteConfig> {
    vec![niagara(), cita(), rusty()]
}

/// SciNet Niagara (SLURM, 40 核/节点)
fn niagara() -> SiteConfig {
    SiteConfig {
        name: "niagara".to_string(),
        aliases: lines(&["nia", "scinet", "scinet_niagara"]),
        description: "SciNet Niagara, SLURM, 40 cores per node".to_string(),
        scheduler: SchedulerKind::Slurm,
        shell: default_shell(),
        account: Some("rrg-matzner".to_string()),
        submit_command: None,
        directives: lines(&[
            "--account={account}",
            "--nodes={nodes}",
            "--ntasks-per-node={ppn}",
            "--time={walltime}",
            "--job-name={name}",
            "--output=mpi_output_%j.txt",
            "--mail-type=FAIL",
        ]),
        cores_per_node: Some(40),
        default_partition: None,
        partitions: IndexMap::new(),
        default_arch: None,
        architectures: IndexMap::new(),
        default_wall_time: Some(24.0),
        setup: lines(&[
            "cd $SLURM_SUBMIT_DIR",
            "cd ../",
            "module load intel intelmpi gsl hdf5 fftw",
        ]),
        restart_prep: lines(&["module load python", "jargon"]),
        launch: LaunchConfig::default(),
    }
}

/// CITA (PBS, 按队列决定每节点核数)
fn cita() -> SiteConfig {
    let mut partitions = IndexMap::new();
    for (queue, ppn) in [("starq", 128), ("greenq", 32), ("sandyq", 16), ("hpq", 16)] {
        partitions.insert(
            queue.to_string(),
            PartitionConfig {
                cores_per_node: Some(ppn),
                directives: vec![],
            },
        );
    }

    SiteConfig {
        name: "cita".to_string(),
        aliases: lines(&["cita_starq", "starq"]),
        description: "CITA cluster, PBS, cores per node set by queue".to_string(),
        scheduler: SchedulerKind::Pbs,
        shell: "#!/bin/bash -l".to_string(),
        account: None,
        submit_command: None,
        directives: lines(&[
            "-l nodes={nodes}:ppn={ppn}",
            "-l walltime={walltime}",
            "-r n",
            "-j oe",
            "-q {partition}",
            "-N {name}",
        ]),
        cores_per_node: None,
        default_partition: Some("starq".to_string()),
        partitions,
        default_arch: None,
        architectures: IndexMap::new(),
        default_wall_time: Some(3.0),
        setup: lines(&[
            "cd ${PBS_O_WORKDIR}",
            "module purge",
            "module load openmpi/4.1.6-gcc-ucx gsl/2.7.1 hdf5/1.12.1-ucx fftw/3.3.10-openmpi-ucx gcc/5.4.0",
            "export HDF5_DISABLE_VERSION_CHECK=1",
        ]),
        restart_prep: lines(&["module load python/3.10.2"]),
        launch: LaunchConfig {
            multi_node_args: Some("-map-by node:SPAN".to_string()),
            ..LaunchConfig::default()
        },
    }
}

/// Flatiron Rusty (SLURM, CPU 架构约束)
fn rusty() -> SiteConfig {
    let mut partitions = IndexMap::new();
    partitions.insert("cca".to_string(), PartitionConfig::default());
    partitions.insert(
        "preempt".to_string(),
        PartitionConfig {
            cores_per_node: None,
            directives: lines(&["--qos=preempt"]),
        },
    );

    let mut architectures = IndexMap::new();
    for (cpu, cores) in [
        ("genoa", 96),
        ("icelake", 64),
        ("rome", 128),
        ("skylake", 36),
        ("cascadelake", 96),
        ("cooperlake", 192),
    ] {
        architectures.insert(
            cpu.to_string(),
            ArchConfig {
                cores_per_node: cores,
                constraint: format!("ib-{}", cpu),
            },
        );
    }

    SiteConfig {
        name: "rusty".to_string(),
        aliases: vec![],
        description: "Flatiron Rusty, SLURM, CPU-architecture constraints".to_string(),
        scheduler: SchedulerKind::Slurm,
        shell: default_shell(),
        account: None,
        submit_command: None,
        directives: lines(&[
            "-N{nodes} -C {constraint} -p {partition}",
            "--job-name={name}",
        ]),
        cores_per_node: None,
        default_partition: Some("cca".to_string()),
        partitions,
        default_arch: Some("rome".to_string()),
        architectures,
        default_wall_time: None,
        setup: lines(&["module purge", "module load openmpi gsl fftw hdf5", "cd ../"]),
        restart_prep: vec![],
        launch: LaunchConfig {
            stderr: Some("gizmo.err".to_string()),
            ..LaunchConfig::default()
        },
    }
}
