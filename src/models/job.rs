//! # 作业数据模型
//!
//! 描述单个批处理作业 (`JobSpec`)、整条作业链共享的参数 (`JobTemplate`)
//! 以及提交结果。
//!
//! ## 依赖关系
//! - 被 `scheduler/render.rs`, `scheduler/chain.rs` 使用
//! - 使用 `models/site.rs` 解析核数与分区

use crate::error::{GizmoError, Result};
use crate::models::site::SiteConfig;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// GIZMO 重启模式（可执行文件的第二个参数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum RestartMode {
    /// Resume from restart files (`1`)
    #[value(name = "1")]
    RestartFiles,
    /// Restart from a snapshot checkpoint (`2`)
    #[value(name = "2")]
    Snapshot,
}

impl RestartMode {
    /// 传给 GIZMO 的数值参数
    pub fn flag(self) -> u8 {
        match self {
            RestartMode::RestartFiles => 1,
            RestartMode::Snapshot => 2,
        }
    }
}

impl std::fmt::Display for RestartMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.flag())
    }
}

/// 作业链共享参数
#[derive(Debug, Clone)]
pub struct JobTemplate {
    /// 作业基础名
    pub job_name: String,
    /// GIZMO 参数文件
    pub param_file: String,
    pub restart: Option<RestartMode>,
    /// 新模拟：链中第一个作业不带重启参数
    pub new_sim: bool,
    pub nodes: u32,
    /// 显式指定的每节点核数，优先于站点默认值
    pub cores_per_node: Option<u32>,
    /// 分区 / 队列名
    pub partition: Option<String>,
    /// CPU 架构名
    pub arch: Option<String>,
    /// 墙钟时间（小时）
    pub wall_time_hours: Option<f64>,
    pub account: Option<String>,
}

impl Default for JobTemplate {
    fn default() -> Self {
        JobTemplate {
            job_name: "gizmo_sim".to_string(),
            param_file: "params.txt".to_string(),
            restart: None,
            new_sim: false,
            nodes: 1,
            cores_per_node: None,
            partition: None,
            arch: None,
            wall_time_hours: None,
            account: None,
        }
    }
}

impl JobTemplate {
    /// 第 `job_number` 个作业实际使用的重启模式
    pub fn restart_for(&self, job_number: u32) -> Option<RestartMode> {
        if self.new_sim && job_number == 1 {
            None
        } else {
            self.restart
        }
    }

    /// 结合站点配置生成链中第 `index` 个作业的 `JobSpec`
    pub fn job_spec(
        &self,
        site: &SiteConfig,
        index: u32,
        dependency: Option<String>,
    ) -> Result<JobSpec> {
        if self.job_name.trim().is_empty() {
            return Err(GizmoError::InvalidInput(
                "job name must be provided".to_string(),
            ));
        }
        if self.param_file.trim().is_empty() {
            return Err(GizmoError::InvalidInput(
                "parameter file must be provided".to_string(),
            ));
        }
        if self.nodes < 1 {
            return Err(GizmoError::InvalidInput(
                "number of nodes must be positive".to_string(),
            ));
        }
        if let Some(w) = self.wall_time_hours {
            if !w.is_finite() || w <= 0.0 {
                return Err(GizmoError::InvalidInput(format!(
                    "wall time must be a positive number of hours, got {}",
                    w
                )));
            }
        }

        let partition = self
            .partition
            .clone()
            .or_else(|| site.default_partition.clone());
        let arch = self.arch.clone().or_else(|| site.default_arch.clone());

        let partition_cfg = match &partition {
            Some(name) => Some(site.partition(name)?),
            None => None,
        };
        let arch_cfg = match &arch {
            Some(name) => Some(site.arch(name)?),
            None => None,
        };

        let cores_per_node = self
            .cores_per_node
            .or(arch_cfg.map(|a| a.cores_per_node))
            .or(partition_cfg.and_then(|p| p.cores_per_node))
            .or(site.cores_per_node)
            .ok_or_else(|| {
                GizmoError::InvalidInput(format!(
                    "site '{}' has no default cores per node; pass --cores-per-node",
                    site.name
                ))
            })?;
        if cores_per_node < 1 {
            return Err(GizmoError::InvalidInput(
                "number of cores per node must be positive".to_string(),
            ));
        }
        if self.nodes.checked_mul(cores_per_node).is_none() {
            return Err(GizmoError::InvalidInput(format!(
                "{} nodes x {} cores per node exceeds the supported core count",
                self.nodes, cores_per_node
            )));
        }

        Ok(JobSpec {
            index,
            job_name: self.job_name.clone(),
            param_file: self.param_file.clone(),
            restart: self.restart_for(index),
            nodes: self.nodes,
            cores_per_node,
            partition,
            constraint: arch_cfg.map(|a| a.constraint.clone()),
            wall_time_hours: self.wall_time_hours.or(site.default_wall_time),
            account: self.account.clone().or_else(|| site.account.clone()),
            dependency,
        })
    }
}

/// 单个批处理作业的完整描述
#[derive(Debug, Clone, PartialEq)]
pub struct JobSpec {
    /// 在作业链中的序号（从 1 开始）
    pub index: u32,
    pub job_name: String,
    pub param_file: String,
    pub restart: Option<RestartMode>,
    pub nodes: u32,
    pub cores_per_node: u32,
    pub partition: Option<String>,
    /// CPU 架构约束字符串（如 `ib-rome`）
    pub constraint: Option<String>,
    pub wall_time_hours: Option<f64>,
    pub account: Option<String>,
    /// 上游作业 ID
    pub dependency: Option<String>,
}

impl JobSpec {
    /// 总核数 = 节点数 × 每节点核数
    ///
    /// 构造时已校验不溢出；直接修改字段后溢出则取 `u32::MAX`。
    pub fn total_cores(&self) -> u32 {
        self.nodes.saturating_mul(self.cores_per_node)
    }

    /// 调度器中显示的作业名
    pub fn scheduler_name(&self) -> String {
        format!("{}_{}", self.job_name, self.index)
    }
}

/// 一次成功提交的结果
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResult {
    pub job_number: u32,
    /// 调度器分配的作业 ID
    pub job_id: String,
    pub script_path: PathBuf,
}

/// 作业链中断信息
#[derive(Debug)]
pub struct ChainFailure {
    pub job_number: u32,
    pub error: GizmoError,
}

/// 作业链提交报告
#[derive(Debug)]
pub struct ChainReport {
    pub submitted: Vec<SubmissionResult>,
    pub failure: Option<ChainFailure>,
}

impl ChainReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sim_drops_restart_on_first_job_only() {
        let template = JobTemplate {
            restart: Some(RestartMode::Snapshot),
            new_sim: true,
            ..JobTemplate::default()
        };
        assert_eq!(template.restart_for(1), None);
        assert_eq!(template.restart_for(2), Some(RestartMode::Snapshot));
        assert_eq!(template.restart_for(3), Some(RestartMode::Snapshot));
    }

    #[test]
    fn test_cores_per_node_resolution_order() {
        let site = SiteConfig::builtin("rusty").unwrap();

        // 架构默认值
        let spec = JobTemplate::default().job_spec(&site, 1, None).unwrap();
        assert_eq!(spec.cores_per_node, 128);
        assert_eq!(spec.constraint.as_deref(), Some("ib-rome"));
        assert_eq!(spec.partition.as_deref(), Some("cca"));

        // 显式指定优先
        let template = JobTemplate {
            cores_per_node: Some(48),
            arch: Some("genoa".to_string()),
            ..JobTemplate::default()
        };
        let spec = template.job_spec(&site, 1, None).unwrap();
        assert_eq!(spec.cores_per_node, 48);
        assert_eq!(spec.constraint.as_deref(), Some("ib-genoa"));
    }

    #[test]
    fn test_queue_sets_cores_per_node() {
        let site = SiteConfig::builtin("cita").unwrap();
        let template = JobTemplate {
            partition: Some("greenq".to_string()),
            nodes: 2,
            ..JobTemplate::default()
        };
        let spec = template.job_spec(&site, 1, None).unwrap();
        assert_eq!(spec.cores_per_node, 32);
        assert_eq!(spec.total_cores(), 64);
        assert_eq!(spec.wall_time_hours, Some(3.0));
    }

    #[test]
    fn test_rejects_invalid_templates() {
        let site = SiteConfig::builtin("niagara").unwrap();

        let zero_nodes = JobTemplate {
            nodes: 0,
            ..JobTemplate::default()
        };
        assert!(matches!(
            zero_nodes.job_spec(&site, 1, None),
            Err(GizmoError::InvalidInput(_))
        ));

        let zero_cores = JobTemplate {
            cores_per_node: Some(0),
            ..JobTemplate::default()
        };
        assert!(zero_cores.job_spec(&site, 1, None).is_err());

        let bad_wall = JobTemplate {
            wall_time_hours: Some(-1.0),
            ..JobTemplate::default()
        };
        assert!(bad_wall.job_spec(&site, 1, None).is_err());

        for w in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let non_finite = JobTemplate {
                wall_time_hours: Some(w),
                ..JobTemplate::default()
            };
            assert!(matches!(
                non_finite.job_spec(&site, 1, None),
                Err(GizmoError::InvalidInput(_))
            ));
        }

        let too_many_cores = JobTemplate {
            nodes: 200_000_000,
            ..JobTemplate::default()
        };
        assert!(matches!(
            too_many_cores.job_spec(&site, 1, None),
            Err(GizmoError::InvalidInput(_))
        ));

        let empty_name = JobTemplate {
            job_name: "  ".to_string(),
            ..JobTemplate::default()
        };
        assert!(empty_name.job_spec(&site, 1, None).is_err());

        let rusty = SiteConfig::builtin("rusty").unwrap();
        let bad_arch = JobTemplate {
            arch: Some("pentium".to_string()),
            ..JobTemplate::default()
        };
        assert!(matches!(
            bad_arch.job_spec(&rusty, 1, None),
            Err(GizmoError::InvalidInput(_))
        ));
    }
}
