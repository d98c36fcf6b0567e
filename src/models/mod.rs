//! # 数据模型模块
//!
//! 定义作业链、站点配置等统一数据模型。
//!
//! ## 依赖关系
//! - 被 `scheduler/` 和 `commands/` 使用
//! - 子模块: job, site

pub mod job;
pub mod site;

pub use job::{ChainFailure, ChainReport, JobSpec, JobTemplate, RestartMode, SubmissionResult};
pub use site::SiteConfig;
