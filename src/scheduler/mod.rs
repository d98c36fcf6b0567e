//! # 批处理调度模块
//!
//! 提交脚本渲染与作业链提交。
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 使用
//! - 使用 `models/`, `utils/`
//! - 子模块: render, chain

pub mod chain;
pub mod render;

pub use chain::{
    submit_chain, ChainRequest, CommandSubmitter, DryRunSubmitter, Submitter,
};
pub use render::render;
