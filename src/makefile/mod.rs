//! # Makefile 配置编辑模块
//!
//! 切换 `Makefile.systype` 中的系统类型，并向 `Makefile` 插入站点相关片段。
//! 所有修改先在内存中计算，再通过原子替换写回。
//!
//! ## 依赖关系
//! - 被 `commands/setup.rs` 使用
//! - 使用 `utils/fs.rs`
//! - 子模块: systype, block

pub mod block;
pub mod systype;

pub use block::{insert_block_in_file, BLOCK_INSERT_LINE};
pub use systype::{select_systype_in_file, SystemType};

/// 文件编辑结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// 已修改
    Updated,
    /// 文件已处于目标状态，未修改
    Unchanged,
}
