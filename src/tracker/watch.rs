//! # 日志文件修改检测
//!
//! 非递归地轮询单个文件的修改时间与长度。
//!
//! ## 依赖关系
//! - 被 `tracker/mod.rs` 使用

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stamp {
    modified: SystemTime,
    len: u64,
}

/// 单文件修改检测器
#[derive(Debug)]
pub struct FileWatcher {
    path: PathBuf,
    last: Option<Stamp>,
}

impl FileWatcher {
    /// 以文件当前状态为基线创建检测器
    pub fn new(path: &Path) -> Self {
        let mut watcher = FileWatcher {
            path: path.to_path_buf(),
            last: None,
        };
        watcher.last = watcher.stamp();
        watcher
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn stamp(&self) -> Option<Stamp> {
        let meta = fs::metadata(&self.path).ok()?;
        Some(Stamp {
            modified: meta.modified().ok()?,
            len: meta.len(),
        })
    }

    /// 自上次调用以来文件是否被修改（或新建）
    pub fn poll(&mut self) -> bool {
        let current = self.stamp();
        let changed = current.is_some() && current != self.last;
        self.last = current;
        changed
    }
}
