//! # 文件读写工具
//!
//! 统一的错误映射，以及"写临时文件再重命名"的原子替换。
//!
//! ## 依赖关系
//! - 被 `makefile/`, `scheduler/chain.rs`, `commands/setup.rs` 使用
//! - 使用 `tempfile` crate

use crate::error::{GizmoError, Result};

use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// 读取文本文件；文件不存在时返回 `FileNotFound`
pub fn read_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(GizmoError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    fs::read_to_string(path).map_err(|e| GizmoError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 直接写入文件
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| GizmoError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 原子替换文件内容：在同一目录写临时文件后重命名覆盖目标
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let write_err = |e: std::io::Error| GizmoError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    // 保留原文件权限
    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), meta.permissions()).map_err(write_err)?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// 复制文件
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(GizmoError::FileNotFound {
            path: from.display().to_string(),
        });
    }
    fs::copy(from, to).map_err(|e| GizmoError::FileWriteError {
        path: to.display().to_string(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Makefile.systype");
        fs::write(&path, "old\n").unwrap();

        write_atomic(&path, "new\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");

        // 目录中不留临时文件
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_text(&dir.path().join("missing")),
            Err(GizmoError::FileNotFound { .. })
        ));
    }
}
