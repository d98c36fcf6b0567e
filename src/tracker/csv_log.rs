//! # 进度 CSV
//!
//! 表头在文件首次创建时由第一次读取到的键确定，之后固定不变；
//! 每行按表头顺序写出，缺失的键留空，多出的键丢弃。
//!
//! ## 依赖关系
//! - 被 `tracker/mod.rs` 使用
//! - 使用 `csv` crate

use super::parse::Record;
use crate::error::{GizmoError, Result};

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// 追加写入的进度 CSV
#[derive(Debug)]
pub struct ProgressCsv {
    path: PathBuf,
    header: Vec<String>,
}

impl ProgressCsv {
    /// 打开已有的 CSV 并读取表头；文件不存在或表头为空时返回 `None`
    pub fn open(path: &Path) -> Result<Option<ProgressCsv>> {
        if !path.exists() {
            return Ok(None);
        }
        let mut reader = csv::Reader::from_path(path)?;
        let header: Vec<String> = reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect();
        if header.iter().all(|h| h.is_empty()) {
            return Ok(None);
        }
        Ok(Some(ProgressCsv {
            path: path.to_path_buf(),
            header,
        }))
    }

    /// 以 `record` 的键为表头创建新 CSV
    pub fn create(path: &Path, record: &Record) -> Result<ProgressCsv> {
        if record.is_empty() {
            return Err(GizmoError::InvalidInput(format!(
                "no key/value pairs found to build the header of {}",
                path.display()
            )));
        }
        let header: Vec<String> = record.keys().cloned().collect();
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&header)?;
        writer.flush().map_err(|e| GizmoError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(ProgressCsv {
            path: path.to_path_buf(),
            header,
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// 按表头顺序追加一行
    pub fn append(&self, record: &Record) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| GizmoError::FileWriteError {
                path: self.path.display().to_string(),
                source: e,
            })?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        let row: Vec<&str> = self
            .header
            .iter()
            .map(|k| record.get(k).map(String::as_str).unwrap_or(""))
            .collect();
        writer.write_record(&row)?;
        writer.flush().map_err(|e| GizmoError::FileWriteError {
            path: self.path.display().to_string(),
            source: e,
        })?;
        Ok(())
    }
}
