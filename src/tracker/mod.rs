//! # 模拟进度跟踪模块
//!
//! 监视输出目录中的 `cpu.txt`，每次修改时读取末尾若干行并向 `progress.csv`
//! 追加一行。所有写入都在同一个轮询线程中完成。
//!
//! ## 依赖关系
//! - 被 `commands/track.rs` 使用
//! - 使用 `utils/fs.rs`, `chrono`
//! - 子模块: parse, csv_log, watch

pub mod csv_log;
pub mod parse;
pub mod watch;

pub use csv_log::ProgressCsv;
pub use parse::{parse_lines, tail, Record, TAIL_LINES};
pub use watch::FileWatcher;

use crate::error::Result;
use crate::utils::fs;

use std::path::{Path, PathBuf};

/// 一次轮询的结果
#[derive(Debug)]
pub enum PollEvent {
    /// 日志无变化
    Idle,
    /// 首次创建 CSV（仅写表头）
    Initialized { columns: usize },
    /// 追加了一行
    Appended(Record),
}

/// 进度跟踪器
pub struct Tracker {
    watcher: FileWatcher,
    csv_path: PathBuf,
    csv: Option<ProgressCsv>,
    tail_lines: usize,
}

impl Tracker {
    /// 创建跟踪器；日志已存在而 CSV 不存在时立即用当前日志内容确定表头
    pub fn new(log_path: &Path, csv_path: &Path, tail_lines: usize) -> Result<(Tracker, PollEvent)> {
        let mut tracker = Tracker {
            watcher: FileWatcher::new(log_path),
            csv_path: csv_path.to_path_buf(),
            csv: ProgressCsv::open(csv_path)?,
            tail_lines,
        };

        let mut event = PollEvent::Idle;
        if tracker.csv.is_none() && log_path.exists() {
            let record = tracker.read_record()?;
            if !record.is_empty() {
                let csv = ProgressCsv::create(csv_path, &record)?;
                event = PollEvent::Initialized {
                    columns: csv.header().len(),
                };
                tracker.csv = Some(csv);
            }
        }

        Ok((tracker, event))
    }

    pub fn log_path(&self) -> &Path {
        self.watcher.path()
    }

    fn read_record(&self) -> Result<Record> {
        let content = fs::read_text(self.watcher.path())?;
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Ok(parse_lines(&tail(&content, self.tail_lines), &now))
    }

    /// 检查一次日志；有修改时追加一行
    pub fn poll(&mut self) -> Result<PollEvent> {
        if !self.watcher.poll() {
            return Ok(PollEvent::Idle);
        }

        let record = self.read_record()?;
        if record.is_empty() {
            return Ok(PollEvent::Idle);
        }

        if self.csv.is_none() {
            self.csv = Some(ProgressCsv::create(&self.csv_path, &record)?);
        }
        if let Some(csv) = &self.csv {
            csv.append(&record)?;
        }
        Ok(PollEvent::Appended(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST: &str = "\
Step 1, Time: 0.01, CPUs: 40
total 0.50 100.0%
treegrav 0.13 25.0%
";

    #[test]
    fn test_header_from_existing_log_then_rows_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("cpu.txt");
        let csv = dir.path().join("progress.csv");
        std::fs::write(&log, FIRST).unwrap();

        let (mut tracker, event) = Tracker::new(&log, &csv, TAIL_LINES).unwrap();
        assert!(matches!(event, PollEvent::Initialized { columns: 4 }));
        assert!(matches!(tracker.poll().unwrap(), PollEvent::Idle));

        std::fs::write(&log, format!("{}Step 2, Time: 0.02, CPUs: 40\ntotal 0.75 100.0%\n", FIRST))
            .unwrap();
        match tracker.poll().unwrap() {
            PollEvent::Appended(record) => assert_eq!(record["Simulation Time"], "0.02"),
            other => panic!("unexpected event: {other:?}"),
        }

        let text = std::fs::read_to_string(&csv).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Simulation Time,Real World Time,total,treegrav")
        );
        let row: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(row[0], "0.02");
        assert_eq!(row[2], "0.75");
        assert_eq!(row[3], "0.13");
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_log_created_after_start() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("cpu.txt");
        let csv = dir.path().join("progress.csv");

        let (mut tracker, event) = Tracker::new(&log, &csv, TAIL_LINES).unwrap();
        assert!(matches!(event, PollEvent::Idle));
        assert!(!csv.exists());

        std::fs::write(&log, FIRST).unwrap();
        assert!(matches!(tracker.poll().unwrap(), PollEvent::Appended(_)));

        let text = std::fs::read_to_string(&csv).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_existing_csv_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("cpu.txt");
        let csv = dir.path().join("progress.csv");
        std::fs::write(&csv, "total\n0.1\n").unwrap();

        let (mut tracker, event) = Tracker::new(&log, &csv, TAIL_LINES).unwrap();
        assert!(matches!(event, PollEvent::Idle));

        std::fs::write(&log, FIRST).unwrap();
        tracker.poll().unwrap();
        assert_eq!(std::fs::read_to_string(&csv).unwrap(), "total\n0.1\n0.50\n");
    }

    #[test]
    fn test_empty_csv_is_rebuilt_from_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("cpu.txt");
        let csv = dir.path().join("progress.csv");
        std::fs::write(&csv, "").unwrap();
        std::fs::write(&log, FIRST).unwrap();

        let (_tracker, event) = Tracker::new(&log, &csv, TAIL_LINES).unwrap();
        assert!(matches!(event, PollEvent::Initialized { columns: 4 }));
        assert_eq!(
            std::fs::read_to_string(&csv).unwrap(),
            "Simulation Time,Real World Time,total,treegrav\n"
        );
    }
}
