//! # Makefile 站点片段插入
//!
//! 若 `Makefile` 中尚未包含站点片段（`System_makefile.txt`，按连续行精确匹配），
//! 则在第 84 行插入。
//!
//! ## 依赖关系
//! - 被 `commands/setup.rs` 使用
//! - 使用 `utils/fs.rs` 原子写回

use super::EditOutcome;
use crate::error::Result;
use crate::utils::fs;

use std::path::Path;

/// 默认插入行号（从 1 开始）
pub const BLOCK_INSERT_LINE: usize = 84;

fn strip_eol(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// `haystack` 是否以连续行的形式包含 `needle`
fn contains_block(haystack: &[&str], needle: &[&str]) -> bool {
    needle.is_empty()
        || haystack.windows(needle.len()).any(|window| {
            window
                .iter()
                .zip(needle)
                .all(|(a, b)| strip_eol(a) == strip_eol(b))
        })
}

/// 计算插入片段后的内容；已包含时返回 `None`
///
/// `line` 超出文件长度时追加到末尾。
pub fn insert_block(content: &str, block: &str, line: usize) -> Option<String> {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let block_lines: Vec<&str> = block.split_inclusive('\n').collect();

    if contains_block(&lines, &block_lines) {
        return None;
    }

    let at = line.saturating_sub(1).min(lines.len());
    let mut out = String::with_capacity(content.len() + block.len() + 1);
    for l in &lines[..at] {
        out.push_str(l);
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(block);
    if !block.ends_with('\n') {
        out.push('\n');
    }
    for l in &lines[at..] {
        out.push_str(l);
    }
    Some(out)
}

/// 原地向 `Makefile` 插入片段文件的内容
pub fn insert_block_in_file(makefile: &Path, block_file: &Path, line: usize) -> Result<EditOutcome> {
    let block = fs::read_text(block_file)?;
    let content = fs::read_text(makefile)?;

    match insert_block(&content, &block, line) {
        Some(updated) => {
            fs::write_atomic(makefile, &updated)?;
            Ok(EditOutcome::Updated)
        }
        None => Ok(EditOutcome::Unchanged),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> String {
        (1..=n).map(|i| format!("line{}\n", i)).collect()
    }

    #[test]
    fn test_insert_at_line() {
        let content = numbered(5);
        let out = insert_block(&content, "ifeq ($(SYSTYPE),\"SciNet\")\nCC = mpicc\nendif\n", 3)
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "line1");
        assert_eq!(lines[1], "line2");
        assert_eq!(lines[2], "ifeq ($(SYSTYPE),\"SciNet\")");
        assert_eq!(lines[4], "endif");
        assert_eq!(lines[5], "line3");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_insert_past_end_appends() {
        let out = insert_block("a\nb", "X\nY", BLOCK_INSERT_LINE).unwrap();
        assert_eq!(out, "a\nb\nX\nY\n");
    }

    #[test]
    fn test_already_contained_is_noop() {
        let block = "CC = mpicc\nOPTIMIZE = -O2\n";
        let content = format!("{}{}{}", numbered(2), block, numbered(1));
        assert_eq!(insert_block(&content, block, 1), None);
    }

    #[test]
    fn test_scattered_lines_are_not_contained() {
        // 各行都存在但不连续，仍需插入
        let content = "CC = mpicc\nline\nOPTIMIZE = -O2\n";
        assert!(insert_block(content, "CC = mpicc\nOPTIMIZE = -O2\n", 1).is_some());
    }

    #[test]
    fn test_file_insert_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let makefile = dir.path().join("Makefile");
        let block_file = dir.path().join("System_makefile.txt");
        std::fs::write(&makefile, numbered(100)).unwrap();
        std::fs::write(&block_file, "ifeq ($(SYSTYPE),\"Frontera\")\nCC = mpicc\nendif\n").unwrap();

        assert_eq!(
            insert_block_in_file(&makefile, &block_file, BLOCK_INSERT_LINE).unwrap(),
            EditOutcome::Updated
        );
        let first = std::fs::read_to_string(&makefile).unwrap();
        assert_eq!(first.lines().nth(83), Some("ifeq ($(SYSTYPE),\"Frontera\")"));

        assert_eq!(
            insert_block_in_file(&makefile, &block_file, BLOCK_INSERT_LINE).unwrap(),
            EditOutcome::Unchanged
        );
        assert_eq!(std::fs::read_to_string(&makefile).unwrap(), first);
    }
}
