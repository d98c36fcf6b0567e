//! # Makefile.systype 编辑
//!
//! 注释掉所有生效的配置行，然后追加 `SYSTYPE="<systype>"`。
//! 若目标系统类型已处于生效状态则不做任何修改（幂等）。
//!
//! ## 依赖关系
//! - 被 `commands/setup.rs` 使用
//! - 使用 `utils/fs.rs` 原子写回

use super::EditOutcome;
use crate::error::{GizmoError, Result};
use crate::utils::fs;

use std::path::Path;

/// GIZMO 支持的系统类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemType {
    /// 写入 `Makefile.systype` 的值
    pub systype: &'static str,
    /// 站点脚本目录名（`System_makefile.txt` 与作业脚本所在目录）
    pub scripts_dir: &'static str,
    aliases: &'static [&'static str],
}

const SYSTEM_TYPES: &[SystemType] = &[
    SystemType {
        systype: "CITA_starq",
        scripts_dir: "CITA_starq",
        aliases: &["cita_starq", "starq", "cita"],
    },
    SystemType {
        systype: "SciNet",
        scripts_dir: "Niagara",
        aliases: &["scinet_niagara", "scinet", "niagara", "nia"],
    },
    SystemType {
        systype: "Frontera",
        scripts_dir: "Frontera",
        aliases: &["frontera", "front"],
    },
];

impl SystemType {
    /// 解析系统类型名称或别名（大小写不敏感）
    pub fn resolve(name: &str) -> Result<SystemType> {
        let wanted = name.trim().to_lowercase();
        SYSTEM_TYPES
            .iter()
            .find(|t| t.systype.to_lowercase() == wanted || t.aliases.contains(&wanted.as_str()))
            .copied()
            .ok_or_else(|| {
                let known: Vec<&str> = SYSTEM_TYPES.iter().map(|t| t.systype).collect();
                GizmoError::InvalidInput(format!(
                    "unknown system type '{}' (valid: {})",
                    name,
                    known.join(", ")
                ))
            })
    }
}

/// 非空且非注释的行
fn is_active(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

/// 解析 `SYSTYPE="..."` 行的值
fn active_systype(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix("SYSTYPE")?;
    let value = rest.trim_start().strip_prefix('=')?;
    Some(value.trim().trim_matches('"'))
}

/// 计算新的 `Makefile.systype` 内容；已处于目标状态时返回 `None`
pub fn select_systype(content: &str, systype: &str) -> Option<String> {
    let already = content
        .lines()
        .filter(|l| is_active(l))
        .any(|l| active_systype(l) == Some(systype));
    if already {
        return None;
    }

    let mut out = String::with_capacity(content.len() + systype.len() + 16);
    for line in content.split_inclusive('\n') {
        if is_active(line) {
            out.push('#');
        }
        out.push_str(line);
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&format!("SYSTYPE=\"{}\"\n", systype));
    Some(out)
}

/// 原地修改 `Makefile.systype`
pub fn select_systype_in_file(path: &Path, systype: &str) -> Result<EditOutcome> {
    let content = fs::read_text(path)?;
    match select_systype(&content, systype) {
        Some(updated) => {
            fs::write_atomic(path, &updated)?;
            Ok(EditOutcome::Updated)
        }
        None => Ok(EditOutcome::Unchanged),
    }
}
