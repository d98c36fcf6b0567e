//! # 外部命令执行
//!
//! 同步运行外部命令并捕获输出；非零退出码转换为 `CommandFailed`。
//!
//! ## 依赖关系
//! - 被 `scheduler/chain.rs`, `commands/setup.rs`, `commands/clone.rs` 使用

use crate::error::{GizmoError, Result};

use std::process::{Command, Output};

/// 命令的可读形式（用于错误信息）
pub fn describe(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().to_string()];
    parts.extend(cmd.get_args().map(|a| a.to_string_lossy().to_string()));
    parts.join(" ")
}

/// 运行命令并捕获 stdout/stderr，要求退出码为 0
pub fn run_captured(cmd: &mut Command) -> Result<Output> {
    let program = cmd.get_program().to_string_lossy().to_string();
    let out = cmd
        .output()
        .map_err(|e| GizmoError::from_spawn(&program, e))?;

    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
        return Err(GizmoError::CommandFailed {
            command: describe(cmd),
            stderr: if stderr.is_empty() {
                format!("exited with {}", out.status)
            } else {
                stderr
            },
        });
    }

    Ok(out)
}

/// 运行命令，输出直接继承到终端（用于 git clone, wget, tar 等）
pub fn run_inherited(cmd: &mut Command) -> Result<()> {
    let program = cmd.get_program().to_string_lossy().to_string();
    let status = cmd
        .status()
        .map_err(|e| GizmoError::from_spawn(&program, e))?;

    if !status.success() {
        return Err(GizmoError::CommandFailed {
            command: describe(cmd),
            stderr: format!("exited with {}", status),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program() {
        let err = run_captured(&mut Command::new("gizmo-tools-no-such-program")).unwrap_err();
        assert!(matches!(err, GizmoError::CommandNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit() {
        let err = run_captured(Command::new("sh").args(["-c", "echo boom >&2; exit 3"]))
            .unwrap_err();
        match err {
            GizmoError::CommandFailed { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout() {
        let out = run_captured(Command::new("sh").args(["-c", "echo Submitted batch job 7"]))
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "Submitted batch job 7");
    }
}
