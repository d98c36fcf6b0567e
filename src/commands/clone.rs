//! # clone 命令实现
//!
//! 将仓库别名解析为 git URL，并克隆到 `<dest>/<repo-name>`。
//!
//! ## 依赖关系
//! - 使用 `cli/clone.rs` 定义的参数
//! - 使用 `utils/command.rs`, `utils/output.rs`

use crate::cli::clone::CloneArgs;
use crate::error::{GizmoError, Result};
use crate::utils::{command, output};

use std::path::PathBuf;
use std::process::Command;

/// 已知仓库：(别名, URL)
const REPOSITORIES: &[(&[&str], &str)] = &[
    (
        &["gizmo_imf_sk", "imf", "sfire"],
        "git@bitbucket.org:shivankhullar/gizmo_imf_sk.git",
    ),
    (
        &["gizmo_public", "public"],
        "git@bitbucket.org:phopkins/gizmo-public.git",
    ),
];

/// 别名解析为 URL；含 `/` 或 `:` 的输入视为 URL 原样使用
pub fn resolve_repo_url(name: &str) -> Result<String> {
    let name = name.trim();
    if name.contains('/') || name.contains(':') {
        return Ok(name.to_string());
    }

    REPOSITORIES
        .iter()
        .find(|(aliases, _)| aliases.contains(&name))
        .map(|(_, url)| url.to_string())
        .ok_or_else(|| {
            let known: Vec<&str> = REPOSITORIES.iter().map(|(aliases, _)| aliases[0]).collect();
            GizmoError::InvalidInput(format!(
                "invalid repository name '{}' (valid: {})",
                name,
                known.join(", ")
            ))
        })
}

/// URL 的最后一段去掉 `.git` 后缀
pub fn repo_name_from_url(url: &str) -> Result<String> {
    let last = url
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or_default();
    let name = last.strip_suffix(".git").unwrap_or(last);

    if name.is_empty() {
        return Err(GizmoError::InvalidInput(format!(
            "cannot derive repository name from '{}'",
            url
        )));
    }
    Ok(name.to_string())
}

/// 执行 clone 命令
pub fn execute(args: CloneArgs) -> Result<()> {
    output::print_header("Clone GIZMO Repository");

    let url = resolve_repo_url(&args.repo_name)?;
    let name = repo_name_from_url(&url)?;
    let target: PathBuf = args.dest_dir.join(&name);

    if target.exists() {
        return Err(GizmoError::InvalidInput(format!(
            "destination {} already exists",
            target.display()
        )));
    }

    output::print_info(&format!("Cloning {} into {}", url, target.display()));
    command::run_inherited(Command::new("git").arg("clone").arg(&url).arg(&target))?;

    output::print_done(&format!("Cloned {} successfully", name));
    Ok(())
}
