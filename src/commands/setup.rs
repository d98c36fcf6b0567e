//! # setup 命令实现
//!
//! 为指定系统类型配置 GIZMO 源码目录。
//!
//! ## 步骤
//! 1. 修改 `Makefile.systype`，只保留目标系统类型
//! 2. 若 `Makefile` 中没有站点片段，则插入 `System_makefile.txt`
//! 3. 复制 `TREECOOL` 并下载、解压冷却表
//! 4. 复制站点作业脚本
//!
//! ## 依赖关系
//! - 使用 `cli/setup.rs` 定义的参数
//! - 使用 `makefile/`, `utils/command.rs`, `utils/fs.rs`, `utils/output.rs`
//! - 使用 `glob` 枚举站点脚本

use crate::cli::setup::SetupArgs;
use crate::error::{GizmoError, Result};
use crate::makefile::{self, EditOutcome, SystemType};
use crate::utils::{command, fs, output};

use std::path::{Path, PathBuf};
use std::process::Command;

/// 执行 setup 命令
pub fn execute(args: SetupArgs) -> Result<()> {
    output::print_header("GIZMO Setup");

    let system = SystemType::resolve(&args.systype)?;
    if !args.repo_dir.is_dir() {
        return Err(GizmoError::DirectoryNotFound {
            path: args.repo_dir.display().to_string(),
        });
    }
    let site_scripts = args.scripts_dir.join(system.scripts_dir);
    let block_file = site_scripts.join("System_makefile.txt");

    // 任何文件被修改之前确认所需输入都存在
    for required in [
        args.repo_dir.join("Makefile.systype"),
        args.repo_dir.join("Makefile"),
        block_file.clone(),
    ] {
        if !required.is_file() {
            return Err(GizmoError::FileNotFound {
                path: required.display().to_string(),
            });
        }
    }

    output::print_info(&format!("Repository: {}", args.repo_dir.display()));
    output::print_info(&format!("System type: {}", system.systype));
    output::print_separator();

    // 1. Makefile.systype
    let systype_file = args.repo_dir.join("Makefile.systype");
    match makefile::select_systype_in_file(&systype_file, system.systype)? {
        EditOutcome::Updated => output::print_success(&format!(
            "Makefile.systype now selects SYSTYPE=\"{}\"",
            system.systype
        )),
        EditOutcome::Unchanged => output::print_skip(&format!(
            "Makefile.systype already selects {}",
            system.systype
        )),
    }

    // 2. Makefile
    match makefile::insert_block_in_file(
        &args.repo_dir.join("Makefile"),
        &block_file,
        args.insert_line,
    )? {
        EditOutcome::Updated => output::print_success(&format!(
            "System block inserted into the Makefile at line {}",
            args.insert_line
        )),
        EditOutcome::Unchanged => {
            output::print_skip("Makefile already contains the system block")
        }
    }

    // 3. 冷却表
    if args.skip_cooling {
        output::print_skip("Cooling tables");
    } else {
        setup_cooling_tables(&args.repo_dir, &args.cooling_url)?;
    }

    // 4. 作业脚本
    if args.skip_scripts {
        output::print_skip("Job submission scripts");
    } else {
        let copied = copy_site_scripts(&site_scripts, &args.repo_dir)?;
        output::print_success(&format!(
            "Copied {} script(s) from {}",
            copied.len(),
            site_scripts.display()
        ));
    }

    output::print_separator();
    output::print_done("Setup completed");
    Ok(())
}

/// 下载 URL 对应的本地归档文件名
fn archive_name(url: &str) -> Result<&str> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && !name.contains(':'))
        .ok_or_else(|| GizmoError::InvalidInput(format!("cannot derive archive name from '{}'", url)))
}

/// 复制 TREECOOL，下载并解压冷却表，最后删除归档
fn setup_cooling_tables(repo_dir: &Path, url: &str) -> Result<()> {
    fs::copy_file(
        &repo_dir.join("cooling").join("TREECOOL"),
        &repo_dir.join("TREECOOL"),
    )?;
    output::print_success("Copied cooling/TREECOOL");

    let archive = repo_dir.join(archive_name(url)?);
    command::run_inherited(Command::new("wget").arg("-P").arg(repo_dir).arg(url))?;
    command::run_inherited(
        Command::new("tar")
            .arg("-xzvf")
            .arg(&archive)
            .arg("-C")
            .arg(repo_dir),
    )?;
    std::fs::remove_file(&archive).map_err(|e| GizmoError::FileWriteError {
        path: archive.display().to_string(),
        source: e,
    })?;

    output::print_success("Cooling tables downloaded and extracted");
    Ok(())
}

/// 将站点目录下的所有普通文件复制到源码目录
fn copy_site_scripts(site_scripts: &Path, repo_dir: &Path) -> Result<Vec<PathBuf>> {
    if !site_scripts.is_dir() {
        return Err(GizmoError::DirectoryNotFound {
            path: site_scripts.display().to_string(),
        });
    }

    let pattern = site_scripts.join("*");
    let pattern = pattern.to_string_lossy();

    let mut copied = Vec::new();
    for entry in glob::glob(&pattern)
        .map_err(|e| GizmoError::InvalidInput(format!("bad script pattern: {}", e)))?
        .filter_map(|e| e.ok())
        .filter(|p| p.is_file())
    {
        if let Some(name) = entry.file_name() {
            let target = repo_dir.join(name);
            fs::copy_file(&entry, &target)?;
            copied.push(target);
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_name() {
        assert_eq!(
            archive_name("http://www.tapir.caltech.edu/~phopkins/public/spcool_tables.tgz").unwrap(),
            "spcool_tables.tgz"
        );
        assert_eq!(archive_name("https://host/tables.tgz/").unwrap(), "tables.tgz");
        assert!(archive_name("file:").is_err());
    }

    #[test]
    fn test_copy_site_scripts_copies_regular_files() {
        let src = tempfile::tempdir().unwrap();
        let repo = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("System_makefile.txt"), "CC = mpicc\n").unwrap();
        std::fs::write(src.path().join("run.sh"), "#!/bin/bash\n").unwrap();
        std::fs::create_dir(src.path().join("nested")).unwrap();

        let mut copied = copy_site_scripts(src.path(), repo.path()).unwrap();
        copied.sort();

        assert_eq!(copied.len(), 2);
        assert_eq!(
            std::fs::read_to_string(repo.path().join("run.sh")).unwrap(),
            "#!/bin/bash\n"
        );
        assert!(!repo.path().join("nested").exists());
    }

    #[test]
    fn test_missing_block_file_leaves_checkout_untouched() {
        let repo = tempfile::tempdir().unwrap();
        let scripts = tempfile::tempdir().unwrap();
        let systype = repo.path().join("Makefile.systype");
        std::fs::write(&systype, "SYSTYPE=\"Frontera\"\n").unwrap();
        std::fs::write(repo.path().join("Makefile"), "all:\n").unwrap();

        let args = SetupArgs {
            repo_dir: repo.path().to_path_buf(),
            systype: "SciNet".to_string(),
            scripts_dir: scripts.path().to_path_buf(),
            insert_line: crate::makefile::BLOCK_INSERT_LINE,
            cooling_url: "http://localhost/spcool_tables.tgz".to_string(),
            skip_cooling: true,
            skip_scripts: true,
        };
        assert!(matches!(
            execute(args),
            Err(GizmoError::FileNotFound { .. })
        ));
        assert_eq!(
            std::fs::read_to_string(&systype).unwrap(),
            "SYSTYPE=\"Frontera\"\n"
        );
    }

    #[test]
    fn test_setup_edits_checkout_and_copies_scripts() {
        let repo = tempfile::tempdir().unwrap();
        let scripts = tempfile::tempdir().unwrap();
        let site = scripts.path().join("Niagara");
        std::fs::create_dir(&site).unwrap();
        std::fs::write(site.join("System_makefile.txt"), "CC = mpicc\n").unwrap();
        std::fs::write(site.join("job_submit_nia.py"), "print()\n").unwrap();
        std::fs::write(repo.path().join("Makefile.systype"), "SYSTYPE=\"Frontera\"\n").unwrap();
        std::fs::write(repo.path().join("Makefile"), "all:\n").unwrap();

        let args = SetupArgs {
            repo_dir: repo.path().to_path_buf(),
            systype: "nia".to_string(),
            scripts_dir: scripts.path().to_path_buf(),
            insert_line: crate::makefile::BLOCK_INSERT_LINE,
            cooling_url: "http://localhost/spcool_tables.tgz".to_string(),
            skip_cooling: true,
            skip_scripts: false,
        };
        execute(args).unwrap();

        assert!(std::fs::read_to_string(repo.path().join("Makefile.systype"))
            .unwrap()
            .ends_with("SYSTYPE=\"SciNet\"\n"));
        assert_eq!(
            std::fs::read_to_string(repo.path().join("Makefile")).unwrap(),
            "all:\nCC = mpicc\n"
        );
        assert!(repo.path().join("job_submit_nia.py").exists());
    }

    #[test]
    fn test_copy_site_scripts_missing_dir() {
        let repo = tempfile::tempdir().unwrap();
        assert!(matches!(
            copy_site_scripts(&repo.path().join("Niagara"), repo.path()),
            Err(GizmoError::DirectoryNotFound { .. })
        ));
    }
}
