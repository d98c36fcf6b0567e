//! # submit 命令实现
//!
//! 生成并提交 GIZMO 作业链。
//!
//! ## 功能
//! - 加载内置或 JSON 站点配置
//! - 在任何副作用之前校验参数
//! - 逐个渲染、写出并提交作业，依赖关系串联
//! - 可选只生成脚本不提交
//!
//! ## 依赖关系
//! - 使用 `cli/submit.rs` 定义的参数
//! - 使用 `scheduler/`, `models/`, `utils/output.rs`, `utils/progress.rs`

use crate::cli::submit::SubmitArgs;
use crate::error::{GizmoError, Result};
use crate::models::{ChainReport, JobTemplate, SiteConfig};
use crate::scheduler::{
    render, submit_chain, ChainRequest, CommandSubmitter, DryRunSubmitter, Submitter,
};
use crate::utils::{output, progress};

use std::fs;
use tabled::{Table, Tabled};

/// 提交结果表格行
#[derive(Debug, Clone, Tabled)]
struct SubmittedRow {
    #[tabled(rename = "Job")]
    job: String,
    #[tabled(rename = "Job ID")]
    job_id: String,
    #[tabled(rename = "Script")]
    script: String,
}

/// 执行 submit 命令
pub fn execute(args: SubmitArgs) -> Result<()> {
    output::print_header("GIZMO Job Chain Submission");

    let site = load_site(&args)?;
    let template = build_template(&args);

    let request = ChainRequest {
        num_jobs: args.num_jobs,
        template: &template,
        initial_dependency: args.initial_dependency.clone(),
        site: &site,
        script_dir: &args.script_dir,
    };

    // 在创建目录和写文件之前完成全部校验
    request.validate_inputs()?;
    let preview = template.job_spec(&site, 1, args.initial_dependency.clone())?;
    let script = render(&preview, &site)?;

    output::print_info(&format!(
        "Site: {} ({}, submit with '{}')",
        site.name,
        site.scheduler,
        site.submit_command()
    ));
    if let Some(partition) = &preview.partition {
        output::print_info(&format!("Partition: {}", partition));
    }
    if let Some(constraint) = &preview.constraint {
        output::print_info(&format!("Constraint: {}", constraint));
    }
    output::print_info(&format!(
        "Cores per node: {}, total cores requested: {}",
        preview.cores_per_node,
        preview.total_cores()
    ));
    output::print_info(&format!(
        "{} scheduler directives per job",
        script.directives(site.scheduler.directive_prefix()).count()
    ));
    if let Some(launch) = script.launch_line() {
        output::print_info(&format!("Launch: {}", launch));
    }
    if args.num_jobs > 1 && template.restart.is_none() {
        output::print_warning(
            "No --restart mode given: every job in the chain will start without a restart flag",
        );
    }

    if !args.script_dir.exists() {
        fs::create_dir_all(&args.script_dir).map_err(|e| GizmoError::FileWriteError {
            path: args.script_dir.display().to_string(),
            source: e,
        })?;
    }

    let report = if args.dry_run {
        output::print_info("Dry run: scripts are written but not submitted");
        println!();
        for line in script.lines() {
            println!("    {}", line);
        }
        println!();
        run_chain(&request, &mut DryRunSubmitter::default())?
    } else {
        run_chain(
            &request,
            &mut CommandSubmitter::new(site.submit_command()),
        )?
    };

    print_report(&template, &report);

    output::print_separator();
    if report.is_complete() {
        output::print_done(&format!("Submitted {} jobs", report.submitted.len()));
        return Ok(());
    }

    let submitted = report.submitted.len();
    match report.failure {
        Some(failure) => {
            output::print_warning(&format!(
                "Chain stopped at job {}: {} of {} jobs submitted, the rest must be resubmitted manually",
                failure.job_number, submitted, args.num_jobs
            ));
            Err(failure.error)
        }
        None => Ok(()),
    }
}

/// 加载站点配置并应用命令行覆盖项
fn load_site(args: &SubmitArgs) -> Result<SiteConfig> {
    let mut site = match &args.site_file {
        Some(path) => SiteConfig::from_json_file(path)?,
        None => SiteConfig::builtin(&args.site)?,
    };
    if let Some(cmd) = &args.submit_cmd {
        site.submit_command = Some(cmd.clone());
    }
    Ok(site)
}

fn build_template(args: &SubmitArgs) -> JobTemplate {
    JobTemplate {
        job_name: args.job_name.clone(),
        param_file: args.param_file.clone(),
        restart: args.restart,
        new_sim: args.new_sim,
        nodes: args.num_nodes,
        cores_per_node: args.cores_per_node,
        partition: args.partition.clone(),
        arch: args.cpu_type.clone(),
        wall_time_hours: args.wall_time,
        account: args.account.clone(),
    }
}

fn run_chain<S: Submitter>(request: &ChainRequest<'_>, submitter: &mut S) -> Result<ChainReport> {
    let pb = progress::create_progress_bar(request.num_jobs as u64, "Submitting");
    let job_name = &request.template.job_name;

    let report = submit_chain(request, submitter, |result| {
        pb.suspend(|| {
            output::print_submission(
                &format!("{}_{}", job_name, result.job_number),
                &result.job_id,
            );
        });
        pb.inc(1);
    });

    pb.finish_and_clear();
    report
}

fn print_report(template: &JobTemplate, report: &ChainReport) {
    if report.submitted.is_empty() {
        return;
    }

    let rows: Vec<SubmittedRow> = report
        .submitted
        .iter()
        .map(|r| SubmittedRow {
            job: format!("{}_{}", template.job_name, r.job_number),
            job_id: r.job_id.clone(),
            script: r.script_path.display().to_string(),
        })
        .collect();

    println!("\n{}\n", Table::new(rows));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dry_run_args(script_dir: std::path::PathBuf) -> SubmitArgs {
        SubmitArgs {
            site: "niagara".to_string(),
            site_file: None,
            account: None,
            submit_cmd: None,
            num_jobs: 2,
            param_file: "params.txt".to_string(),
            job_name: "gizmo_sim".to_string(),
            restart: None,
            new_sim: false,
            initial_dependency: None,
            num_nodes: 1,
            cores_per_node: None,
            partition: None,
            cpu_type: None,
            wall_time: None,
            script_dir,
            dry_run: true,
        }
    }

    #[test]
    fn test_rejected_input_creates_no_script_dir() {
        let dir = tempfile::tempdir().unwrap();
        let script_dir = dir.path().join("scripts");

        let mut args = dry_run_args(script_dir.clone());
        args.initial_dependency = Some(String::new());
        assert!(matches!(execute(args), Err(GizmoError::InvalidInput(_))));
        assert!(!script_dir.exists());

        let mut args = dry_run_args(script_dir.clone());
        args.num_jobs = 0;
        assert!(execute(args).is_err());
        assert!(!script_dir.exists());
    }

    #[test]
    fn test_dry_run_creates_script_dir_and_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let script_dir = dir.path().join("scripts");

        execute(dry_run_args(script_dir.clone())).unwrap();
        assert_eq!(std::fs::read_dir(&script_dir).unwrap().count(), 2);
    }
}
