//! # 作业链提交
//!
//! 依次渲染、写出并提交 N 个作业，每个作业依赖上一个作业的调度器 ID。
//! 任一提交失败立即终止整条链：不重试，也不撤销已提交的作业。
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 调用
//! - 使用 `scheduler/render.rs`, `utils/command.rs`, `utils/fs.rs`
//! - 使用 `chrono` 生成脚本文件时间戳

use crate::error::{GizmoError, Result};
use crate::models::{ChainFailure, ChainReport, JobTemplate, SiteConfig, SubmissionResult};
use crate::scheduler::render::render;
use crate::utils::{command, fs};

use std::path::{Path, PathBuf};
use std::process::Command;

/// 批处理提交接口
pub trait Submitter {
    /// 提交脚本，成功时返回调度器的标准输出
    fn submit(&mut self, script: &Path) -> Result<String>;
}

/// 调用外部提交命令（sbatch / qsub）
pub struct CommandSubmitter {
    program: String,
}

impl CommandSubmitter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Submitter for CommandSubmitter {
    fn submit(&mut self, script: &Path) -> Result<String> {
        let out = command::run_captured(Command::new(&self.program).arg(script))?;
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

/// 只写脚本不提交，返回占位 ID
#[derive(Default)]
pub struct DryRunSubmitter {
    count: u32,
}

impl Submitter for DryRunSubmitter {
    fn submit(&mut self, _script: &Path) -> Result<String> {
        self.count += 1;
        Ok(format!("Dry run DRYRUN-{}", self.count))
    }
}

/// 从提交命令输出中解析作业 ID：取最后一个空白分隔的 token
pub fn parse_job_id(stdout: &str) -> Option<&str> {
    stdout.split_whitespace().last()
}

/// 脚本文件名 `{job_name}_job_{n}_{timestamp}.sh`，时间戳精确到微秒
pub fn script_file_name(job_name: &str, job_number: u32) -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%6f");
    format!("{}_job_{}_{}.sh", job_name, job_number, timestamp)
}

/// 作业链请求
pub struct ChainRequest<'a> {
    pub num_jobs: u32,
    pub template: &'a JobTemplate,
    pub initial_dependency: Option<String>,
    pub site: &'a SiteConfig,
    /// 脚本输出目录
    pub script_dir: &'a Path,
}

impl ChainRequest<'_> {
    /// 在任何副作用之前校验整条链
    pub fn validate(&self) -> Result<()> {
        self.validate_inputs()?;
        if !self.script_dir.is_dir() {
            return Err(GizmoError::DirectoryNotFound {
                path: self.script_dir.display().to_string(),
            });
        }
        Ok(())
    }

    /// 校验参数与模板，不检查脚本目录（目录可由调用方随后创建）
    pub fn validate_inputs(&self) -> Result<()> {
        if self.num_jobs < 1 {
            return Err(GizmoError::InvalidInput(
                "number of jobs must be positive".to_string(),
            ));
        }
        if let Some(dep) = &self.initial_dependency {
            if dep.trim().is_empty() || dep.chars().any(char::is_whitespace) {
                return Err(GizmoError::InvalidInput(format!(
                    "invalid initial dependency '{}'",
                    dep
                )));
            }
        }
        for job_number in 1..=self.num_jobs.min(2) {
            let spec = self.template.job_spec(self.site, job_number, None)?;
            render(&spec, self.site)?;
        }
        Ok(())
    }
}

/// 提交作业链
///
/// 以上一次的提交结果为累加器折叠作业序号：第 `i` 个作业依赖第 `i-1`
/// 个作业的 ID，第一个作业依赖 `initial_dependency`。`on_submitted` 在每次
/// 成功提交后调用。
pub fn submit_chain<S, F>(
    request: &ChainRequest<'_>,
    submitter: &mut S,
    mut on_submitted: F,
) -> Result<ChainReport>
where
    S: Submitter,
    F: FnMut(&SubmissionResult),
{
    request.validate()?;

    let outcome = (1..=request.num_jobs).try_fold(
        Vec::with_capacity(request.num_jobs as usize),
        |mut submitted: Vec<SubmissionResult>, job_number| {
            let dependency = match submitted.last() {
                Some(prev) => Some(prev.job_id.clone()),
                None => request.initial_dependency.clone(),
            };
            match submit_one(request, submitter, job_number, dependency) {
                Ok(result) => {
                    on_submitted(&result);
                    submitted.push(result);
                    Ok(submitted)
                }
                Err(error) => Err((submitted, ChainFailure { job_number, error })),
            }
        },
    );

    Ok(match outcome {
        Ok(submitted) => ChainReport {
            submitted,
            failure: None,
        },
        Err((submitted, failure)) => ChainReport {
            submitted,
            failure: Some(failure),
        },
    })
}

fn submit_one<S: Submitter>(
    request: &ChainRequest<'_>,
    submitter: &mut S,
    job_number: u32,
    dependency: Option<String>,
) -> Result<SubmissionResult> {
    let spec = request
        .template
        .job_spec(request.site, job_number, dependency)?;
    let script = render(&spec, request.site)?;

    let script_path: PathBuf = request
        .script_dir
        .join(script_file_name(&spec.job_name, job_number));
    fs::write_text(&script_path, &script.text())?;

    let stdout = submitter.submit(&script_path)?;
    let job_id = parse_job_id(&stdout).ok_or_else(|| GizmoError::CommandFailed {
        command: format!("{} {}", request.site.submit_command(), script_path.display()),
        stderr: "no job id in submission output".to_string(),
    })?;

    Ok(SubmissionResult {
        job_number,
        job_id: job_id.to_string(),
        script_path,
    })
}
