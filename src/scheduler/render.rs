//! # 提交脚本渲染
//!
//! 由 `JobSpec` 与站点配置生成批处理提交脚本。纯函数，无副作用。
//!
//! ## 脚本结构（固定顺序）
//! 1. 解释器行
//! 2. 调度器指令块（资源、作业名、输出文件、依赖、分区附加指令）
//! 3. 环境准备（模块加载、切换目录）
//! 4. 日志文件防覆盖块（作业运行时求值）
//! 5. 重启准备（仅在有重启模式时）
//! 6. mpirun 启动行
//!
//! ## 依赖关系
//! - 被 `scheduler/chain.rs`, `commands/submit.rs` 调用
//! - 使用 `models/`

use crate::error::{GizmoError, Result};
use crate::models::{JobSpec, SiteConfig};

use regex::Regex;
use std::collections::HashMap;

/// 在作业运行时选择不重名的日志文件 `shell_DD-MM-YYYY[_N].out`
const LOG_GUARD: &[&str] = &[
    "date_today=\"$(date +'%d-%m-%Y')\"",
    "echo $date_today",
    "base_filename=\"shell_${date_today}\"",
    "date_filename=\"${base_filename}.out\"",
    "echo $date_filename",
    "",
    "counter=1",
    "filename=$date_filename",
    "",
    "while [[ -e $filename ]]; do",
    "    counter=$((counter + 1))",
    "    filename=\"${base_filename}_$counter.out\"",
    "    echo \"File exists, checking next: $filename\"",
    "done",
];

/// 渲染后的提交脚本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedScript {
    lines: Vec<String>,
}

impl RenderedScript {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 完整脚本文本（以换行结尾）
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// 以指定前缀开头的指令行
    pub fn directives<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.lines
            .iter()
            .filter_map(move |l| l.strip_prefix(prefix))
            .map(str::trim_start)
    }

    /// 最后一行（启动命令）
    pub fn launch_line(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }
}

/// 将小时数转换为 `HH:MM:SS`（分、秒向下取整）
pub fn format_wall_time(hours: f64) -> String {
    let h = hours.trunc();
    let minutes_f = (hours - h) * 60.0;
    let m = minutes_f.trunc();
    let s = ((minutes_f - m) * 60.0).trunc();
    format!("{:02}:{:02}:{:02}", h as u64, m as u64, s as u64)
}

/// 渲染提交脚本
pub fn render(spec: &JobSpec, site: &SiteConfig) -> Result<RenderedScript> {
    validate(spec)?;

    let partition = match &spec.partition {
        Some(name) => Some(site.partition(name)?),
        None => None,
    };

    let values = placeholder_values(spec);
    let placeholder = Regex::new(r"\{([a-z_]+)\}").unwrap();
    let prefix = site.scheduler.directive_prefix();

    let mut lines = vec![site.shell.clone()];

    // 指令块
    for template in &site.directives {
        let directive = expand(&placeholder, template, &values)?;
        lines.push(format!("{} {}", prefix, directive));
    }
    if let Some(dep) = &spec.dependency {
        lines.push(format!(
            "{} {}",
            prefix,
            site.scheduler.dependency_directive(dep)
        ));
    }
    if let Some(partition) = partition {
        for template in &partition.directives {
            let directive = expand(&placeholder, template, &values)?;
            lines.push(format!("{} {}", prefix, directive));
        }
    }

    // 环境准备
    lines.push(String::new());
    lines.extend(site.setup.iter().cloned());

    // 日志防覆盖
    lines.push(String::new());
    lines.extend(LOG_GUARD.iter().map(|s| s.to_string()));

    // 重启准备
    if spec.restart.is_some() {
        lines.push(String::new());
        lines.extend(site.restart_prep.iter().cloned());
        lines.push(format!("python prep_restart.py {}", spec.param_file));
        lines.push(String::new());
    }

    lines.push(launch_line(spec, site));

    Ok(RenderedScript { lines })
}

fn validate(spec: &JobSpec) -> Result<()> {
    if spec.nodes < 1 {
        return Err(GizmoError::InvalidInput(
            "number of nodes must be positive".to_string(),
        ));
    }
    if spec.cores_per_node < 1 {
        return Err(GizmoError::InvalidInput(
            "number of cores per node must be positive".to_string(),
        ));
    }
    if spec.nodes.checked_mul(spec.cores_per_node).is_none() {
        return Err(GizmoError::InvalidInput(format!(
            "{} nodes x {} cores per node exceeds the supported core count",
            spec.nodes, spec.cores_per_node
        )));
    }
    if let Some(w) = spec.wall_time_hours {
        if !w.is_finite() || w <= 0.0 {
            return Err(GizmoError::InvalidInput(format!(
                "wall time must be a positive number of hours, got {}",
                w
            )));
        }
    }
    Ok(())
}

fn placeholder_values(spec: &JobSpec) -> HashMap<&'static str, Option<String>> {
    HashMap::from([
        ("nodes", Some(spec.nodes.to_string())),
        ("ppn", Some(spec.cores_per_node.to_string())),
        ("cores", Some(spec.total_cores().to_string())),
        ("name", Some(spec.scheduler_name())),
        ("account", spec.account.clone()),
        ("walltime", spec.wall_time_hours.map(format_wall_time)),
        ("partition", spec.partition.clone()),
        ("constraint", spec.constraint.clone()),
    ])
}

/// 替换指令模板中的占位符
fn expand(
    placeholder: &Regex,
    template: &str,
    values: &HashMap<&'static str, Option<String>>,
) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in placeholder.captures_iter(template) {
        let whole = caps.get(0).unwrap();
        let key = &caps[1];
        let value = match values.get(key) {
            Some(Some(v)) => v,
            Some(None) => {
                return Err(GizmoError::InvalidInput(format!(
                    "directive '{}' needs a value for {{{}}}",
                    template, key
                )))
            }
            None => {
                return Err(GizmoError::InvalidInput(format!(
                    "unknown placeholder {{{}}} in directive '{}'",
                    key, template
                )))
            }
        };
        out.push_str(&template[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&template[last..]);

    Ok(out)
}

fn launch_line(spec: &JobSpec, site: &SiteConfig) -> String {
    let mut cmd = format!("mpirun -np {}", spec.total_cores());
    if spec.nodes > 1 {
        if let Some(args) = &site.launch.multi_node_args {
            cmd.push(' ');
            cmd.push_str(args);
        }
    }
    cmd.push_str(&format!(" {} {}", site.launch.executable, spec.param_file));
    if let Some(restart) = spec.restart {
        cmd.push_str(&format!(" {}", restart.flag()));
    }
    cmd.push_str(" >\"$filename\"");
    if let Some(stderr) = &site.launch.stderr {
        cmd.push_str(&format!(" 2>{}", stderr));
    }
    cmd
}
