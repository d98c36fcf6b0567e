//! # track 命令实现
//!
//! 轮询 `cpu.txt`，每次修改后向 `progress.csv` 追加一行，直到被中断。
//!
//! ## 依赖关系
//! - 使用 `cli/track.rs` 定义的参数
//! - 使用 `tracker/`, `utils/output.rs`, `utils/progress.rs`

use crate::cli::track::TrackArgs;
use crate::error::{GizmoError, Result};
use crate::tracker::{parse::SIMULATION_TIME, PollEvent, Tracker};
use crate::utils::{output, progress};

use std::thread;
use std::time::Duration;

/// 执行 track 命令
pub fn execute(args: TrackArgs) -> Result<()> {
    output::print_header("GIZMO Progress Tracker");

    if !args.out_dir.is_dir() {
        return Err(GizmoError::DirectoryNotFound {
            path: args.out_dir.display().to_string(),
        });
    }
    if args.tail == 0 {
        return Err(GizmoError::InvalidInput(
            "--tail must be at least 1".to_string(),
        ));
    }

    let log_path = args.out_dir.join(&args.log_file);
    let csv_path = args.out_dir.join(&args.csv);

    let (mut tracker, event) = Tracker::new(&log_path, &csv_path, args.tail)?;

    output::print_info(&format!("Watching {}", tracker.log_path().display()));
    output::print_info(&format!("Writing {}", csv_path.display()));
    match event {
        PollEvent::Initialized { columns } => {
            output::print_success(&format!("Created CSV header with {} columns", columns))
        }
        _ if !log_path.exists() => {
            output::print_warning("Log file does not exist yet, waiting for it to appear")
        }
        _ => {}
    }
    output::print_separator();

    let spinner = progress::create_spinner("Waiting for changes (Ctrl-C to stop)");
    let interval = Duration::from_millis(args.interval_ms.max(1));
    let mut rows = 0usize;

    loop {
        match tracker.poll()? {
            PollEvent::Appended(record) => {
                rows += 1;
                let time = record
                    .get(SIMULATION_TIME)
                    .map(String::as_str)
                    .unwrap_or("-");
                spinner.suspend(|| {
                    output::print_success(&format!(
                        "Row {} appended (simulation time {})",
                        rows, time
                    ))
                });
                spinner.set_message(format!("{} rows written (Ctrl-C to stop)", rows));
            }
            PollEvent::Initialized { .. } | PollEvent::Idle => {}
        }
        thread::sleep(interval);
    }
}
