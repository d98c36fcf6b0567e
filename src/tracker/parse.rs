//! # cpu.txt 解析
//!
//! 从 GIZMO `cpu.txt` 的末尾若干行提取键值对。
//!
//! ```text
//! Step 1234, Time: 0.0123, CPUs: 40, MultiDomains: 8, HighestActiveTimeBin: 20
//!                           diff               cumulative
//! total                     0.52  100.0%    8512.33  100.0%
//! treegrav                  0.13   25.0%    2101.02   24.7%
//! ```
//!
//! ## 依赖关系
//! - 被 `tracker/mod.rs` 使用
//! - 使用 `indexmap` 保持键的出现顺序

use indexmap::IndexMap;

/// 一次读取得到的记录（键按首次出现顺序排列）
pub type Record = IndexMap<String, String>;

pub const SIMULATION_TIME: &str = "Simulation Time";
pub const REAL_WORLD_TIME: &str = "Real World Time";

/// 默认读取的末尾行数
pub const TAIL_LINES: usize = 35;

/// 取文本的最后 `n` 行
pub fn tail(content: &str, n: usize) -> Vec<&str> {
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].to_vec()
}

/// `Step N, Time: T, ...` 行中的模拟时间 `T`
fn step_time(line: &str) -> Option<&str> {
    let token = line.split(',').nth(1)?.split_whitespace().nth(1)?;
    token.parse::<f64>().ok().map(|_| token)
}

/// 解析日志行
///
/// 含 `Step` 的行记录模拟时间与当前墙钟时间 `now`；其余行取前两个空白分隔的
/// token 作为键值。重复的键保留首次出现的位置，值取最后一次。
pub fn parse_lines(lines: &[&str], now: &str) -> Record {
    let mut record = Record::new();

    for line in lines {
        if line.contains("Step") {
            if let Some(t) = step_time(line) {
                record.insert(SIMULATION_TIME.to_string(), t.to_string());
                record.insert(REAL_WORLD_TIME.to_string(), now.to_string());
            }
            continue;
        }

        let mut parts = line.split_whitespace();
        if let (Some(key), Some(value)) = (parts.next(), parts.next()) {
            record.insert(key.to_string(), value.to_string());
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPU_TXT: &str = "\
Step 10, Time: 0.001, CPUs: 40, MultiDomains: 8, HighestActiveTimeBin: 20
                          diff               cumulative
total                     0.50  100.0%    8512.33  100.0%
treegrav                  0.13   25.0%    2101.02   24.7%
Step 11, Time: 0.0015, CPUs: 40, MultiDomains: 8, HighestActiveTimeBin: 20
                          diff               cumulative
total                     0.52  100.0%    8512.85  100.0%
treegrav                  0.14   26.9%    2101.16   24.7%
";

    #[test]
    fn test_tail() {
        assert_eq!(tail("a\nb\nc\n", 2), vec!["b", "c"]);
        assert_eq!(tail("a\nb\n", 35), vec!["a", "b"]);
        assert!(tail("", 35).is_empty());
    }

    #[test]
    fn test_parse_keeps_latest_values_in_first_order() {
        let lines = tail(CPU_TXT, TAIL_LINES);
        let record = parse_lines(&lines, "2026-10-16 12:00:00");

        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![SIMULATION_TIME, REAL_WORLD_TIME, "diff", "total", "treegrav"]
        );
        assert_eq!(record[SIMULATION_TIME], "0.0015");
        assert_eq!(record[REAL_WORLD_TIME], "2026-10-16 12:00:00");
        assert_eq!(record["total"], "0.52");
        assert_eq!(record["diff"], "cumulative");
    }

    #[test]
    fn test_malformed_step_line_is_skipped() {
        let record = parse_lines(&["Step without commas", "total 1.0"], "now");
        assert!(!record.contains_key(SIMULATION_TIME));
        assert_eq!(record["total"], "1.0");
    }

    #[test]
    fn test_single_token_lines_ignored() {
        let record = parse_lines(&["", "lonely", "   "], "now");
        assert!(record.is_empty());
    }
}
