//! # sites 命令实现
//!
//! 以表格列出内置站点，或输出某个站点的 JSON 配置。
//!
//! ## 依赖关系
//! - 使用 `cli/sites.rs` 定义的参数
//! - 使用 `models/site.rs`, `tabled`

use crate::cli::sites::SitesArgs;
use crate::error::Result;
use crate::models::site::builtin_sites;
use crate::models::SiteConfig;
use crate::utils::output;

use tabled::{Table, Tabled};

#[derive(Debug, Clone, Tabled)]
struct SiteRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Scheduler")]
    scheduler: String,
    #[tabled(rename = "Aliases")]
    aliases: String,
    #[tabled(rename = "Partitions")]
    partitions: String,
    #[tabled(rename = "CPU types")]
    architectures: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn join_or_dash<'a>(items: impl Iterator<Item = &'a String>) -> String {
    let joined = items.map(|s| s.as_str()).collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

impl From<&SiteConfig> for SiteRow {
    fn from(site: &SiteConfig) -> Self {
        SiteRow {
            name: site.name.clone(),
            scheduler: site.scheduler.to_string(),
            aliases: join_or_dash(site.aliases.iter()),
            partitions: join_or_dash(site.partitions.keys()),
            architectures: join_or_dash(site.architectures.keys()),
            description: site.description.clone(),
        }
    }
}

/// 执行 sites 命令
pub fn execute(args: SitesArgs) -> Result<()> {
    if let Some(name) = args.dump {
        println!("{}", SiteConfig::builtin(&name)?.to_json()?);
        return Ok(());
    }

    output::print_header("Built-in Sites");
    let rows: Vec<SiteRow> = builtin_sites().iter().map(SiteRow::from).collect();
    println!("{}\n", Table::new(rows));
    output::print_info("Use --dump <name> to print a site as JSON for `submit --site-file`");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_row() {
        let row = SiteRow::from(&SiteConfig::builtin("rusty").unwrap());
        assert_eq!(row.scheduler, "SLURM");
        assert!(row.partitions.starts_with("cca"));
        assert!(row.architectures.contains("rome"));

        let row = SiteRow::from(&SiteConfig::builtin("niagara").unwrap());
        assert_eq!(row.partitions, "-");
    }
}
