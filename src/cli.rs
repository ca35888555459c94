use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lian-pip", version, about = "pip 包索引与用户安装包维护")]
pub struct Cli {
    #[arg(long, global = true, help = "配置文件路径（默认 ~/.config/lian-pip/config.toml）")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "索引文件路径，覆盖配置中的 index_path")]
    pub index: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 重新扫描所有已安装包并重写索引
    Rebuild {
        #[arg(long, help = "并发查询数，覆盖配置中的 jobs")]
        jobs: Option<usize>,
    },
    /// 导出依赖关系图
    Graph {
        #[arg(default_value = "graph_test.dot")]
        output: PathBuf,
        #[arg(long, default_value_t = false, help = "只写 dot 文件，不调用 Graphviz")]
        no_render: bool,
    },
    /// 列出可升级的用户安装包
    Outdated,
    /// 升级所有可升级的用户安装包
    Upgrade {
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        #[arg(long, default_value_t = false, help = "不保存升级记录")]
        no_report: bool,
    },
    /// 列出依赖某个包的其他包
    Dependents { package: String },
    /// 显示索引中某个包的记录
    Show { package: String },
}
