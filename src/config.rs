use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// pip 列表输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListFormat {
    /// 表格输出，按固定位置跳过表头和末行
    #[default]
    Columns,
    /// `--format=json`
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 用户安装目录，用于子串匹配
    pub user_dir: String,
    /// 系统安装目录，只需能与 user_dir 区分
    pub sys_dir: String,
    pub index_path: PathBuf,
    pub pip_command: Vec<String>,
    pub graphviz_command: String,
    pub graph_format: String,
    pub jobs: usize,
    pub list_format: ListFormat,
    pub report_dir: PathBuf,
}

pub const MAX_JOBS: usize = 32;

impl Default for Config {
    fn default() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self {
            user_dir: PathBuf::from(&home).join(".local").to_string_lossy().into_owned(),
            sys_dir: "/usr/lib/python3".to_string(),
            index_path: PathBuf::from("pip_packages.json"),
            pip_command: vec!["python3".to_string(), "-m".to_string(), "pip".to_string()],
            graphviz_command: "dot".to_string(),
            graph_format: "svg".to_string(),
            jobs: 4,
            list_format: ListFormat::Columns,
            report_dir: PathBuf::from(home).join(".lian/pip"),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config/lian-pip/config.toml")
    }

    /// 读取配置文件；显式指定的路径必须存在，默认路径不存在时使用默认值
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件 {} 失败", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("解析配置文件 {} 失败", path.display()))?;
        Ok(config)
    }

    fn validate(mut self) -> Result<Self> {
        if self.pip_command.is_empty() {
            anyhow::bail!("pip_command 不能为空");
        }
        if self.user_dir.is_empty() {
            anyhow::bail!("user_dir 不能为空");
        }
        self.jobs = self.jobs.clamp(1, MAX_JOBS);
        Ok(self)
    }

    pub fn ensure_report_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.report_dir)?;
        Ok(())
    }
}
