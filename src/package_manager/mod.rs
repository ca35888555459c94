//! 包管理器模块 — 对 pip 命令行的封装

pub mod parser;
pub mod runner;
pub mod types;

pub use runner::{CommandRunner, DuctRunner};
pub use types::{normalize_name, Classifier, InstallClass, OutdatedEntry, PackageRecord};

use crate::config::{Config, ListFormat};
use crate::error::Result;
use parser::{parse_list_columns, parse_list_json, parse_outdated_columns, parse_outdated_json, parse_show};
use runner::command_line;
use std::sync::Arc;

#[derive(Clone)]
pub struct PackageManager {
    runner: Arc<dyn CommandRunner>,
    /// 如 `python3 -m pip`
    command: Vec<String>,
    list_format: ListFormat,
}

impl PackageManager {
    pub fn new(runner: Arc<dyn CommandRunner>, command: Vec<String>, list_format: ListFormat) -> Self {
        Self {
            runner,
            command,
            list_format,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(DuctRunner),
            config.pip_command.clone(),
            config.list_format,
        )
    }

    pub fn name(&self) -> String {
        self.command.join(" ")
    }

    fn pip(&self, args: &[&str]) -> Result<(String, Vec<String>)> {
        let program = self.command.first().map(String::as_str).unwrap_or("pip");
        let mut full_args: Vec<String> = self.command.iter().skip(1).cloned().collect();
        full_args.extend(args.iter().map(|a| a.to_string()));
        let lines = self.runner.run(program, &full_args)?;
        Ok((command_line(program, &full_args), lines))
    }

    /// 获取已安装包名 (pip list)
    pub fn list_installed(&self) -> Result<Vec<String>> {
        match self.list_format {
            ListFormat::Columns => {
                let (_, lines) = self.pip(&["list"])?;
                Ok(parse_list_columns(&lines))
            }
            ListFormat::Json => {
                let (command, lines) = self.pip(&["list", "--format=json"])?;
                parse_list_json(&lines, &command)
            }
        }
    }

    /// 获取单个包详情 (pip show)
    pub fn show(&self, name: &str) -> Result<PackageRecord> {
        let (command, lines) = self.pip(&["show", name])?;
        parse_show(&lines, &command)
    }

    /// 获取可升级包 (pip list --outdated)
    pub fn list_outdated(&self) -> Result<Vec<OutdatedEntry>> {
        match self.list_format {
            ListFormat::Columns => {
                let (command, lines) = self.pip(&["list", "--outdated"])?;
                parse_outdated_columns(&lines, &command)
            }
            ListFormat::Json => {
                let (command, lines) = self.pip(&["list", "--outdated", "--format=json"])?;
                parse_outdated_json(&lines, &command)
            }
        }
    }

    /// 升级单个包 (pip install <name> --upgrade)
    pub fn install_upgrade(&self, name: &str) -> Result<()> {
        self.pip(&["install", name, "--upgrade"])?;
        Ok(())
    }
}
