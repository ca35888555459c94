//! 输出解析函数

use super::types::{OutdatedEntry, PackageRecord};
use crate::error::{PipError, Result};
use serde::Deserialize;

/// 表格输出的表头行数（标题 + 分隔线）
const HEADER_LINES: usize = 2;

/// 去掉表格输出的表头两行和末行。
///
/// pip 的表格输出形状固定：标题、分隔线、N 行数据、结尾空行。
fn table_rows(lines: &[String]) -> &[String] {
    if lines.len() <= HEADER_LINES + 1 {
        return &[];
    }
    &lines[HEADER_LINES..lines.len() - 1]
}

/// 解析 `pip list` 的表格输出，返回包名列表
pub fn parse_list_columns(lines: &[String]) -> Vec<String> {
    table_rows(lines)
        .iter()
        .filter_map(|line| line.split_whitespace().next())
        .map(|name| name.to_string())
        .collect()
}

/// 解析 `pip list --outdated` 的表格输出
pub fn parse_outdated_columns(lines: &[String], command: &str) -> Result<Vec<OutdatedEntry>> {
    let mut entries = Vec::new();
    for line in table_rows(lines) {
        let items: Vec<&str> = line.split_whitespace().collect();
        if items.is_empty() {
            continue;
        }
        if items.len() < 3 {
            return Err(PipError::Parse {
                command: command.to_string(),
                reason: format!("过期列表行缺少版本列: {:?}", line),
            });
        }
        entries.push(OutdatedEntry {
            name: items[0].to_string(),
            current_version: items[1].to_string(),
            latest_version: items[2].to_string(),
        });
    }
    Ok(entries)
}

#[derive(Debug, Deserialize)]
struct JsonListItem {
    name: String,
    version: String,
    #[serde(default)]
    latest_version: Option<String>,
}

fn parse_json_items(lines: &[String], command: &str) -> Result<Vec<JsonListItem>> {
    let raw = lines.join("\n");
    serde_json::from_str(raw.trim()).map_err(|e| PipError::Parse {
        command: command.to_string(),
        reason: e.to_string(),
    })
}

/// 解析 `pip list --format=json`
pub fn parse_list_json(lines: &[String], command: &str) -> Result<Vec<String>> {
    Ok(parse_json_items(lines, command)?
        .into_iter()
        .map(|item| item.name)
        .collect())
}

/// 解析 `pip list --outdated --format=json`
pub fn parse_outdated_json(lines: &[String], command: &str) -> Result<Vec<OutdatedEntry>> {
    parse_json_items(lines, command)?
        .into_iter()
        .map(|item| match item.latest_version {
            Some(latest) => Ok(OutdatedEntry {
                name: item.name,
                current_version: item.version,
                latest_version: latest,
            }),
            None => Err(PipError::Parse {
                command: command.to_string(),
                reason: format!("包 '{}' 缺少 latest_version 字段", item.name),
            }),
        })
        .collect()
}

/// 拆分依赖列表："numpy, requests" → ["numpy", "requests"]
fn split_package_list(value: &str) -> Vec<String> {
    value
        .split_whitespace()
        .map(|pkg| pkg.trim_end_matches(','))
        .filter(|pkg| !pkg.is_empty())
        .map(|pkg| pkg.to_string())
        .collect()
}

/// 解析 `pip show <name>` 的输出。
///
/// 字段行必须顶格书写且形如 `Label: value`；缩进行属于上一字段的续行，
/// 不会被当作新字段。`Name:` 只取第一次出现的值。
pub fn parse_show(lines: &[String], command: &str) -> Result<PackageRecord> {
    let mut name: Option<String> = None;
    let mut record = PackageRecord::default();

    for line in lines {
        if line.starts_with(' ') || line.starts_with('\t') {
            continue;
        }
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match label {
            "Name" => {
                if name.is_none() {
                    name = value.split_whitespace().next().map(|s| s.to_string());
                }
            }
            "Location" => {
                record.location = value.split_whitespace().next().unwrap_or("").to_string();
            }
            "Requires" => record.requires = split_package_list(value),
            "Required-by" => record.required_by = split_package_list(value),
            _ => {}
        }
    }

    record.name = name.ok_or_else(|| PipError::Parse {
        command: command.to_string(),
        reason: "输出中没有 Name 字段".to_string(),
    })?;
    Ok(record)
}
