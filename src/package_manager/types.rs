//! PackageManager 相关数据类型定义

use crate::config::Config;
use serde::{Deserialize, Serialize};

/// 单个包的索引记录（由 `pip show` 解析而来）
///
/// 序列化时不包含 `name`，它是索引中的键。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    #[serde(skip)]
    pub name: String,
    pub location: String,
    pub requires: Vec<String>,
    #[serde(rename = "required")]
    pub required_by: Vec<String>,
}

/// `pip list --outdated` 中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutdatedEntry {
    pub name: String,
    pub current_version: String,
    pub latest_version: String,
}

/// 安装位置分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallClass {
    User,
    System,
    Other,
}

impl InstallClass {
    pub fn label(&self) -> &'static str {
        match self {
            InstallClass::User => "user",
            InstallClass::System => "system",
            InstallClass::Other => "other",
        }
    }
}

/// 按安装路径对包分类。
///
/// 使用子串匹配而非路径前缀比较：先查用户目录，再查系统目录，先匹配者胜出。
#[derive(Debug, Clone)]
pub struct Classifier {
    user_dir: String,
    sys_dir: String,
}

impl Classifier {
    pub fn new(user_dir: impl Into<String>, sys_dir: impl Into<String>) -> Self {
        Self {
            user_dir: user_dir.into(),
            sys_dir: sys_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.user_dir.clone(), config.sys_dir.clone())
    }

    pub fn classify(&self, location: &str) -> InstallClass {
        if !self.user_dir.is_empty() && location.contains(&self.user_dir) {
            InstallClass::User
        } else if !self.sys_dir.is_empty() && location.contains(&self.sys_dir) {
            InstallClass::System
        } else {
            InstallClass::Other
        }
    }
}

/// PEP 503 名称规范化：小写，连续的 `-` `_` `.` 合并为一个 `-`
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_sep = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_sep {
                out.push('-');
            }
            in_sep = true;
        } else {
            out.extend(c.to_lowercase());
            in_sep = false;
        }
    }
    out
}
