//! 包索引：构建、持久化与查询

use crate::error::{PipError, Result};
use crate::package_manager::{normalize_name, PackageManager, PackageRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// 包名 → 记录，按键排序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageIndex {
    packages: BTreeMap<String, PackageRecord>,
}

impl PackageIndex {
    pub fn insert(&mut self, record: PackageRecord) {
        self.packages.insert(record.name.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn records(&self) -> impl Iterator<Item = &PackageRecord> {
        self.packages.values()
    }

    /// 精确匹配失败时按 PEP 503 规范化名称再查一次
    pub fn find(&self, name: &str) -> Option<&PackageRecord> {
        if let Some(record) = self.packages.get(name) {
            return Some(record);
        }
        let wanted = normalize_name(name);
        self.packages
            .values()
            .find(|record| normalize_name(&record.name) == wanted)
    }

    /// 查询记录；索引中没有该包说明索引已过期
    pub fn lookup(&self, name: &str) -> Result<&PackageRecord> {
        self.find(name).ok_or_else(|| PipError::StaleIndex {
            name: name.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PipError::persistence(path, e))?;
        let mut packages: BTreeMap<String, PackageRecord> =
            serde_json::from_str(&content).map_err(|source| PipError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        for (name, record) in packages.iter_mut() {
            record.name = name.clone();
        }
        Ok(Self { packages })
    }

    /// 4 空格缩进、键有序的 JSON 文本；相同内容总是得到相同字节
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.packages.serialize(&mut ser)?;
        buf.push(b'\n');
        // serde_json 只输出合法 UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// 先写临时文件再重命名，写入中途失败时旧索引保持不变
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json().map_err(|source| PipError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PipError::persistence(parent, e))?;
        }

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = Path::new(&tmp);
        fs::write(tmp, json).map_err(|e| PipError::persistence(tmp, e))?;
        fs::rename(tmp, path).map_err(|e| PipError::persistence(path, e))?;
        Ok(())
    }

    /// 从 pip 重新构建完整索引。
    ///
    /// 每个包的 `pip show` 在阻塞线程池中执行，同时进行的查询不超过 `jobs` 个。
    /// 每完成一个包调用一次 `progress(done, total, name)`。任一查询失败即中止。
    pub async fn build<F>(pm: &PackageManager, jobs: usize, mut progress: F) -> Result<Self>
    where
        F: FnMut(usize, usize, &str),
    {
        let lister = pm.clone();
        let names = tokio::task::spawn_blocking(move || lister.list_installed())
            .await
            .map_err(|e| PipError::Task(e.to_string()))??;
        let total = names.len();
        log::info!("共 {} 个已安装包，并发 {}", total, jobs);

        let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
        let mut set = JoinSet::new();
        for name in names {
            let pm = pm.clone();
            let semaphore = semaphore.clone();
            set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| PipError::Task(e.to_string()))?;
                tokio::task::spawn_blocking(move || pm.show(&name))
                    .await
                    .map_err(|e| PipError::Task(e.to_string()))?
            });
        }

        let mut index = PackageIndex::default();
        let mut done = 0;
        while let Some(joined) = set.join_next().await {
            let record = joined.map_err(|e| PipError::Task(e.to_string()))??;
            done += 1;
            progress(done, total, &record.name);
            index.insert(record);
        }
        Ok(index)
    }
}
