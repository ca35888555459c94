use anyhow::Result;
use chrono::{DateTime, Local};
use std::fs;
use std::path::PathBuf;

/// 升级记录保存器，按日期归档
pub struct ReportSaver {
    base_dir: PathBuf,
}

impl ReportSaver {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn save(&self, content: &str) -> Result<PathBuf> {
        self.save_at(content, Local::now())
    }

    fn save_at(&self, content: &str, now: DateTime<Local>) -> Result<PathBuf> {
        // 目录结构: YYYY/MM/DD/
        let dir = self
            .base_dir
            .join(now.format("%Y").to_string())
            .join(now.format("%m").to_string())
            .join(now.format("%d").to_string());
        fs::create_dir_all(&dir)?;

        // 文件名: HH-MM.txt
        let filepath = dir.join(now.format("%H-%M.txt").to_string());

        let mut full_content = format!(
            "pip 升级记录\n生成时间: {}\n\n",
            now.format("%Y-%m-%d %H:%M:%S")
        );
        full_content.push_str(content);

        fs::write(&filepath, full_content)?;
        Ok(filepath)
    }
}
