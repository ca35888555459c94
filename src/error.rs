//! 错误类型

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipError>;

#[derive(Error, Debug)]
pub enum PipError {
    #[error("命令 `{command}` 执行失败 (exit={code:?}): {stderr}")]
    ExternalTool {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("无法启动命令 `{command}`: {source}")]
    ToolNotFound {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("无法解析 `{command}` 的输出: {reason}")]
    Parse { command: String, reason: String },

    #[error("索引中不存在包 '{name}'，请先运行 `lian-pip rebuild`")]
    StaleIndex { name: String },

    #[error("读写文件 {path} 失败: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("索引文件 {path} 格式错误: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("后台任务失败: {0}")]
    Task(String),
}

impl PipError {
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipError::Persistence {
            path: path.into(),
            source,
        }
    }
}
