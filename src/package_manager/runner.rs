//! 外部命令执行

use crate::error::{PipError, Result};

/// 执行外部命令并按行返回标准输出。
///
/// 返回的最后一个元素可能是空串（输出以换行结尾时），调用方需要容忍。
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String]) -> Result<Vec<String>>;
}

/// 基于 duct 的真实实现
#[derive(Debug, Clone, Default)]
pub struct DuctRunner;

impl CommandRunner for DuctRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<Vec<String>> {
        let command = command_line(program, args);
        log::debug!("执行: {}", command);

        let output = duct::cmd(program, args)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()
            .map_err(|source| PipError::ToolNotFound {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PipError::ExternalTool {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(split_lines(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// 按 `\n` 切分，保留末尾空元素（与 `str::split` 一致），去掉 `\r`
pub fn split_lines(stdout: &str) -> Vec<String> {
    stdout
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
        .collect()
}

pub fn command_line(program: &str, args: &[String]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().cloned());
    parts.join(" ")
}
