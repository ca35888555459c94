//! 子命令实现

use crate::cli::{Cli, Commands};
use crate::config::{Config, MAX_JOBS};
use crate::graph::{export_graph, RenderOptions};
use crate::index::PackageIndex;
use crate::maintenance::{list_upgradable, upgrade};
use crate::package_manager::{Classifier, DuctRunner, PackageManager};
use crate::report::ReportSaver;
use anyhow::{Context, Result};
use std::path::Path;

pub const UP_TO_DATE: &str = "Python 包已是最新，没有需要升级的用户安装包。";

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(index) = cli.index {
        config.index_path = index;
    }
    let pm = PackageManager::from_config(&config);
    let classifier = Classifier::from_config(&config);

    match cli.command {
        Commands::Rebuild { jobs } => rebuild(&config, &pm, jobs).await,
        Commands::Graph { output, no_render } => graph(&config, &classifier, &output, no_render),
        Commands::Outdated => {
            let index = load_index(&config.index_path)?;
            let entries = tokio::task::spawn_blocking(move || list_upgradable(&index, &pm, &classifier))
                .await??;
            if entries.is_empty() {
                println!("{}", UP_TO_DATE);
            }
            for e in &entries {
                println!("{}", "-".repeat(40));
                println!("{}\t\t{}->{}", e.name, e.current_version, e.latest_version);
            }
            Ok(())
        }
        Commands::Upgrade { dry_run, no_report } => {
            let index = load_index(&config.index_path)?;
            let pm_check = pm.clone();
            let entries = tokio::task::spawn_blocking(move || list_upgradable(&index, &pm_check, &classifier))
                .await??;
            if entries.is_empty() {
                println!("{}", UP_TO_DATE);
                return Ok(());
            }
            if dry_run {
                for e in &entries {
                    println!("将升级 {}  {} -> {}", e.name, e.current_version, e.latest_version);
                }
                return Ok(());
            }
            for e in &entries {
                println!("{}", "-".repeat(40));
                println!("升级 {} ...", e.name);
            }
            let report = tokio::task::spawn_blocking(move || upgrade(&pm, entries)).await?;
            let text = report.render();
            print!("{}", text);

            if !no_report {
                config.ensure_report_dir()?;
                match ReportSaver::new(config.report_dir.clone()).save(&text) {
                    Ok(path) => println!("升级记录已保存: {}", path.display()),
                    Err(e) => log::error!("保存升级记录失败: {}", e),
                }
            }

            if !report.is_success() {
                anyhow::bail!("{} 个包升级失败", report.failed.len());
            }
            Ok(())
        }
        Commands::Dependents { package } => {
            let index = load_index(&config.index_path)?;
            let record = index.lookup(&package)?;
            if record.required_by.is_empty() {
                println!("没有其他包依赖 {}", record.name);
            }
            for name in &record.required_by {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Show { package } => {
            let index = load_index(&config.index_path)?;
            let record = index.lookup(&package)?;
            println!("名称: {}", record.name);
            println!("位置: {}", record.location);
            println!("类别: {}", classifier.classify(&record.location).label());
            println!("依赖: {}", record.requires.join(", "));
            println!("被依赖: {}", record.required_by.join(", "));
            Ok(())
        }
    }
}

fn load_index(path: &Path) -> Result<PackageIndex> {
    PackageIndex::load(path).with_context(|| "无法读取索引，请先运行 `lian-pip rebuild`")
}

async fn rebuild(config: &Config, pm: &PackageManager, jobs: Option<usize>) -> Result<()> {
    let jobs = jobs.unwrap_or(config.jobs).clamp(1, MAX_JOBS);
    log::info!("使用 `{}` 重建索引", pm.name());

    let index = PackageIndex::build(pm, jobs, |done, total, name| {
        println!("[{}/{}] 包 '{}' 完成", done, total, name);
    })
    .await?;

    index.save(&config.index_path)?;
    println!(
        "索引已写入 {}，共 {} 个包",
        config.index_path.display(),
        index.len()
    );
    Ok(())
}

fn graph(config: &Config, classifier: &Classifier, output: &Path, no_render: bool) -> Result<()> {
    let index = load_index(&config.index_path)?;
    let runner = DuctRunner;
    let render = (!no_render).then(|| RenderOptions {
        runner: &runner,
        command: &config.graphviz_command,
        format: &config.graph_format,
    });

    let out = export_graph(&index, classifier, output, render)?;
    match out.image_path {
        Some(image) => println!("依赖关系图已生成，请查看 '{}'。", image.display()),
        None => println!("dot 文件已生成: '{}'", out.dot_path.display()),
    }
    Ok(())
}
