//! 基于索引的维护操作：列出可升级的用户包、执行升级

use crate::error::Result;
use crate::index::PackageIndex;
use crate::package_manager::{Classifier, InstallClass, OutdatedEntry, PackageManager};

/// 列出可升级的用户安装包。
///
/// 过期列表中的每个包都必须存在于索引中，否则返回 `StaleIndex`。
pub fn list_upgradable(
    index: &PackageIndex,
    pm: &PackageManager,
    classifier: &Classifier,
) -> Result<Vec<OutdatedEntry>> {
    let mut upgradable = Vec::new();
    for entry in pm.list_outdated()? {
        let record = index.lookup(&entry.name)?;
        let class = classifier.classify(&record.location);
        log::debug!("{} {} -> {} ({})", entry.name, entry.current_version, entry.latest_version, class.label());
        if class == InstallClass::User {
            upgradable.push(entry);
        }
    }
    Ok(upgradable)
}

/// 一次升级的结果
#[derive(Debug, Default)]
pub struct UpgradeReport {
    pub upgraded: Vec<OutdatedEntry>,
    pub failed: Vec<(OutdatedEntry, String)>,
}

impl UpgradeReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("已升级 {} 个包\n", self.upgraded.len()));
        for e in &self.upgraded {
            out.push_str(&format!("  {}  {} -> {}\n", e.name, e.current_version, e.latest_version));
        }
        if !self.failed.is_empty() {
            out.push_str(&format!("升级失败 {} 个包\n", self.failed.len()));
            for (e, reason) in &self.failed {
                out.push_str(&format!("  {}: {}\n", e.name, reason));
            }
        }
        out
    }
}

/// 逐个执行 `pip install <name> --upgrade`，单个失败不影响其余
pub fn upgrade(pm: &PackageManager, entries: Vec<OutdatedEntry>) -> UpgradeReport {
    let mut report = UpgradeReport::default();
    for entry in entries {
        log::info!("升级 {} ...", entry.name);
        match pm.install_upgrade(&entry.name) {
            Ok(()) => report.upgraded.push(entry),
            Err(e) => {
                log::warn!("升级 {} 失败: {}", entry.name, e);
                report.failed.push((entry, e.to_string()));
            }
        }
    }
    report
}
