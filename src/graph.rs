//! 依赖关系图导出（Graphviz dot）

use crate::error::{PipError, Result};
use crate::index::PackageIndex;
use crate::package_manager::{Classifier, CommandRunner, InstallClass};
use std::fs;
use std::path::{Path, PathBuf};

/// 节点名：小写，`-` 换成 `_`，加引号
pub fn node_id(name: &str) -> String {
    format!("\"{}\"", name.replace('-', "_").to_lowercase())
}

fn node_color(class: InstallClass) -> &'static str {
    match class {
        InstallClass::User => "cyan",
        InstallClass::System => "lightpink",
        InstallClass::Other => "gray",
    }
}

/// 生成 dot 文本：每个索引条目一个节点声明，每个依赖一条有向边。
///
/// 依赖不在索引中时边仍然保留，Graphviz 会把它画成默认样式的隐式节点。
pub fn render_dot(index: &PackageIndex, classifier: &Classifier) -> String {
    let mut dot = String::from("digraph G {\n");
    dot.push_str("\tlayout=dot\n");
    dot.push_str("\tranksep=10.0\n");
    dot.push_str("\tnode [ style = filled ];\n");

    for record in index.records() {
        let src = node_id(&record.name);
        let color = node_color(classifier.classify(&record.location));
        dot.push_str(&format!("\t{} [color={}]\n", src, color));
        for dep in &record.requires {
            dot.push_str(&format!("\t{}->{}\n", src, node_id(dep)));
        }
    }

    dot.push('}');
    dot
}

/// 导出结果
#[derive(Debug)]
pub struct GraphOutput {
    pub dot_path: PathBuf,
    pub image_path: Option<PathBuf>,
}

/// 图片渲染设置，`None` 表示只写 dot 文件
pub struct RenderOptions<'a> {
    pub runner: &'a dyn CommandRunner,
    pub command: &'a str,
    pub format: &'a str,
}

/// 写出 dot 文件，并调用 `dot <file> -T<fmt> -o <image>` 渲染同名图片
pub fn export_graph(
    index: &PackageIndex,
    classifier: &Classifier,
    dot_path: &Path,
    render: Option<RenderOptions<'_>>,
) -> Result<GraphOutput> {
    let dot = render_dot(index, classifier);
    fs::write(dot_path, dot).map_err(|e| PipError::persistence(dot_path, e))?;
    log::info!("已写出 {}", dot_path.display());

    let Some(opts) = render else {
        return Ok(GraphOutput {
            dot_path: dot_path.to_path_buf(),
            image_path: None,
        });
    };

    let image_path = dot_path.with_extension(opts.format);
    let args = vec![
        dot_path.to_string_lossy().into_owned(),
        format!("-T{}", opts.format),
        "-o".to_string(),
        image_path.to_string_lossy().into_owned(),
    ];
    opts.runner.run(opts.command, &args)?;

    Ok(GraphOutput {
        dot_path: dot_path.to_path_buf(),
        image_path: Some(image_path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package_manager::testing::FakeRunner;
    use crate::package_manager::PackageRecord;

    fn index() -> PackageIndex {
        let mut index = PackageIndex::default();
        index.insert(PackageRecord {
            name: "Flask-Login".into(),
            location: "/home/u/.local/lib".into(),
            requires: vec!["Flask".into(), "Werkzeug".into()],
            required_by: vec![],
        });
        index.insert(PackageRecord {
            name: "Werkzeug".into(),
            location: "/usr/lib/python3/dist-packages".into(),
            requires: vec!["MarkupSafe".into()],
            required_by: vec!["Flask-Login".into()],
        });
        index.insert(PackageRecord {
            name: "conda".into(),
            location: "/opt/conda".into(),
            ..Default::default()
        });
        index
    }

    fn classifier() -> Classifier {
        Classifier::new("/home/u/.local", "/usr/lib/python3")
    }

    #[test]
    fn node_ids_are_normalized() {
        assert_eq!(node_id("Flask-Login"), "\"flask_login\"");
        assert_eq!(node_id("zope.interface"), "\"zope.interface\"");
    }

    #[test]
    fn one_node_per_record_and_one_edge_per_requirement() {
        let dot = render_dot(&index(), &classifier());
        let nodes = dot.lines().filter(|l| l.contains("[color=")).count();
        let edges = dot.lines().filter(|l| l.contains("->")).count();
        assert_eq!(nodes, 3);
        assert_eq!(edges, 3);
        assert!(dot.starts_with("digraph G {\n\tlayout=dot\n\tranksep=10.0\n\tnode [ style = filled ];\n"));
        assert!(dot.ends_with('}'));
    }

    #[test]
    fn colors_follow_install_class() {
        let dot = render_dot(&index(), &classifier());
        assert!(dot.contains("\t\"flask_login\" [color=cyan]\n"));
        assert!(dot.contains("\t\"werkzeug\" [color=lightpink]\n"));
        assert!(dot.contains("\t\"conda\" [color=gray]\n"));
        // 依赖不在索引中也照样连边
        assert!(dot.contains("\t\"flask_login\"->\"flask\"\n"));
        assert!(dot.contains("\t\"werkzeug\"->\"markupsafe\"\n"));
    }

    #[test]
    fn export_writes_dot_and_renders_image() {
        let dir = tempfile::tempdir().unwrap();
        let dot_path = dir.path().join("graph_test.dot");
        let image = dir.path().join("graph_test.svg");
        let cmd = format!("dot {} -Tsvg -o {}", dot_path.display(), image.display());
        let runner = FakeRunner::default().with(&cmd, "");

        let out = export_graph(
            &index(),
            &classifier(),
            &dot_path,
            Some(RenderOptions {
                runner: &runner,
                command: "dot",
                format: "svg",
            }),
        )
        .unwrap();

        assert_eq!(out.image_path, Some(image));
        assert_eq!(runner.calls(), vec![cmd]);
        assert!(fs::read_to_string(&dot_path).unwrap().starts_with("digraph G {"));
    }

    #[test]
    fn export_without_render_skips_graphviz() {
        let dir = tempfile::tempdir().unwrap();
        let dot_path = dir.path().join("deps.dot");
        let out = export_graph(&index(), &classifier(), &dot_path, None).unwrap();
        assert!(out.image_path.is_none());
        assert!(dot_path.exists());
    }
}
