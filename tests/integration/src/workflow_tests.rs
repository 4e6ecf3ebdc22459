//! Cross-crate scenarios: a project going through its whole typings
//! lifecycle with the real bundle, locator, index and lock.

use std::sync::Arc;
use std::time::Duration;

use luna_fs::{NormalizedPath, ProjectLock, RobustnessConfig};
use luna_test_utils::{TestBundle, TestProject};
use luna_typings::{
    Activation, DirectoryBundle, EmbeddedBundle, IndexOutcome, InstallRequest, PluginTypings,
    RemoveRequest, SyncConfig, Telemetry, TypingsSynchronizer,
};
use pretty_assertions::assert_eq;
use regex::Regex;

fn embedded_synchronizer(config: SyncConfig) -> TypingsSynchronizer {
    TypingsSynchronizer::new(config, Arc::new(EmbeddedBundle::new()), Telemetry::disabled())
}

fn assert_index_well_formed(index: &str) {
    let directive = Regex::new(r#"^/// <reference path="[^"]+"/>$"#).unwrap();
    for line in index.lines() {
        assert!(directive.is_match(line), "malformed index line: {line:?}");
    }
}

#[tokio::test]
async fn project_lifecycle() {
    let project = TestProject::new().with_marker();
    let root = NormalizedPath::new(project.root());
    let activation = Activation::new(
        embedded_synchronizer(SyncConfig::default()),
        Some(PluginTypings::embedded().unwrap()),
    );

    // Folder opened with a plugin
    let report = activation
        .on_folder_added(&root, &["luna-plugin-qrcode"])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.installed.len(), 2);
    let index = project.read_index();
    assert_index_well_formed(&index);
    assert_eq!(index.lines().count(), 2);

    // Plugin dropped
    let sync = activation.synchronizer();
    let removal = sync
        .remove(RemoveRequest {
            target: NormalizedPath::new(project.typings_target()),
            relative_paths: vec!["luna/plugins/qrcode.d.ts".into()],
            project_root: root.clone(),
        })
        .await
        .unwrap();
    assert_eq!(removal.index, IndexOutcome::Rewritten { removed_lines: 1 });
    assert_eq!(
        project.read_index(),
        r#"/// <reference path="../.vscode/typings/luna/luna.d.ts"/>"#
    );

    // Reopened: nothing to do
    let report = activation
        .on_folder_added(&root, &Vec::<String>::new())
        .await
        .unwrap()
        .unwrap();
    assert!(report.installed.is_empty());
    assert!(report.references_added.is_empty());

    let status = sync
        .status(Some(&NormalizedPath::new(project.typings_target())), Some(&root))
        .unwrap();
    assert_eq!(status.installed, vec!["luna/luna.d.ts"]);
    assert_eq!(status.missing, vec!["luna/plugins/qrcode.d.ts"]);
    assert!(status.dangling.is_empty());
}

#[tokio::test]
async fn custom_layout_from_config() {
    let project = TestProject::new();
    project.write_file("app.luna", "");
    project.write_file(
        ".luna/config.toml",
        r#"marker_file = "app.luna"
editor_dir = ".editor"
project_typings_dir = "types"
user_typings_dir = "src/types"
index_file = "index.d.ts"
"#,
    );
    let root = NormalizedPath::new(project.root());
    let config = SyncConfig::discover(&root).unwrap();
    let activation = Activation::new(embedded_synchronizer(config), None);

    let report = activation
        .on_folder_added(&root, &Vec::<String>::new())
        .await
        .unwrap()
        .expect("custom marker recognized");

    assert_eq!(report.installed, vec!["luna/luna.d.ts"]);
    project.assert_file_exists(".editor/types/luna/luna.d.ts");
    assert_eq!(
        project.read_file("src/types/index.d.ts"),
        r#"/// <reference path="../../.editor/types/luna/luna.d.ts"/>"#
    );
}

#[tokio::test]
async fn user_declarations_suppress_bundled_copy() {
    let project = TestProject::new().with_marker();
    project.write_file("typings/luna.d.ts", "declare const patched: true;\n");
    let activation = Activation::new(embedded_synchronizer(SyncConfig::default()), None);

    let report = activation
        .on_folder_added(&NormalizedPath::new(project.root()), &Vec::<String>::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.user_override, vec!["luna/luna.d.ts"]);
    project.assert_file_not_exists(".vscode/typings/luna/luna.d.ts");
    project.assert_file_not_exists("typings/luna-typings.d.ts");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn held_lock_leaves_files_installed_and_reports_index_error() {
    let project = TestProject::new().with_marker();
    let config = SyncConfig {
        lock_timeout_ms: 100,
        ..SyncConfig::default()
    };
    let guard = ProjectLock::acquire(
        &NormalizedPath::new(project.path(".luna")),
        RobustnessConfig::default(),
    )
    .unwrap();

    let report = embedded_synchronizer(config)
        .install(InstallRequest {
            target: NormalizedPath::new(project.typings_target()),
            relative_paths: vec!["luna/luna.d.ts".into()],
            project_root: Some(NormalizedPath::new(project.root())),
        })
        .await
        .unwrap();
    drop(guard);

    assert_eq!(report.installed, vec!["luna/luna.d.ts"]);
    assert!(report.index_error.is_some());
    assert!(!report.is_success());
    project.assert_file_exists(".vscode/typings/luna/luna.d.ts");
    project.assert_file_not_exists("typings/luna-typings.d.ts");
}

#[tokio::test]
async fn directory_and_embedded_bundles_agree() {
    let bundle = TestBundle::standard();
    let from_dir = TypingsSynchronizer::new(
        SyncConfig::default(),
        Arc::new(DirectoryBundle::new(bundle.root())),
        Telemetry::disabled(),
    );
    let from_binary = embedded_synchronizer(SyncConfig::default());

    let a = TestProject::new().with_marker();
    let b = TestProject::new().with_marker();
    for (sync, project) in [(&from_dir, &a), (&from_binary, &b)] {
        sync.install(InstallRequest {
            target: NormalizedPath::new(project.typings_target()),
            relative_paths: vec!["luna/luna.d.ts".into(), "luna/plugins/qrcode.d.ts".into()],
            project_root: Some(NormalizedPath::new(project.root())),
        })
        .await
        .unwrap();
    }

    assert_eq!(a.read_index(), b.read_index());
    assert_eq!(
        from_dir.source().list(),
        from_binary.source().list()
    );
}

#[test]
fn snippets_sit_alongside_typings() {
    let project = TestProject::new().with_marker();
    project.write_file(
        ".vscode/luna.code-snippets",
        r#"{ "Luna app": { "prefix": "luna-app", "body": ["Luna.app()"], "description": "App" } }"#,
    );

    let provider = luna_snippets::SnippetCompletionProvider::new(project.path(".vscode/luna.code-snippets"));

    let labels: Vec<&str> = provider
        .provide_completion_items()
        .iter()
        .map(|i| i.label.as_str())
        .collect();
    assert_eq!(labels, vec!["luna-app"]);
}
