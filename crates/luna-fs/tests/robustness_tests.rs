use assert_fs::prelude::*;
use luna_fs::{LunaPath, NormalizedPath, ProjectLock, RobustnessConfig, io};
use predicates::prelude::*;

#[test]
fn write_atomic_replaces_content_and_leaves_no_temp_files() {
    let temp = assert_fs::TempDir::new().unwrap();
    let index = temp.child("typings").child(LunaPath::IndexFile.as_str());
    index.write_str("old").unwrap();

    io::write_atomic(
        &NormalizedPath::new(index.path()),
        b"new",
        RobustnessConfig::default(),
    )
    .unwrap();

    index.assert("new");
    let leftovers: Vec<_> = std::fs::read_dir(temp.child("typings").path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn write_atomic_without_fsync() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("deep/nested/out.d.ts");

    let config = RobustnessConfig {
        enable_fsync: false,
        ..RobustnessConfig::default()
    };
    io::write_atomic(&NormalizedPath::new(file.path()), b"x", config).unwrap();

    file.assert(predicate::str::diff("x"));
}

#[test]
fn lock_file_stays_after_release() {
    let temp = assert_fs::TempDir::new().unwrap();
    let dir = temp.child(LunaPath::ConfigDir.as_str());

    let lock = ProjectLock::acquire(&NormalizedPath::new(dir.path()), RobustnessConfig::default())
        .unwrap();
    drop(lock);

    dir.child(LunaPath::LockFile.as_str())
        .assert(predicate::path::is_file());
}

#[test]
fn create_dir_all_fails_through_a_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".vscode").touch().unwrap();

    let err = io::create_dir_all(&NormalizedPath::new(temp.child(".vscode/typings").path()))
        .unwrap_err();

    assert!(matches!(err, luna_fs::Error::Io { .. }));
}
