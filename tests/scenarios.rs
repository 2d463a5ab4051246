use mirrorvault_lib::core::ChangeMonitor;
use mirrorvault_lib::storage::LocalStorage;
use mirrorvault_lib::{Channel, MemoryLog, SyncEngine};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

fn set_mtime(path: &Path, secs: u64) {
    std::fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

fn dir_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
    dir_names(dir)
        .into_iter()
        .map(|n| {
            let content = std::fs::read(dir.join(&n)).unwrap();
            (n, content)
        })
        .collect()
}

fn pair() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let root = tempfile::tempdir().unwrap();
    let src = root.path().join("source");
    let dst = root.path().join("backup");
    std::fs::create_dir(&src).unwrap();
    std::fs::create_dir(&dst).unwrap();
    (root, src, dst)
}

#[tokio::test]
async fn full_backup_is_idempotent() {
    let (_root, src, dst) = pair();
    std::fs::write(src.join("a.txt"), b"alpha").unwrap();
    std::fs::write(src.join("b.bin"), [0u8, 1, 2, 3]).unwrap();
    let log = Arc::new(MemoryLog::new());
    let engine = SyncEngine::new(&src, &dst, Arc::new(LocalStorage::new()), log.clone());

    engine.perform_backup().await;
    let first = snapshot(&dst);
    engine.perform_backup().await;
    let second = snapshot(&dst);

    assert_eq!(first, second);
    assert_eq!(dir_names(&dst), vec!["a.txt", "b.bin"]);
    assert_eq!(log.count(Channel::Success, "Created versioned backup"), 0);
}

#[tokio::test]
async fn report_lifecycle() {
    let (_root, src, dst) = pair();
    let report = src.join("report.txt");
    std::fs::write(&report, b"draft").unwrap();
    set_mtime(&report, 100);
    let log = Arc::new(MemoryLog::new());
    let engine = SyncEngine::new(&src, &dst, Arc::new(LocalStorage::new()), log.clone());

    engine.perform_backup().await;
    assert_eq!(std::fs::read(dst.join("report.txt")).unwrap(), b"draft");

    // 两边时间相同时同步不做任何事
    set_mtime(&dst.join("report.txt"), 100);
    log.clear();
    engine.sync_files().await;
    assert_eq!(dir_names(&dst), vec!["report.txt"]);
    assert_eq!(log.count(Channel::Success, ""), 0);

    // 源更新后增量备份覆盖，不建立版本
    std::fs::write(&report, b"final").unwrap();
    set_mtime(&report, 200);
    engine.incremental_backup().await;
    assert_eq!(std::fs::read(dst.join("report.txt")).unwrap(), b"final");
    assert_eq!(dir_names(&dst), vec!["report.txt"]);
    assert_eq!(log.count(Channel::Success, "Incrementally backed up file"), 1);
}

#[tokio::test]
async fn sync_creates_one_version_per_overwrite() {
    let (_root, src, dst) = pair();
    for (name, secs) in [("one.txt", 300), ("two.txt", 300)] {
        std::fs::write(src.join(name), b"new").unwrap();
        set_mtime(&src.join(name), secs);
        std::fs::write(dst.join(name), b"old").unwrap();
        set_mtime(&dst.join(name), 100);
    }
    std::fs::write(src.join("three.txt"), b"brand new").unwrap();
    let log = Arc::new(MemoryLog::new());
    let engine = SyncEngine::new(&src, &dst, Arc::new(LocalStorage::new()), log.clone());

    engine.sync_files().await;

    let names = dir_names(&dst);
    let versions: Vec<&String> = names
        .iter()
        .filter(|n| !["one.txt", "two.txt", "three.txt"].contains(&n.as_str()))
        .collect();
    assert_eq!(versions.len(), 2, "unexpected destination contents: {:?}", names);
    assert!(versions.iter().any(|n| n.starts_with("one_") && n.ends_with(".txt")));
    assert!(versions.iter().any(|n| n.starts_with("two_") && n.ends_with(".txt")));
    for v in versions {
        assert_eq!(std::fs::read(dst.join(v)).unwrap(), b"old");
        // one_YYYYMMDD_HHMMSS.txt
        assert_eq!(v.len(), "one_".len() + 15 + ".txt".len());
    }
}

#[tokio::test]
async fn monitor_detects_path_level_changes() {
    let (_root, src, dst) = pair();
    std::fs::write(src.join("a.txt"), b"a").unwrap();
    std::fs::write(src.join("c.txt"), b"c").unwrap();
    let log = Arc::new(MemoryLog::new());
    let engine = SyncEngine::new(&src, &dst, Arc::new(LocalStorage::new()), log.clone());

    let mut monitor =
        ChangeMonitor::with_previous(&engine, vec![src.join("a.txt"), src.join("b.txt")]);
    let outcome = monitor.tick().await;

    assert_eq!(outcome.diff.removed, vec![src.join("b.txt")]);
    assert_eq!(outcome.diff.added, vec![src.join("c.txt")]);
    assert_eq!(log.count(Channel::Info, "File synchronization completed."), 1);
    assert_eq!(log.count(Channel::Info, "Incremental backup completed."), 1);

    let again = monitor.tick().await;
    assert!(!again.synced);
    assert_eq!(log.count(Channel::Info, "File synchronization completed."), 1);
    assert_eq!(log.count(Channel::Info, "Incremental backup completed."), 1);
}
