//! 修改当前工作目录，单独作为一个测试二进制运行

use mirrorvault_lib::storage::LocalStorage;
use mirrorvault_lib::{Channel, MemoryLog, SyncEngine, DEFAULT_DESTINATION};
use std::path::Path;
use std::sync::Arc;

#[tokio::test]
async fn default_destination_is_created_under_working_directory() {
    let root = tempfile::tempdir().unwrap();
    let src = root.path().join("source");
    std::fs::create_dir(&src).unwrap();
    std::fs::write(src.join("notes.txt"), "hello").unwrap();
    std::env::set_current_dir(root.path()).unwrap();

    let log = Arc::new(MemoryLog::new());
    let engine =
        SyncEngine::with_default_destination(&src, Arc::new(LocalStorage::new()), log.clone())
            .await;

    assert_eq!(engine.destination_dir(), Path::new(DEFAULT_DESTINATION));
    assert!(root.path().join("backup").is_dir());
    assert_eq!(log.count(Channel::Info, "Created destination directory"), 1);

    engine.perform_backup().await;

    assert_eq!(
        std::fs::read_to_string(root.path().join("backup").join("notes.txt")).unwrap(),
        "hello"
    );
    assert_eq!(log.count(Channel::Success, "Backed up file"), 1);
}
