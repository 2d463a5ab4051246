use crate::activity::ActivityLog;
use crate::core::comparator::{decide_sync, file_name, is_new_or_modified, SyncAction};
use crate::core::monitor::ChangeMonitor;
use crate::core::versioning::Versioner;
use crate::error::{SyncError, SyncResult};
use crate::storage::Storage;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// 未指定目标目录时使用的默认路径
pub const DEFAULT_DESTINATION: &str = "./backup";

/// 源目录与目标目录，构造后不再改变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPair {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// 同步引擎
///
/// 所有批处理操作按文件顺序执行；单个文件失败只记录日志，不中断整个批次，
/// 也不返回给调用方。
pub struct SyncEngine {
    pair: DirectoryPair,
    storage: Arc<dyn Storage>,
    log: Arc<dyn ActivityLog>,
    versioner: Versioner,
}

impl SyncEngine {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        storage: Arc<dyn Storage>,
        log: Arc<dyn ActivityLog>,
    ) -> Self {
        let pair = DirectoryPair {
            source: source.into(),
            destination: destination.into(),
        };
        log.info(&format!(
            "Initializing SyncEngine with source: {} and destination: {} (storage: {})",
            pair.source.display(),
            pair.destination.display(),
            storage.name()
        ));
        Self {
            pair,
            storage,
            log,
            versioner: Versioner::default(),
        }
    }

    /// 使用默认目标目录 `./backup`，不存在时创建
    pub async fn with_default_destination(
        source: impl Into<PathBuf>,
        storage: Arc<dyn Storage>,
        log: Arc<dyn ActivityLog>,
    ) -> Self {
        Self::with_defaulted_destination(source, DEFAULT_DESTINATION, storage, log).await
    }

    /// 使用调用方提供的默认目标目录，不存在时创建
    pub async fn with_defaulted_destination(
        source: impl Into<PathBuf>,
        default_destination: impl Into<PathBuf>,
        storage: Arc<dyn Storage>,
        log: Arc<dyn ActivityLog>,
    ) -> Self {
        let pair = DirectoryPair {
            source: source.into(),
            destination: default_destination.into(),
        };
        log.info(&format!(
            "Initializing SyncEngine with source: {} and default destination: {} (storage: {})",
            pair.source.display(),
            pair.destination.display(),
            storage.name()
        ));
        let engine = Self {
            pair,
            storage,
            log,
            versioner: Versioner::default(),
        };
        engine.ensure_destination_exists(true).await;
        engine
    }

    /// 替换版本命名器
    pub fn with_versioner(mut self, versioner: Versioner) -> Self {
        self.versioner = versioner;
        self
    }

    pub fn directories(&self) -> &DirectoryPair {
        &self.pair
    }

    pub fn source_dir(&self) -> &Path {
        &self.pair.source
    }

    pub fn destination_dir(&self) -> &Path {
        &self.pair.destination
    }

    pub(crate) fn log(&self) -> &dyn ActivityLog {
        self.log.as_ref()
    }

    /// 确保目标目录存在
    ///
    /// `announce_existing` 为 true 时，目录已存在也记录一条日志。
    async fn ensure_destination_exists(&self, announce_existing: bool) {
        let dest = &self.pair.destination;
        if self.storage.exists(dest).await {
            if announce_existing {
                self.log
                    .info(&format!("Destination directory exists: {}", dest.display()));
            }
            return;
        }

        match self.storage.create_dir_all(dest).await {
            Ok(()) => self
                .log
                .info(&format!("Created destination directory: {}", dest.display())),
            Err(e) => self
                .log
                .error(&format!("Failed to create destination directory: {}", e)),
        }
    }

    /// 列出源目录中的文件（每次重新读取）
    pub async fn list_source_files(&self) -> Vec<PathBuf> {
        self.storage.list_files(&self.pair.source).await
    }

    /// 列出目标目录中的文件（每次重新读取）
    pub async fn list_destination_files(&self) -> Vec<PathBuf> {
        self.storage.list_files(&self.pair.destination).await
    }

    /// 读取两边的修改时间，任一失败则记录错误并返回 None
    async fn modified_times(&self, source: &Path, dest: &Path) -> Option<(i64, i64)> {
        let src_time = self.storage.modified_time(source).await;
        let dest_time = self.storage.modified_time(dest).await;
        match (src_time, dest_time) {
            (Ok(s), Ok(d)) => Some((s, d)),
            (Err(e), _) | (_, Err(e)) => {
                self.log.error(&e.to_string());
                None
            }
        }
    }

    /// 完整备份：无条件复制所有源文件到目标目录，不建立版本
    pub async fn perform_backup(&self) {
        self.log.info("Starting full backup...");
        self.ensure_destination_exists(false).await;

        for file in self.list_source_files().await {
            let Some(name) = file_name(&file) else {
                continue;
            };
            let dest = self.pair.destination.join(&name);
            match self.storage.copy(&file, &dest).await {
                Ok(()) => self
                    .log
                    .success(&format!("Backed up file: {}", file.display())),
                Err(e) => self.log.error(&format!(
                    "Failed to backup file: {} ({})",
                    file.display(),
                    e
                )),
            }
        }

        self.log.info("Full backup completed.");
    }

    /// 找出目标中缺失、或源修改时间严格更新的源文件
    pub async fn new_or_modified_files(&self) -> Vec<PathBuf> {
        let mut changed = Vec::new();

        for file in self.list_source_files().await {
            let Some(name) = file_name(&file) else {
                continue;
            };
            let dest = self.pair.destination.join(&name);

            let modified = if self.storage.exists(&dest).await {
                match self.modified_times(&file, &dest).await {
                    Some((src, dst)) => is_new_or_modified(src, Some(dst)),
                    None => false,
                }
            } else {
                true
            };

            if modified {
                changed.push(file);
            }
        }

        changed
    }

    /// 增量备份：只复制新增或修改过的文件，覆盖前不建立版本
    pub async fn incremental_backup(&self) {
        self.log.info("Starting incremental backup...");
        self.ensure_destination_exists(false).await;

        for file in self.new_or_modified_files().await {
            let Some(name) = file_name(&file) else {
                continue;
            };
            let dest = self.pair.destination.join(&name);
            match self.storage.copy(&file, &dest).await {
                Ok(()) => self.log.success(&format!(
                    "Incrementally backed up file: {}",
                    file.display()
                )),
                Err(e) => self.log.error(&format!(
                    "Failed incremental backup for file: {} ({})",
                    file.display(),
                    e
                )),
            }
        }

        self.log.info("Incremental backup completed.");
    }

    /// 双向同步
    ///
    /// 第一阶段源 -> 目标：缺失则复制，源更新则先建立版本再覆盖。
    /// 第二阶段目标 -> 源：只补齐源中缺失的文件，不比较时间，不建立版本。
    pub async fn sync_files(&self) {
        self.log.info("Starting file synchronization...");
        self.ensure_destination_exists(false).await;

        let source_files = self.list_source_files().await;
        let dest_files = self.list_destination_files().await;

        for src_file in &source_files {
            let Some(name) = file_name(src_file) else {
                continue;
            };
            let dest = self.pair.destination.join(&name);

            let action = if self.storage.exists(&dest).await {
                match self.modified_times(src_file, &dest).await {
                    Some((src, dst)) => decide_sync(true, src, dst),
                    None => continue,
                }
            } else {
                SyncAction::New
            };

            match action {
                SyncAction::New => match self.storage.copy(src_file, &dest).await {
                    Ok(()) => self
                        .log
                        .success(&format!("Synchronized (new) file: {}", name)),
                    Err(e) => self.log.error(&format!(
                        "Failed to copy new file during sync: {} ({})",
                        name, e
                    )),
                },
                SyncAction::Update => {
                    // 版本失败时不能覆盖
                    if let Err(e) = self.version_file(&dest).await {
                        self.log.error(&format!(
                            "Skipped update of {} because versioning failed: {}",
                            name, e
                        ));
                        continue;
                    }
                    match self.storage.copy(src_file, &dest).await {
                        Ok(()) => self
                            .log
                            .success(&format!("Synchronized (updated) file: {}", name)),
                        Err(e) => self.log.error(&format!(
                            "Failed to update file during sync: {} ({})",
                            name, e
                        )),
                    }
                }
                SyncAction::Skip => {}
            }
        }

        for dest_file in &dest_files {
            let Some(name) = file_name(dest_file) else {
                continue;
            };
            let src = self.pair.source.join(&name);
            if self.storage.exists(&src).await {
                continue;
            }
            match self.storage.copy(dest_file, &src).await {
                Ok(()) => self.log.success(&format!(
                    "Synchronized (new) file from destination to source: {}",
                    name
                )),
                Err(e) => self.log.error(&format!(
                    "Failed to copy new file from destination during sync: {} ({})",
                    name, e
                )),
            }
        }

        self.log.info("File synchronization completed.");
    }

    /// 为即将被覆盖的目标文件建立版本快照，返回快照路径
    pub async fn version_file(&self, path: &Path) -> SyncResult<PathBuf> {
        self.version_file_at(path, &Local::now()).await
    }

    /// 使用给定时间建立版本快照
    pub async fn version_file_at(
        &self,
        path: &Path,
        now: &DateTime<Local>,
    ) -> SyncResult<PathBuf> {
        self.log
            .info(&format!("Versioning file: {}", path.display()));

        let name = match self.versioner.versioned_name(path, now) {
            Ok(n) => n,
            Err(e) => {
                if matches!(e, SyncError::TimestampFormat) {
                    self.log.error("Failed to generate timestamp for versioning.");
                } else {
                    self.log.error(&e.to_string());
                }
                return Err(e);
            }
        };

        let target = self.pair.destination.join(name);
        match self.storage.copy(path, &target).await {
            Ok(()) => {
                self.log
                    .success(&format!("Created versioned backup: {}", target.display()));
                Ok(target)
            }
            Err(e) => {
                self.log.error(&format!(
                    "Failed to create versioned backup for: {}",
                    path.display()
                ));
                Err(SyncError::VersionCopy {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// 轮询源目录变化，直到 `token` 被取消
    pub async fn monitor_changes(&self, interval: Duration, token: CancellationToken) {
        self.log.info(&format!(
            "Starting directory monitoring (interval: {} seconds)...",
            interval.as_secs()
        ));
        let mut monitor = ChangeMonitor::new(self).await;
        monitor.run(interval, &token).await;
    }
}

impl Clone for SyncEngine {
    fn clone(&self) -> Self {
        self.log.info("SyncEngine copy constructed.");
        Self {
            pair: self.pair.clone(),
            storage: self.storage.clone(),
            log: self.log.clone(),
            versioner: self.versioner.clone(),
        }
    }
}

impl Drop for SyncEngine {
    fn drop(&mut self) {
        self.log.info("SyncEngine destroyed.");
    }
}
