use super::Storage;
use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use walkdir::WalkDir;

/// 本地文件系统
#[derive(Debug, Clone)]
pub struct LocalStorage {
    name: String,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self {
            name: "local".to_string(),
        }
    }

    /// 将 SystemTime 转换为 Unix 秒，早于纪元的时间为负数
    fn unix_seconds(time: SystemTime) -> i64 {
        match time.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            Err(e) => -(e.duration().as_secs() as i64),
        }
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn list_files(&self, dir: &Path) -> Vec<PathBuf> {
        if dir.as_os_str().is_empty() || !dir.is_dir() {
            tracing::debug!("目录不存在或不是目录: {}", dir.display());
            return Vec::new();
        }

        let base = dir.to_path_buf();

        // 使用 spawn_blocking 避免阻塞 async runtime
        let listed = tokio::task::spawn_blocking(move || {
            WalkDir::new(&base)
                .min_depth(1)
                .max_depth(1)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(e) => Some(e),
                    Err(err) => {
                        tracing::debug!("读取目录项失败 {}: {}", base.display(), err);
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .collect::<Vec<_>>()
        })
        .await;

        match listed {
            Ok(files) => files,
            Err(e) => {
                tracing::debug!("列举目录任务失败 {}: {}", dir.display(), e);
                Vec::new()
            }
        }
    }

    async fn modified_time(&self, path: &Path) -> SyncResult<i64> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|source| SyncError::ModifiedTime {
                path: path.to_path_buf(),
                source,
            })?;
        let modified = metadata
            .modified()
            .map_err(|source| SyncError::ModifiedTime {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::unix_seconds(modified))
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn copy(&self, from: &Path, to: &Path) -> SyncResult<()> {
        fs::copy(from, to)
            .await
            .map(|_| ())
            .map_err(|source| SyncError::Copy {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source,
            })
    }

    async fn create_dir_all(&self, path: &Path) -> SyncResult<()> {
        fs::create_dir_all(path)
            .await
            .map_err(|source| SyncError::CreateDir {
                path: path.to_path_buf(),
                source,
            })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
