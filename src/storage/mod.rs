pub mod local;

use crate::error::SyncResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use local::LocalStorage;

/// 存储抽象接口
///
/// 每个方法只对应一次文件系统操作，不重试，不批量。
#[async_trait]
pub trait Storage: Send + Sync {
    /// 列出目录下的普通文件（不递归）
    ///
    /// 目录不存在或不可读时返回空列表，不向调用方报错。
    async fn list_files(&self, dir: &Path) -> Vec<PathBuf>;

    /// 获取修改时间（Unix 秒）
    async fn modified_time(&self, path: &Path) -> SyncResult<i64>;

    /// 检查路径是否存在
    async fn exists(&self, path: &Path) -> bool;

    /// 复制文件，目标存在时直接覆盖
    async fn copy(&self, from: &Path, to: &Path) -> SyncResult<()>;

    /// 递归创建目录
    async fn create_dir_all(&self, path: &Path) -> SyncResult<()>;

    /// 获取存储名称（用于日志）
    fn name(&self) -> &str;
}
