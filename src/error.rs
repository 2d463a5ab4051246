//! 错误类型

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 单个文件操作的失败原因
#[derive(Debug, Error)]
pub enum SyncError {
    /// 复制失败（权限、源文件缺失、磁盘已满等）
    #[error("复制 {from} -> {to} 失败: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 读取修改时间失败（文件在列举后消失或不可访问）
    #[error("读取修改时间失败 {path}: {source}")]
    ModifiedTime {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 目标目录无法创建
    #[error("创建目录失败 {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 版本时间戳格式化失败
    #[error("生成版本时间戳失败")]
    TimestampFormat,

    /// 版本快照复制失败
    #[error("创建版本快照失败 {path}: {reason}")]
    VersionCopy { path: PathBuf, reason: String },

    /// 路径没有文件名部分
    #[error("路径缺少文件名: {0}")]
    NoFileName(PathBuf),
}

pub type SyncResult<T> = std::result::Result<T, SyncError>;
