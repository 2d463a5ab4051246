//! 版本快照命名
//!
//! 被覆盖前的目标文件复制为 `<文件名>_<YYYYMMDD_HHMMSS><.扩展名>`，
//! 放在目标目录中，之后不再读取或清理。

use crate::error::{SyncError, SyncResult};
use chrono::{DateTime, TimeZone};
use std::fmt::{Display, Write};
use std::path::Path;

/// 默认时间戳格式（秒级）
pub const VERSION_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// 版本文件命名器
#[derive(Debug, Clone)]
pub struct Versioner {
    format: String,
}

impl Default for Versioner {
    fn default() -> Self {
        Self {
            format: VERSION_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl Versioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用自定义 strftime 格式
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// 格式化时间戳，格式串无效时返回 [`SyncError::TimestampFormat`]
    pub fn stamp<Tz>(&self, now: &DateTime<Tz>) -> SyncResult<String>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut out = String::new();
        write!(out, "{}", now.format(&self.format)).map_err(|_| SyncError::TimestampFormat)?;
        Ok(out)
    }

    /// 生成版本文件名
    pub fn versioned_name<Tz>(&self, path: &Path, now: &DateTime<Tz>) -> SyncResult<String>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let stamp = self.stamp(now)?;
        versioned_file_name(path, &stamp)
    }
}

/// `report.txt` + `20240102_030405` -> `report_20240102_030405.txt`
pub fn versioned_file_name(path: &Path, stamp: &str) -> SyncResult<String> {
    let stem = path
        .file_stem()
        .ok_or_else(|| SyncError::NoFileName(path.to_path_buf()))?
        .to_string_lossy();

    Ok(match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, stamp, ext.to_string_lossy()),
        None => format!("{}_{}", stem, stamp),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_versioned_name_keeps_extension() {
        let versioner = Versioner::new();
        let name = versioner
            .versioned_name(Path::new("/backup/report.txt"), &fixed_time())
            .unwrap();
        assert_eq!(name, "report_20240102_030405.txt");
    }

    #[test]
    fn test_versioned_name_without_extension() {
        assert_eq!(
            versioned_file_name(Path::new("backup/Makefile"), "20240102_030405").unwrap(),
            "Makefile_20240102_030405"
        );
        // 只有最后一个扩展名被保留
        assert_eq!(
            versioned_file_name(Path::new("a.tar.gz"), "20240102_030405").unwrap(),
            "a.tar_20240102_030405.gz"
        );
    }

    #[test]
    fn test_invalid_format_fails() {
        let versioner = Versioner::with_format("%Q");
        let err = versioner.stamp(&fixed_time()).unwrap_err();
        assert!(matches!(err, SyncError::TimestampFormat));
    }

    #[test]
    fn test_missing_file_name() {
        assert!(matches!(
            versioned_file_name(Path::new("/"), "x"),
            Err(SyncError::NoFileName(_))
        ));
    }
}
