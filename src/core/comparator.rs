use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// 源 -> 目标方向上单个文件的同步动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// 目标中不存在同名文件，直接复制
    New,
    /// 源文件更新，先为目标文件建立版本再覆盖
    Update,
    /// 时间相同或目标更新，不处理
    Skip,
}

/// 文件的逻辑身份：路径最后一段
///
/// 同名即视为同一文件，不比较内容。
pub fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// 源时间严格大于目标时间才算修改过，相等不算
pub fn is_newer(source_time: i64, dest_time: i64) -> bool {
    source_time > dest_time
}

/// 增量备份判定：目标缺失，或源更新
///
/// `dest_time` 为 `None` 表示目标中没有同名文件。
pub fn is_new_or_modified(source_time: i64, dest_time: Option<i64>) -> bool {
    match dest_time {
        None => true,
        Some(dest) => is_newer(source_time, dest),
    }
}

/// 源 -> 目标方向的同步判定
pub fn decide_sync(dest_exists: bool, source_time: i64, dest_time: i64) -> SyncAction {
    if !dest_exists {
        SyncAction::New
    } else if is_newer(source_time, dest_time) {
        SyncAction::Update
    } else {
        SyncAction::Skip
    }
}

/// 两次列举之间的路径差异
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingDiff {
    /// 之前存在、现在消失
    pub removed: Vec<PathBuf>,
    /// 之前没有、现在出现
    pub added: Vec<PathBuf>,
}

impl ListingDiff {
    /// 按路径字符串比较两次列举，只看存在与否
    pub fn between(previous: &[PathBuf], current: &[PathBuf]) -> Self {
        let before: BTreeSet<&PathBuf> = previous.iter().collect();
        let now: BTreeSet<&PathBuf> = current.iter().collect();

        Self {
            removed: before.difference(&now).map(|p| (*p).clone()).collect(),
            added: now.difference(&before).map(|p| (*p).clone()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}
