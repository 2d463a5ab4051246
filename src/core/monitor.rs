//! 源目录变化轮询
//!
//! 每隔一段时间重新列举源目录，和上一次记录的列表比较路径的增减。
//! 只看路径是否存在，不看内容或修改时间。

use crate::core::comparator::ListingDiff;
use crate::core::engine::SyncEngine;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// 监控状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// 等待下一个轮询间隔
    Idle,
    /// 正在比较当前列表和上一次记录
    Comparing,
}

/// 单次轮询的结果
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    pub diff: ListingDiff,
    /// 是否执行了同步和增量备份
    pub synced: bool,
}

pub struct ChangeMonitor<'a> {
    engine: &'a SyncEngine,
    previous: Vec<PathBuf>,
    state: MonitorState,
}

impl<'a> ChangeMonitor<'a> {
    /// 以当前源目录列表作为初始记录
    pub async fn new(engine: &'a SyncEngine) -> Self {
        let previous = engine.list_source_files().await;
        Self::with_previous(engine, previous)
    }

    /// 以给定列表作为初始记录
    pub fn with_previous(engine: &'a SyncEngine, previous: Vec<PathBuf>) -> Self {
        Self {
            engine,
            previous,
            state: MonitorState::Idle,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// 上一次记录的源目录列表
    pub fn previous(&self) -> &[PathBuf] {
        &self.previous
    }

    /// 执行一次比较；有变化时执行一次同步和一次增量备份，并更新记录
    pub async fn tick(&mut self) -> TickOutcome {
        self.state = MonitorState::Comparing;
        let log = self.engine.log();

        let current = self.engine.list_source_files().await;
        let diff = ListingDiff::between(&self.previous, &current);

        for file in &diff.removed {
            log.info(&format!("File removed from source: {}", file.display()));
        }
        for file in &diff.added {
            log.info(&format!("New file added to source: {}", file.display()));
        }

        let synced = !diff.is_empty();
        if synced {
            log.info("Change detected. Initiating synchronization and incremental backup...");
            self.engine.sync_files().await;
            self.engine.incremental_backup().await;
            self.previous = current;
        }

        self.state = MonitorState::Idle;
        TickOutcome { diff, synced }
    }

    /// 循环轮询，直到 `token` 被取消
    ///
    /// 取消只在等待间隔时生效，进行中的同步和备份总会完成。
    pub async fn run(&mut self, interval: Duration, token: &CancellationToken) {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    self.engine.log().info("Directory monitoring stopped.");
                    return;
                }
                _ = tokio::time::sleep(interval) => {}
            }
            self.tick().await;
        }
    }
}
