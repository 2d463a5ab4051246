//! 活动日志 - 信息、错误、成功三个通道
//!
//! 核心逻辑通过 [`ActivityLog`] 上报结果，不直接依赖全局日志。

use std::fmt;
use std::sync::Mutex;

/// 日志通道
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Info,
    Error,
    Success,
}

impl Channel {
    /// 行前缀标签
    pub fn tag(self) -> &'static str {
        match self {
            Channel::Info => "[INFO]",
            Channel::Error => "[ERROR]",
            Channel::Success => "[SUCCESS]",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 格式化一行日志，例如 `[INFO]: Full backup completed.`
pub fn render_line(channel: Channel, msg: &str) -> String {
    format!("{}: {}", channel.tag(), msg)
}

/// 活动日志事件使用的 tracing target，不受日志级别配置过滤
pub const ACTIVITY_TARGET: &str = "activity";

/// 活动日志接口
pub trait ActivityLog: Send + Sync {
    fn info(&self, msg: &str);
    fn error(&self, msg: &str);
    fn success(&self, msg: &str);
}

/// 通过 tracing 输出，由 [`crate::logging::activity_layer`] 写到控制台和日志文件
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingActivityLog;

impl TracingActivityLog {
    pub fn new() -> Self {
        Self
    }
}

impl ActivityLog for TracingActivityLog {
    fn info(&self, msg: &str) {
        tracing::info!(target: ACTIVITY_TARGET, "{}", render_line(Channel::Info, msg));
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: ACTIVITY_TARGET, "{}", render_line(Channel::Error, msg));
    }

    fn success(&self, msg: &str) {
        tracing::info!(target: ACTIVITY_TARGET, "{}", render_line(Channel::Success, msg));
    }
}

/// 内存日志，记录每一条消息
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<(Channel, String)>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, channel: Channel, msg: &str) {
        // 锁中毒时仍然保留已有记录
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push((channel, msg.to_string()));
    }

    /// 所有记录的副本
    pub fn entries(&self) -> Vec<(Channel, String)> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// 按 `[TAG]: msg` 格式渲染的所有行
    pub fn lines(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .map(|(channel, msg)| render_line(channel, &msg))
            .collect()
    }

    /// 指定通道中包含 `needle` 的消息数
    pub fn count(&self, channel: Channel, needle: &str) -> usize {
        self.entries()
            .iter()
            .filter(|(c, m)| *c == channel && m.contains(needle))
            .count()
    }

    /// 清空记录
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl ActivityLog for MemoryLog {
    fn info(&self, msg: &str) {
        self.push(Channel::Info, msg);
    }

    fn error(&self, msg: &str) {
        self.push(Channel::Error, msg);
    }

    fn success(&self, msg: &str) {
        self.push(Channel::Success, msg);
    }
}
