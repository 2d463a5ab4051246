//! 日志模块 - 提供控制台和追加写入的文件日志

use crate::activity::ACTIVITY_TARGET;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::{filter_fn, EnvFilter};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    /// 是否启用日志记录
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// 日志级别: "error", "warn", "info", "debug", "trace"
    #[serde(default = "default_level")]
    pub level: String,
    /// 日志文件路径
    #[serde(default = "default_file")]
    pub file: String,
    /// 是否同时输出到控制台
    #[serde(default = "default_console")]
    pub console: bool,
}

fn default_enabled() -> bool {
    true
}

fn default_level() -> String {
    "info".to_string()
}

fn default_file() -> String {
    "file_manager.log".to_string()
}

fn default_console() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            level: default_level(),
            file: default_file(),
            console: default_console(),
        }
    }
}

impl LogConfig {
    /// 将配置的日志级别转换为 tracing Level
    pub fn tracing_level(&self) -> tracing::Level {
        match self.level.to_lowercase().as_str() {
            "error" => tracing::Level::ERROR,
            "warn" => tracing::Level::WARN,
            "debug" => tracing::Level::DEBUG,
            "trace" => tracing::Level::TRACE,
            _ => tracing::Level::INFO,
        }
    }

    pub fn file_path(&self) -> PathBuf {
        PathBuf::from(&self.file)
    }
}

/// 追加写入的日志文件，不做轮转
#[derive(Clone)]
pub struct AppendWriter {
    file_path: PathBuf,
    writer: Arc<Mutex<BufWriter<File>>>,
}

impl AppendWriter {
    pub fn new(file_path: &Path) -> io::Result<Self> {
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;

        Ok(Self {
            file_path: file_path.to_path_buf(),
            writer: Arc::new(Mutex::new(BufWriter::new(file))),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

/// 日志写入器包装
pub struct LogWriter {
    inner: Arc<Mutex<BufWriter<File>>>,
}

impl LogWriter {
    fn lock(&self) -> io::Result<MutexGuard<'_, BufWriter<File>>> {
        self.inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer poisoned"))
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut writer = self.lock()?;
        let written = writer.write(buf)?;
        writer.flush()?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.flush()
    }
}

impl<'a> MakeWriter<'a> for AppendWriter {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            inner: self.writer.clone(),
        }
    }
}

/// 活动日志格式：只输出消息本身，即 `[TAG]: msg`
#[derive(Debug, Default, Clone, Copy)]
pub struct ActivityFormat;

impl<S, N> FormatEvent<S, N> for ActivityFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// 只接收活动日志事件的输出层，不受级别过滤影响
pub fn activity_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .event_format(ActivityFormat)
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(filter_fn(|meta| meta.target() == ACTIVITY_TARGET))
}

/// 诊断日志过滤器：配置的级别叠加 RUST_LOG，排除活动日志事件
pub fn diagnostics_filter(config: &LogConfig) -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive(config.tracing_level().into())
        .add_directive(format!("{}=off", ACTIVITY_TARGET).parse()?))
}
