use anyhow::Context;
use mirrorvault_lib::logging::{activity_layer, diagnostics_filter, AppendWriter, LogConfig};
use mirrorvault_lib::storage::LocalStorage;
use mirrorvault_lib::{AppConfig, SyncEngine, TracingActivityLog};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::prelude::*;
use tracing_subscriber::Layer;

/// 初始化日志系统
///
/// 活动日志写到标准输出和日志文件；诊断日志只写到标准错误。
fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    if !config.enabled {
        // 日志已禁用，只初始化一个空的 subscriber
        let _ = tracing::subscriber::set_global_default(tracing_subscriber::registry());
        return Ok(());
    }

    let file_writer = AppendWriter::new(&config.file_path())
        .with_context(|| format!("无法打开日志文件: {}", config.file))?;

    let console_layer = config.console.then(|| activity_layer(std::io::stdout));

    let diagnostics_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_filter(diagnostics_filter(config)?);

    tracing_subscriber::registry()
        .with(activity_layer(file_writer))
        .with(console_layer)
        .with(diagnostics_layer)
        .try_init()?;

    Ok(())
}

/// 打印提示并读取一行输入
async fn prompt(lines: &mut Lines<BufReader<Stdin>>, question: &str) -> anyhow::Result<String> {
    print!("{}", question);
    std::io::stdout().flush()?;
    let line = lines
        .next_line()
        .await?
        .context("标准输入已关闭")?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    if let Err(e) = init_logging(&config.log) {
        // 文件日志创建失败，回退到控制台
        eprintln!("{:#}", e);
        let _ = tracing_subscriber::registry()
            .with(activity_layer(std::io::stdout))
            .try_init();
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let source = prompt(
        &mut lines,
        "Enter the path for file directory you want to make backup: ",
    )
    .await?;
    let destination = prompt(
        &mut lines,
        "Enter the path for file directory you want to save backup: ",
    )
    .await?;

    let storage = Arc::new(LocalStorage::new());
    let log = Arc::new(TracingActivityLog::new());

    let engine = if destination.is_empty() {
        SyncEngine::with_defaulted_destination(
            source,
            config.default_destination.clone(),
            storage,
            log,
        )
        .await
    } else {
        SyncEngine::new(source, destination, storage, log)
    };

    engine.perform_backup().await;
    engine.sync_files().await;

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("收到 Ctrl-C，停止监控");
            ctrl_c_token.cancel();
        }
    });

    engine
        .monitor_changes(config.poll_interval(), token)
        .await;

    Ok(())
}
