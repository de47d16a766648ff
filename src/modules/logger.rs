use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_DIR_ENV: &str = "JIRA_BRIDGE_LOG_DIR";
const LOG_FILE_PREFIX: &str = "bridge.log";

// 本地时区时间戳, 毫秒精度
struct LocalTimer;

impl fmt::time::FormatTime for LocalTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = chrono::Local::now();
        write!(w, "{}", now.to_rfc3339_opts(chrono::SecondsFormat::Millis, false))
    }
}

/// Where the rolling log file goes: `JIRA_BRIDGE_LOG_DIR` when set, otherwise
/// `~/.jira_bridge/logs`.
pub fn resolve_log_dir<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(LOG_DIR_ENV) {
        Some(dir) if !dir.trim().is_empty() => Some(PathBuf::from(dir.trim())),
        _ => dirs::home_dir().map(|home| home.join(".jira_bridge").join("logs")),
    }
}

/// Creates `dir` if needed and returns a non-blocking daily writer into it.
/// `None` when the directory can't be created or written to.
fn file_writer(dir: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("Log directory {} unavailable: {}", dir.display(), e);
        return None;
    }
    if !accepts_writes(dir) {
        eprintln!("Log directory {} is not writable, logging to console only", dir.display());
        return None;
    }
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    Some(tracing_appender::non_blocking(appender))
}

fn accepts_writes(dir: &Path) -> bool {
    let marker = dir.join(".write_test");
    match fs::write(&marker, b"ok") {
        Ok(()) => {
            let _ = fs::remove_file(marker);
            true
        }
        Err(_) => false,
    }
}

/// 初始化日志系统
///
/// Console output always, plus the daily file when its directory is usable.
/// `RUST_LOG` overrides the `info` default. The returned guard flushes the
/// file writer on drop, so the caller keeps it alive until shutdown.
pub fn init_logger() -> Option<WorkerGuard> {
    // reqwest/hyper still emit through `log`
    let _ = tracing_log::LogTracer::init();

    let (file_layer, guard) = match resolve_log_dir(|key| std::env::var(key).ok())
        .as_deref()
        .and_then(file_writer)
    {
        Some((writer, guard)) => {
            let layer = fmt::Layer::new()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_timer(LocalTimer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = fmt::Layer::new().with_target(false).with_timer(LocalTimer);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    tracing::info!(file = guard.is_some(), "logging initialized");
    guard
}
