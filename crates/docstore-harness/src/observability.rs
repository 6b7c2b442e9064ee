//! Process-wide log setup. Procedure results own stdout, so log lines go to
//! stderr or to a JSONL file.
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

static INIT: OnceCell<()> = OnceCell::new();

const DEFAULT_LOG_FILE: &str = "docstore-harness.logs.jsonl";

#[derive(Debug, PartialEq, Eq)]
enum LogSink {
    Off,
    Stderr,
    JsonFile(PathBuf),
}

impl LogSink {
    /// Reads `DOCSTORE_OBSERVABILITY` (only an explicit "off" value disables
    /// logging) and `DOCSTORE_JSON_LOG_PATH`.
    fn from_env() -> Self {
        Self::resolve(
            std::env::var("DOCSTORE_OBSERVABILITY").ok().as_deref(),
            std::env::var_os("DOCSTORE_JSON_LOG_PATH").map(PathBuf::from),
        )
    }

    fn resolve(switch: Option<&str>, json_path: Option<PathBuf>) -> Self {
        let disabled = switch.is_some_and(|value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off" | "disabled"
            )
        });
        match json_path {
            _ if disabled => Self::Off,
            Some(path) if !path.as_os_str().is_empty() => Self::JsonFile(path),
            _ => Self::Stderr,
        }
    }
}

/// `DOCSTORE_LOG_LEVEL` first, then `RUST_LOG`, then `info`.
fn env_filter() -> EnvFilter {
    std::env::var("DOCSTORE_LOG_LEVEL")
        .ok()
        .and_then(|level| EnvFilter::try_new(level).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Installs the global subscriber once per process.
pub fn init_observability() {
    INIT.get_or_init(|| {
        let registry = tracing_subscriber::registry().with(env_filter());
        match LogSink::from_env() {
            LogSink::Off => {}
            LogSink::Stderr => {
                let console = tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr);
                let _ = registry.with(console).try_init();
            }
            LogSink::JsonFile(path) => {
                let dir = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or(Path::new("."));
                let _ = std::fs::create_dir_all(dir);
                let file_name = path
                    .file_name()
                    .map_or_else(|| DEFAULT_LOG_FILE.into(), |name| name.to_os_string());
                let json = tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(tracing_appender::rolling::never(dir, file_name));
                let _ = registry.with(json).try_init();
            }
        }
    });
}
