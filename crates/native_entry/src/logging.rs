use std::env;
use std::fs;

use tracing_subscriber::EnvFilter;

/// Directory for daily log files. Without it, logs go to stderr; stdout is
/// never used, it carries the JSON-RPC protocol.
pub const LOG_DIR_ENV: &str = "SCRIPT_NODES_LOG_DIR";

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Ok(dir) = env::var(LOG_DIR_ENV) {
        fs::create_dir_all(&dir).ok();
        let appender = tracing_appender::rolling::daily(dir, "native_entry.log");
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(appender)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
