//! Runtime configuration
//!
//! Settings come from the environment:
//! - `MILKSTD_REPORT_DIR`: where PDF reports are written
//! - `RUST_LOG`: log filter (see `init_logging`)

use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

pub const REPORT_DIR_ENV: &str = "MILKSTD_REPORT_DIR";

/// Project root, i.e. the executable's directory with `target/{debug,release}` stripped
fn project_root() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(parent) = path.parent() {
            if let Some(grandparent) = parent.parent() {
                path = grandparent.to_path_buf();
            }
        }
    }

    path
}

/// Get the report directory from environment or use default
pub fn report_directory() -> PathBuf {
    resolve_report_directory(std::env::var(REPORT_DIR_ENV).ok().as_deref())
}

fn resolve_report_directory(env_value: Option<&str>) -> PathBuf {
    match env_value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => project_root().join("reports"),
    }
}

/// Default report file for a calculation made at `timestamp`.
///
/// Names have one-second resolution; when a file with that name already
/// exists a `_2`, `_3`, ... suffix is appended instead of overwriting it.
pub fn default_report_path(dir: &Path, timestamp: &chrono::DateTime<chrono::Local>) -> PathBuf {
    let stem = format!("milk_standardization_{}", timestamp.format("%Y%m%d_%H%M%S"));

    let mut path = dir.join(format!("{}.pdf", stem));
    let mut n = 2;
    while path.exists() {
        path = dir.join(format!("{}_{}.pdf", stem, n));
        n += 1;
    }
    path
}

/// Initialize logging to stderr so stdout stays free for the MCP stdio transport
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::from_default_env().add_directive("milkstd=info".parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
