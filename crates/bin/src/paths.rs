//! Store location.

use std::path::PathBuf;

use yeouido::config::DEFAULT_STORE_FILE;

/// Get the default data directory.
///
/// Uses platform-specific data directories:
/// - Linux: `~/.local/share/yeouido/`
/// - macOS: `~/Library/Application Support/yeouido/`
/// - Windows: `%APPDATA%\yeouido\`
pub(crate) fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("yeouido")
}

/// Store path to use, falling back to the default location.
pub(crate) fn store_path(arg: Option<PathBuf>) -> PathBuf {
    arg.unwrap_or_else(|| default_data_dir().join(DEFAULT_STORE_FILE))
}
