//! Application directory structure for tabshell.
//!
//! Resolves the standard directories and ensures they exist on first launch:
//!
//! - Data:     `~/Library/Application Support/com.tabshell.shell/` on macOS,
//!             XDG data dir elsewhere
//! - Logs:     `~/Library/Logs/tabshell/` on macOS, XDG data dir elsewhere
//! - Runtime:  `$XDG_RUNTIME_DIR/tabshell/` when available, otherwise a
//!             `runtime/` subdirectory of the data dir — holds the
//!             second-instance focus ping

use std::path::{Path, PathBuf};
use tracing::info;

const BUNDLE_ID: &str = "com.tabshell.shell";
const APP_NAME: &str = "tabshell";

/// All resolved application directory paths.
#[derive(Debug, Clone)]
pub struct ShellPaths {
    /// Machine-managed application data root
    pub data: PathBuf,
    /// Application logs
    pub logs: PathBuf,
    /// Per-session runtime state (focus ping)
    pub runtime: PathBuf,
}

impl ShellPaths {
    /// Resolve all paths from the user's home directory.
    /// Does not create any directories — call `ensure()` for that.
    pub fn resolve() -> Option<Self> {
        let home = std::env::var("HOME").ok().map(PathBuf::from)?;

        let data = resolve_data_dir(&home);
        let logs = resolve_log_dir(&home);
        let runtime = resolve_runtime_dir(&data);

        Some(Self { data, logs, runtime })
    }

    /// Create all directories that don't already exist.
    pub fn ensure(&self) -> std::io::Result<()> {
        for dir in [&self.data, &self.logs, &self.runtime] {
            std::fs::create_dir_all(dir)?;
            info!("ensured directory: {}", dir.display());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Platform-specific path resolution
// ---------------------------------------------------------------------------

#[cfg(target_os = "macos")]
fn resolve_data_dir(home: &Path) -> PathBuf {
    home.join("Library")
        .join("Application Support")
        .join(BUNDLE_ID)
}

#[cfg(not(target_os = "macos"))]
fn resolve_data_dir(home: &Path) -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join(APP_NAME)
    } else {
        home.join(".local").join("share").join(APP_NAME)
    }
}

#[cfg(target_os = "macos")]
fn resolve_log_dir(home: &Path) -> PathBuf {
    home.join("Library").join("Logs").join(APP_NAME)
}

#[cfg(not(target_os = "macos"))]
fn resolve_log_dir(home: &Path) -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join(APP_NAME).join("logs")
    } else {
        home.join(".local").join("share").join(APP_NAME).join("logs")
    }
}

fn resolve_runtime_dir(data: &Path) -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(xdg).join(APP_NAME)
    } else {
        data.join("runtime")
    }
}
