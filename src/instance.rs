//! Single-instance enforcement and the cross-process focus request.
//!
//! The lock is acquired before any UI exists; a process that fails to
//! acquire it writes a focus ping into the runtime directory and exits
//! without creating a window. The running instance watches the runtime
//! directory and brings its window to the foreground when the ping lands.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use single_instance::SingleInstance;
use tracing::{debug, warn};

const LOCK_NAME: &str = "com.tabshell.shell";
const FOCUS_PING: &str = "focus.ping";

/// Held for the lifetime of the process; dropping it releases the lock.
pub struct InstanceLock {
    _lock: SingleInstance,
}

/// Try to become the single running instance.
///
/// Returns `Ok(None)` when another instance already holds the lock.
pub fn acquire() -> Result<Option<InstanceLock>> {
    let lock = SingleInstance::new(LOCK_NAME)
        .map_err(|e| anyhow!("acquiring single-instance lock: {e}"))?;
    if lock.is_single() {
        Ok(Some(InstanceLock { _lock: lock }))
    } else {
        Ok(None)
    }
}

fn ping_path(runtime_dir: &Path) -> PathBuf {
    runtime_dir.join(FOCUS_PING)
}

/// Ask the running instance to come to the foreground, then return so the
/// caller can exit. Failure to write the ping is not worth reporting to a
/// user who never sees a window.
pub fn request_focus(runtime_dir: &Path) {
    let path = ping_path(runtime_dir);
    let stamp = chrono::Local::now().to_rfc3339();
    if let Err(e) = std::fs::write(&path, stamp) {
        debug!(path = %path.display(), error = %e, "failed to write focus ping");
    }
}

/// Watch the runtime directory for focus pings from later launches.
///
/// Watches the directory rather than the file itself: the ping file may not
/// exist yet, and writers that replace-by-rename would otherwise be missed.
/// The returned watcher must be kept alive for the duration of the process.
pub fn watch_focus_requests<F>(runtime_dir: &Path, on_request: F) -> Result<RecommendedWatcher>
where
    F: Fn() + Send + 'static,
{
    let dir = runtime_dir.to_path_buf();

    let mut watcher =
        notify::recommended_watcher(move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    return;
                }
                let hit = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().is_some_and(|n| n == FOCUS_PING));
                if hit {
                    on_request();
                }
            }
            Err(e) => {
                warn!(error = %e, "focus watcher error");
            }
        })?;

    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn focus_ping_lands_in_the_runtime_dir() {
        let tmp = tempfile::tempdir().expect("tempdir");
        request_focus(tmp.path());
        assert!(tmp.path().join("focus.ping").is_file());
    }

    #[test]
    fn watcher_fires_on_ping() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let (tx, rx) = mpsc::channel();

        let _watcher = watch_focus_requests(tmp.path(), move || {
            let _ = tx.send(());
        })
        .expect("watcher should start");

        request_focus(tmp.path());

        rx.recv_timeout(Duration::from_secs(5))
            .expect("focus request should be observed");
    }

    #[test]
    fn unrelated_files_do_not_fire() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let (tx, rx) = mpsc::channel();

        let _watcher = watch_focus_requests(tmp.path(), move || {
            let _ = tx.send(());
        })
        .expect("watcher should start");

        std::fs::write(tmp.path().join("other.txt"), "x").expect("write");

        assert!(rx.recv_timeout(Duration::from_millis(500)).is_err());
    }
}
