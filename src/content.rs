//! Content-source resolution for the shell surfaces.
//!
//! One environment value selects the startup mode: when
//! `TABSHELL_DEV_SERVER_URL` is present the default surface loads from the
//! live development server and the tab bar from the checked-in `public/`
//! assets; when it is absent everything loads from the packaged `dist/`
//! build output. The build that produces `dist/` is external to this crate.
//!
//! The packaged layout consumed here:
//!
//! - `public/favicon.ico`, `public/tabbar.html`   (dev assets)
//! - `dist/index.html`, `dist/tabbar.html`, `dist/favicon.ico`
//! - `preload/bridge.js`                          (surface preload script)

use std::path::{Path, PathBuf};

use url::Url;

/// Environment value that selects the development content sources.
pub const DEV_SERVER_ENV: &str = "TABSHELL_DEV_SERVER_URL";

/// Optional override for the resource root. A dev checkout sets this to the
/// repo root; without it the root is the executable's directory (the
/// packaged layout), or the working directory when the executable path is
/// unavailable.
pub const RESOURCES_ENV: &str = "TABSHELL_RESOURCES";

/// Where a surface loads its content from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A live development-server URL.
    DevServer(String),
    /// A packaged file under the resource root.
    PackagedFile(PathBuf),
}

impl Source {
    /// The URL handed to the webview.
    ///
    /// Packaged files are absolutized first: a relative path pushed through
    /// naive `file://` formatting would have its first component parsed as
    /// a host.
    pub fn as_webview_url(&self) -> String {
        match self {
            Source::DevServer(url) => url.clone(),
            Source::PackagedFile(path) => {
                let absolute = if path.is_absolute() {
                    path.clone()
                } else {
                    std::env::current_dir()
                        .map(|dir| dir.join(path))
                        .unwrap_or_else(|_| path.clone())
                };
                match Url::from_file_path(&absolute) {
                    Ok(url) => url.to_string(),
                    Err(()) => format!("file://{}", absolute.display()),
                }
            }
        }
    }
}

/// Resolved content sources and asset paths for one shell instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSources {
    pub default_page: Source,
    pub tabbar_page: Source,
    /// Preload bridge script injected into the content surfaces.
    pub preload: PathBuf,
    /// Window icon.
    pub icon: PathBuf,
}

impl ContentSources {
    /// Resolve sources from an explicit mode and resource root.
    pub fn resolve(dev_server_url: Option<&str>, resource_root: &Path) -> Self {
        let preload = resource_root.join("preload").join("bridge.js");

        match dev_server_url {
            Some(url) => {
                let public = resource_root.join("public");
                ContentSources {
                    default_page: Source::DevServer(url.to_string()),
                    tabbar_page: Source::PackagedFile(public.join("tabbar.html")),
                    icon: public.join("favicon.ico"),
                    preload,
                }
            }
            None => {
                let dist = resource_root.join("dist");
                ContentSources {
                    default_page: Source::PackagedFile(dist.join("index.html")),
                    tabbar_page: Source::PackagedFile(dist.join("tabbar.html")),
                    icon: dist.join("favicon.ico"),
                    preload,
                }
            }
        }
    }

    /// Resolve sources from the process environment.
    pub fn from_env() -> Self {
        let dev_url = std::env::var(DEV_SERVER_ENV).ok();
        let root = resource_root();
        Self::resolve(dev_url.as_deref(), &root)
    }
}

/// The directory packaged assets are resolved against. See [`RESOURCES_ENV`]
/// for the resolution order.
fn resource_root() -> PathBuf {
    if let Ok(dir) = std::env::var(RESOURCES_ENV) {
        return PathBuf::from(dir);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            return dir.to_path_buf();
        }
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
