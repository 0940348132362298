//! Webview surface construction.
//!
//! The three surfaces are wry webviews built as children of the shell
//! window. The content surfaces (`default`, `internet`) carry the preload
//! bridge as an initialization script; the tab bar omits it because the
//! bridge adds noticeable load latency and the tab bar does not need it.
//! Surfaces start hidden; the shell controller decides visibility.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, warn};
use winit::event_loop::EventLoopProxy;
use winit::window::Window;
use wry::dpi::{PhysicalPosition, PhysicalSize};
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use crate::content::ContentSources;
use crate::ipc;
use crate::layout::{ShellLayout, SurfaceRect};
use crate::nav::{self, NavDisposition};
use crate::shell::{ShellEvent, SurfaceKind};

/// The three webviews backing the shell surfaces.
pub struct Surfaces {
    default_page: WebView,
    internet_page: WebView,
    tabbar: WebView,
}

impl Surfaces {
    /// Build all three surfaces as hidden children of `window`.
    pub fn build(
        window: &Arc<Window>,
        sources: &ContentSources,
        proxy: EventLoopProxy<ShellEvent>,
    ) -> Result<Self> {
        let preload = match std::fs::read_to_string(&sources.preload) {
            Ok(script) => Some(script),
            Err(e) => {
                warn!(
                    path = %sources.preload.display(),
                    error = %e,
                    "preload bridge not found; content surfaces get no bridge"
                );
                None
            }
        };

        let load_proxy = proxy.clone();
        let default_page = content_surface(&proxy, preload.as_deref())
            .with_url(sources.default_page.as_webview_url())
            .with_new_window_req_handler(|target: String| {
                match nav::window_open_disposition(&target) {
                    NavDisposition::OpenExternal => {
                        if let Err(e) = open::that_detached(&target) {
                            warn!(url = %target, error = %e, "failed to hand link to the OS");
                        }
                    }
                    NavDisposition::Block => {
                        debug!(url = %target, "blocked non-https window-open request");
                    }
                }
                // The in-page navigation is always denied.
                false
            })
            .with_on_page_load_handler(move |event, _url| {
                if let PageLoadEvent::Finished = event {
                    let _ = load_proxy.send_event(ShellEvent::PageLoadFinished(SurfaceKind::Default));
                }
            })
            .build_as_child(window.as_ref())
            .context("building default surface")?;

        // The internet surface is constructed up front but gets no initial
        // content; page script drives it after a view switch.
        let internet_page = content_surface(&proxy, preload.as_deref())
            .with_url("about:blank")
            .build_as_child(window.as_ref())
            .context("building internet surface")?;

        let tabbar = WebViewBuilder::new()
            .with_visible(false)
            .with_url(sources.tabbar_page.as_webview_url())
            .with_ipc_handler(ipc_forwarder(proxy))
            .build_as_child(window.as_ref())
            .context("building tabbar surface")?;

        Ok(Surfaces {
            default_page,
            internet_page,
            tabbar,
        })
    }

    fn get(&self, kind: SurfaceKind) -> &WebView {
        match kind {
            SurfaceKind::Default => &self.default_page,
            SurfaceKind::Internet => &self.internet_page,
            SurfaceKind::Tabbar => &self.tabbar,
        }
    }

    /// Apply computed bounds to all three surfaces. Content surfaces get
    /// identical bounds whether or not they are visible.
    pub fn apply_layout(&self, layout: &ShellLayout) -> wry::Result<()> {
        self.default_page.set_bounds(to_wry(layout.content))?;
        self.internet_page.set_bounds(to_wry(layout.content))?;
        self.tabbar.set_bounds(to_wry(layout.tabbar))?;
        Ok(())
    }

    /// Show or hide one surface. Hiding a hidden surface is a no-op.
    pub fn set_attached(&self, kind: SurfaceKind, attached: bool) -> wry::Result<()> {
        self.get(kind).set_visible(attached)
    }

    /// Push a one-way message into a surface's script context through the
    /// preload bridge.
    pub fn deliver(&self, kind: SurfaceKind, channel: &str, payload: &str) -> wry::Result<()> {
        let script = format!(
            "window.__TABSHELL__ && window.__TABSHELL__.deliver({}, {});",
            serde_json::Value::from(channel),
            serde_json::Value::from(payload),
        );
        self.get(kind).evaluate_script(&script)
    }
}

/// Builder for a content surface: hidden, bridged, with the preload script.
fn content_surface<'a>(
    proxy: &EventLoopProxy<ShellEvent>,
    preload: Option<&str>,
) -> WebViewBuilder<'a> {
    let mut builder = WebViewBuilder::new()
        .with_visible(false)
        .with_ipc_handler(ipc_forwarder(proxy.clone()));
    if let Some(script) = preload {
        builder = builder.with_initialization_script(script);
    }
    builder
}

/// Forward raw IPC bodies to the event loop as control messages. Bodies that
/// do not parse are dropped here; the channel carries no replies.
fn ipc_forwarder(
    proxy: EventLoopProxy<ShellEvent>,
) -> impl Fn(wry::http::Request<String>) + 'static {
    move |request| {
        if let Some(msg) = ipc::parse_control(request.body()) {
            let _ = proxy.send_event(ShellEvent::Control(msg));
        }
    }
}

fn to_wry(rect: SurfaceRect) -> wry::Rect {
    wry::Rect {
        position: PhysicalPosition::new(rect.x, rect.y).into(),
        size: PhysicalSize::new(rect.width, rect.height).into(),
    }
}
