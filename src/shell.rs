//! Shell controller: the window, the three surfaces, and the visible-set.
//!
//! The controller owns exactly one window and three webview surfaces. At most
//! one of the two content surfaces (`default`, `internet`) is visible at any
//! time; the tab bar is always visible once startup completes. All mutation
//! happens on the event-loop thread.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event_loop::{ActiveEventLoop, EventLoopProxy};
use winit::window::{Icon, Window};

use crate::content::ContentSources;
use crate::ipc::ControlMessage;
use crate::layout::ShellLayout;
use crate::surfaces::Surfaces;

/// Events delivered to the event loop from outside the window-event stream:
/// webview IPC, page-load observers, and the second-instance watcher.
#[derive(Debug, Clone)]
pub enum ShellEvent {
    /// A control message arrived on the webview IPC channel.
    Control(ControlMessage),
    /// A surface finished loading its content.
    PageLoadFinished(SurfaceKind),
    /// Another process instance asked us to come to the foreground.
    FocusRequested,
}

/// The three named surfaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SurfaceKind {
    #[default]
    Default,
    Internet,
    Tabbar,
}

impl SurfaceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SurfaceKind::Default => "default",
            SurfaceKind::Internet => "internet",
            SurfaceKind::Tabbar => "tabbar",
        }
    }
}

/// Which surfaces are visible. The tab bar is always in the set and is not a
/// valid switch target; exactly one content surface is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShellState {
    active: SurfaceKind,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a surface is in the visible set.
    pub fn is_attached(&self, kind: SurfaceKind) -> bool {
        match kind {
            SurfaceKind::Tabbar => true,
            other => other == self.active,
        }
    }

    /// Resolve a view-switch key and update the active surface.
    ///
    /// Returns the newly active surface, or `None` for unknown keys — the
    /// switch is fire-and-forget, so an unknown key is a silent no-op. The
    /// tab bar is deliberately not a valid target: it never leaves the
    /// visible set.
    pub fn change_view(&mut self, key: &str) -> Option<SurfaceKind> {
        let target = match key {
            "default" => SurfaceKind::Default,
            "internet" => SurfaceKind::Internet,
            _ => return None,
        };
        self.active = target;
        Some(target)
    }
}

/// What the event loop does with a shell event, given whether startup has
/// produced a shell yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    SwitchView(String),
    Greet,
    Focus,
    /// A focus request arrived with no window alive (possible on the
    /// platform that keeps the process running without windows): re-run
    /// the startup sequence.
    RunStartup,
    Ignore,
}

/// Decide how to act on an event delivered from outside the window-event
/// stream. Messages that need a shell are dropped while none exists; the
/// control channel is fire-and-forget, so that is a silent no-op.
pub fn dispatch(event: ShellEvent, shell_exists: bool) -> Dispatch {
    match event {
        ShellEvent::Control(ControlMessage::ChangeView { view }) => {
            if shell_exists {
                Dispatch::SwitchView(view)
            } else {
                debug!(view, "change-view before startup, ignoring");
                Dispatch::Ignore
            }
        }

        ShellEvent::PageLoadFinished(SurfaceKind::Default) if shell_exists => Dispatch::Greet,
        ShellEvent::PageLoadFinished(_) => Dispatch::Ignore,

        ShellEvent::FocusRequested => {
            if shell_exists {
                Dispatch::Focus
            } else {
                Dispatch::RunStartup
            }
        }
    }
}

/// A live shell: the window plus its three surfaces.
pub struct Shell {
    window: Arc<Window>,
    surfaces: Surfaces,
    state: ShellState,
}

impl Shell {
    /// Run the startup sequence: create the window, build the three
    /// surfaces, apply the initial layout, nudge the window size so the
    /// host paints surfaces added before the first real resize, and make
    /// `default` and the tab bar visible.
    pub fn create(
        event_loop: &ActiveEventLoop,
        sources: &ContentSources,
        proxy: EventLoopProxy<ShellEvent>,
    ) -> Result<Self> {
        let mut attrs = Window::default_attributes()
            .with_title("tabshell")
            .with_inner_size(LogicalSize::new(1024, 768));
        if let Some(icon) = load_window_icon(&sources.icon) {
            attrs = attrs.with_window_icon(Some(icon));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("creating shell window")?,
        );

        let surfaces =
            Surfaces::build(&window, sources, proxy).context("building shell surfaces")?;

        let size = window.inner_size();
        surfaces.apply_layout(&ShellLayout::compute(size.width, size.height))?;

        // Nudge the window height by one pixel so the host repaints the
        // child surfaces that were added before the first resize event.
        let _ = window.request_inner_size(PhysicalSize::new(size.width, size.height + 1));

        let state = ShellState::new();
        for kind in [SurfaceKind::Default, SurfaceKind::Internet, SurfaceKind::Tabbar] {
            surfaces.set_attached(kind, state.is_attached(kind))?;
        }

        info!(
            width = size.width,
            height = size.height,
            "shell window created"
        );

        Ok(Shell {
            window,
            surfaces,
            state,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Recompute and apply surface bounds for a new window size.
    pub fn handle_resize(&self, size: PhysicalSize<u32>) {
        let layout = ShellLayout::compute(size.width, size.height);
        if let Err(e) = self.surfaces.apply_layout(&layout) {
            warn!(error = %e, "failed to apply layout");
        }
    }

    /// Apply a view-switch message: hide both content surfaces, show the
    /// resolved target. Unknown keys do nothing.
    pub fn change_view(&mut self, key: &str) {
        let Some(target) = self.state.change_view(key) else {
            debug!(key, "change-view: unknown surface key, ignoring");
            return;
        };

        // Hiding an already-hidden surface is a no-op, so this is safe to
        // run unconditionally. The tab bar is untouched.
        let result = self
            .surfaces
            .set_attached(SurfaceKind::Default, false)
            .and_then(|_| self.surfaces.set_attached(SurfaceKind::Internet, false))
            .and_then(|_| self.surfaces.set_attached(target, true));
        match result {
            Ok(()) => info!(view = target.as_str(), "switched visible surface"),
            Err(e) => warn!(error = %e, "failed to switch surface"),
        }
    }

    /// Restore from a minimized state if needed and bring the window to the
    /// foreground. Used for the activate signal and second-instance pings.
    pub fn focus(&self) {
        if self.window.is_minimized().unwrap_or(false) {
            self.window.set_minimized(false);
        }
        self.window.focus_window();
    }

    /// Push the one-way greeting into the default surface's script context.
    pub fn send_greeting(&self) {
        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        if let Err(e) = self.surfaces.deliver(SurfaceKind::Default, "main-process-message", &stamp)
        {
            warn!(error = %e, "failed to deliver greeting");
        }
    }
}

/// Decode `favicon.ico` into a window icon. Any failure just means no icon.
fn load_window_icon(path: &Path) -> Option<Icon> {
    let decoded = match image::open(path) {
        Ok(img) => img.into_rgba8(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "window icon not loaded");
            return None;
        }
    };
    let (width, height) = decoded.dimensions();
    match Icon::from_rgba(decoded.into_raw(), width, height) {
        Ok(icon) => Some(icon),
        Err(e) => {
            warn!(error = %e, "window icon rejected by the host");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_active_after_startup() {
        let state = ShellState::new();
        assert!(state.is_attached(SurfaceKind::Default));
        assert!(!state.is_attached(SurfaceKind::Internet));
        assert!(state.is_attached(SurfaceKind::Tabbar));
    }

    #[test]
    fn exactly_one_content_surface_after_any_switch_sequence() {
        let mut state = ShellState::new();
        for key in ["internet", "default", "internet", "internet", "default"] {
            state.change_view(key);
            let attached = [SurfaceKind::Default, SurfaceKind::Internet]
                .iter()
                .filter(|&&k| state.is_attached(k))
                .count();
            assert_eq!(attached, 1);
            assert!(state.is_attached(SurfaceKind::Tabbar));
        }
    }

    #[test]
    fn last_valid_switch_wins_and_bogus_is_a_noop() {
        let mut state = ShellState::new();
        state.change_view("internet");
        state.change_view("default");
        assert_eq!(state.change_view("bogus"), None);
        assert!(state.is_attached(SurfaceKind::Default));
        assert!(!state.is_attached(SurfaceKind::Internet));
    }

    #[test]
    fn tabbar_is_not_a_switch_target() {
        let mut state = ShellState::new();
        assert_eq!(state.change_view("tabbar"), None);
        assert!(state.is_attached(SurfaceKind::Default));
    }

    #[test]
    fn default_state_matches_new() {
        assert_eq!(ShellState::default(), ShellState::new());
        assert_eq!(SurfaceKind::default(), SurfaceKind::Default);
    }

    #[test]
    fn pre_startup_messages_are_ignored() {
        let msg = ShellEvent::Control(ControlMessage::ChangeView {
            view: "internet".into(),
        });
        assert_eq!(dispatch(msg, false), Dispatch::Ignore);
        assert_eq!(
            dispatch(ShellEvent::PageLoadFinished(SurfaceKind::Default), false),
            Dispatch::Ignore
        );
    }

    #[test]
    fn events_reach_a_live_shell() {
        let msg = ShellEvent::Control(ControlMessage::ChangeView {
            view: "internet".into(),
        });
        assert_eq!(dispatch(msg, true), Dispatch::SwitchView("internet".into()));
        assert_eq!(
            dispatch(ShellEvent::PageLoadFinished(SurfaceKind::Default), true),
            Dispatch::Greet
        );
        assert_eq!(dispatch(ShellEvent::FocusRequested, true), Dispatch::Focus);
    }

    #[test]
    fn focus_request_without_a_window_restarts_the_shell() {
        assert_eq!(
            dispatch(ShellEvent::FocusRequested, false),
            Dispatch::RunStartup
        );
    }

    #[test]
    fn non_default_page_loads_do_not_greet() {
        assert_eq!(
            dispatch(ShellEvent::PageLoadFinished(SurfaceKind::Tabbar), true),
            Dispatch::Ignore
        );
    }
}
