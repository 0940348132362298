//! tabshell: a minimal desktop browser shell.
//!
//! One window, three webview surfaces (a default page, an internet page,
//! and a tab bar), manual resize-driven layout, and a one-way `change-view`
//! control message that swaps which content surface is visible.
//!
//! Uses winit for the window and event loop and wry for the surfaces.

mod content;
mod instance;
mod ipc;
mod layout;
mod logging;
mod nav;
mod paths;
mod shell;
mod surfaces;

use anyhow::Result;
use tracing::{info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy};

use content::ContentSources;
use notify::RecommendedWatcher;
use paths::ShellPaths;
use shell::{Dispatch, Shell, ShellEvent};

struct App {
    proxy: EventLoopProxy<ShellEvent>,
    sources: ContentSources,
    shell: Option<Shell>,
}

impl App {
    /// Run the startup sequence. Shared by the first `resumed` callback and
    /// a focus request that arrives after the last window closed.
    fn start_shell(&mut self, event_loop: &ActiveEventLoop) {
        match Shell::create(event_loop, &self.sources, self.proxy.clone()) {
            Ok(shell) => self.shell = Some(shell),
            Err(e) => {
                warn!(error = ?e, "failed to create shell window");
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler<ShellEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // First entry runs the startup sequence; later re-entries (platform
        // activate) just bring the existing window forward.
        if let Some(shell) = &self.shell {
            shell.focus();
            return;
        }
        self.start_shell(event_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(shell) = &self.shell else { return };
        if shell.window().id() != window_id {
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                if size.width != 0 && size.height != 0 {
                    shell.handle_resize(size);
                }
            }

            WindowEvent::CloseRequested => {
                self.shell = None;
                // macOS convention: the app stays alive without windows and
                // a later activate re-runs the startup sequence.
                if !cfg!(target_os = "macos") {
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: ShellEvent) {
        match shell::dispatch(event, self.shell.is_some()) {
            Dispatch::SwitchView(view) => {
                if let Some(shell) = &mut self.shell {
                    shell.change_view(&view);
                }
            }

            Dispatch::Greet => {
                if let Some(shell) = &self.shell {
                    shell.send_greeting();
                }
            }

            Dispatch::Focus => {
                if let Some(shell) = &self.shell {
                    info!("second launch detected, focusing existing window");
                    shell.focus();
                }
            }

            // A focus request with no window alive: on macOS the process
            // outlives its last window, so this is the way back to one.
            Dispatch::RunStartup => {
                info!("focus requested with no window, re-running startup");
                self.start_shell(event_loop);
            }

            Dispatch::Ignore => {}
        }
    }
}

fn main() -> Result<()> {
    let shell_paths = ShellPaths::resolve()
        .ok_or_else(|| anyhow::anyhow!("HOME is not set; cannot resolve app directories"))?;

    let _log_guard = logging::init(&shell_paths.logs);
    shell_paths.ensure()?;

    // Single-instance check happens before any UI exists. A second launch
    // pings the running instance and quits with a clean exit code.
    let Some(_instance_lock) = instance::acquire()? else {
        instance::request_focus(&shell_paths.runtime);
        return Ok(());
    };

    let sources = ContentSources::from_env();
    info!(?sources, "resolved content sources");

    let event_loop = EventLoop::<ShellEvent>::with_user_event().build()?;
    let proxy = event_loop.create_proxy();

    let focus_proxy = proxy.clone();
    let _focus_watcher: Option<RecommendedWatcher> =
        match instance::watch_focus_requests(&shell_paths.runtime, move || {
            let _ = focus_proxy.send_event(ShellEvent::FocusRequested);
        }) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!(error = ?e, "focus watcher unavailable; second launches won't focus us");
                None
            }
        };

    let mut app = App {
        proxy,
        sources,
        shell: None,
    };

    event_loop.run_app(&mut app)?;

    Ok(())
}
