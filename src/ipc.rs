//! Inbound control-channel messages.
//!
//! The preload bridge posts JSON bodies over the webview IPC channel. The
//! channel is one-way and fire-and-forget: anything that does not parse into
//! a known message is dropped without a reply or an error.

use serde::Deserialize;
use tracing::debug;

/// A control message received from a surface's page script.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "cmd", rename_all = "kebab-case")]
pub enum ControlMessage {
    /// Switch the visible content surface. `view` is a surface key
    /// (`default` or `internet`); unknown keys are ignored downstream.
    ChangeView { view: String },
}

/// Parse a raw IPC body. Returns `None` for malformed or unknown messages.
pub fn parse_control(body: &str) -> Option<ControlMessage> {
    match serde_json::from_str(body) {
        Ok(msg) => Some(msg),
        Err(e) => {
            debug!(error = %e, "ignoring unparseable control message");
            None
        }
    }
}
