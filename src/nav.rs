//! Window-open interception policy.
//!
//! Page script never gets to open windows: every new-window request is
//! denied in the shell. Requests for `https:` targets are handed to the
//! operating system's default handler instead; anything else is dropped.

use url::Url;

/// What to do with a new-window request originating from page script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDisposition {
    /// Deny the in-page navigation and open the URL with the OS default
    /// handler.
    OpenExternal,
    /// Deny with no further action.
    Block,
}

/// Classify a new-window request target.
pub fn window_open_disposition(target: &str) -> NavDisposition {
    match Url::parse(target) {
        Ok(url) if url.scheme() == "https" => NavDisposition::OpenExternal,
        _ => NavDisposition::Block,
    }
}
