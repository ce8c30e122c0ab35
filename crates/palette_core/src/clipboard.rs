//! System clipboard access for copying color values.
//!
//! # Responsibility
//! - Hide the platform clipboard behind the `Clipboard` trait so actions can
//!   run against a recording double in tests.
//!
//! # Invariants
//! - `copy` either places the whole string on the clipboard or returns an
//!   error; partial writes are not reported as success.
//! - Copied text is never logged; events carry only its length.

use log::{info, warn};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ClipboardResult<T> = Result<T, ClipboardError>;

#[derive(Debug)]
pub enum ClipboardError {
    /// No clipboard is reachable (headless session, missing display server).
    Unavailable(String),
    /// The clipboard rejected the text.
    Write(String),
}

impl Display for ClipboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "clipboard unavailable: {message}"),
            Self::Write(message) => write!(f, "clipboard write failed: {message}"),
        }
    }
}

impl Error for ClipboardError {}

/// Write-only clipboard seam.
pub trait Clipboard {
    fn copy(&self, text: &str) -> ClipboardResult<()>;
}

impl<T: Clipboard + ?Sized> Clipboard for &T {
    fn copy(&self, text: &str) -> ClipboardResult<()> {
        (**self).copy(text)
    }
}

/// Clipboard of the desktop session, backed by `arboard`.
///
/// A fresh handle is opened per copy. On X11 the text stays available after
/// exit only when a clipboard manager takes ownership of it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> ClipboardResult<()> {
        let mut handle = arboard::Clipboard::new().map_err(|err| {
            warn!("event=clipboard_copy module=clipboard status=error error_code=unavailable");
            ClipboardError::Unavailable(err.to_string())
        })?;
        handle.set_text(text).map_err(|err| {
            warn!("event=clipboard_copy module=clipboard status=error error_code=write_failed");
            ClipboardError::Write(err.to_string())
        })?;
        info!(
            "event=clipboard_copy module=clipboard status=ok len={}",
            text.len()
        );
        Ok(())
    }
}

/// In-process clipboard that records every copied string.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    copied: RefCell<Vec<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every string copied so far, oldest first.
    pub fn copied(&self) -> Vec<String> {
        self.copied.borrow().clone()
    }

    /// Most recent clipboard content.
    pub fn contents(&self) -> Option<String> {
        self.copied.borrow().last().cloned()
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&self, text: &str) -> ClipboardResult<()> {
        self.copied.borrow_mut().push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Clipboard, MemoryClipboard};

    #[test]
    fn memory_clipboard_keeps_latest_copy() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.contents(), None);

        clipboard.copy("#012030").unwrap();
        (&clipboard).copy("#13678A").unwrap();

        assert_eq!(clipboard.contents().as_deref(), Some("#13678A"));
        assert_eq!(clipboard.copied(), ["#012030", "#13678A"]);
    }
}
