//! Read-only access to the system clipboard.

/// Source of clipboard text for the controller.
pub trait ClipboardSource {
    /// Current clipboard text, or `None` when it holds no text.
    fn read_text(&mut self) -> Option<String>;
}

/// `arboard`-backed clipboard.
///
/// The handle is opened lazily and reopened after failures; on X11 the
/// connection can go stale while the process runs.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Option<&mut arboard::Clipboard> {
        if self.inner.is_none() {
            match arboard::Clipboard::new() {
                Ok(cb) => self.inner = Some(cb),
                Err(e) => {
                    tracing::warn!(error = %e, "clipboard unavailable");
                    return None;
                }
            }
        }
        self.inner.as_mut()
    }
}

impl ClipboardSource for SystemClipboard {
    fn read_text(&mut self) -> Option<String> {
        let cb = self.handle()?;
        match cb.get_text() {
            Ok(text) => Some(text),
            Err(arboard::Error::ContentNotAvailable) => None,
            Err(e) => {
                tracing::debug!(error = %e, "clipboard read failed, dropping handle");
                self.inner = None;
                None
            }
        }
    }
}
