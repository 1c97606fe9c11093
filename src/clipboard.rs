use arboard::Clipboard;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to access system clipboard: {0}")]
    Unavailable(String),
    #[error("failed to copy text to clipboard: {0}")]
    Rejected(String),
    #[error("clipboard task did not complete: {0}")]
    Interrupted(String),
}

/// Asynchronous text sink for the system clipboard.
#[async_trait]
pub trait ClipboardService: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The OS clipboard through `arboard`. The blocking call runs on tokio's
/// blocking pool so the caller's task only suspends.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[async_trait]
impl ClipboardService for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || copy_to_clipboard(&text))
            .await
            .map_err(|e| ClipboardError::Interrupted(e.to_string()))?
    }
}

/// How long a write on Linux keeps ownership of the selection so a
/// clipboard manager can take the contents over before the process exits.
pub const LINUX_HANDOFF_WAIT: Duration = Duration::from_millis(250);

/// Copy text to the system clipboard.
///
/// On Linux X11 and Wayland the contents live as long as their owner, so the
/// call blocks for up to [`LINUX_HANDOFF_WAIT`] to let a clipboard manager
/// take them over.
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    let mut clipboard =
        Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;

    #[cfg(target_os = "linux")]
    {
        use arboard::SetExtLinux;
        use std::time::Instant;

        clipboard
            .set()
            .wait_until(Instant::now() + LINUX_HANDOFF_WAIT)
            .text(text.to_owned())
            .map_err(|e| ClipboardError::Rejected(e.to_string()))?;
    }

    #[cfg(not(target_os = "linux"))]
    {
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::Rejected(e.to_string()))?;
    }

    debug!(bytes = text.len(), "clipboard updated");
    Ok(())
}
