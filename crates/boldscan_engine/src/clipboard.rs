//! Clipboard writes for the copy control.

use arboard::Clipboard;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard access failed: {0}")]
    AccessFailed(String),
}

#[async_trait::async_trait]
pub trait ClipboardWriter: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The desktop clipboard. Each write opens its own handle on the blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[async_trait::async_trait]
impl ClipboardWriter for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut clipboard =
                Clipboard::new().map_err(|e| ClipboardError::AccessFailed(e.to_string()))?;
            clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::AccessFailed(e.to_string()))
        })
        .await
        .map_err(|e| ClipboardError::AccessFailed(e.to_string()))?
    }
}
