//! Handing the order link to the system browser.

use thiserror::Error;
use tracing::info;

/// Errors that can occur when opening a link.
#[derive(Debug, Error)]
pub enum HandoffError {
    /// No browser could be launched.
    #[error("could not open browser: {0}")]
    Browser(#[from] std::io::Error),
}

/// Opens a URL in a new browsing context.
///
/// Fire-and-forget: success means the link was handed off, not that anything
/// was sent from the destination app.
pub trait LinkOpener: Send + Sync {
    /// Open `url`.
    ///
    /// # Errors
    ///
    /// Returns `HandoffError` if the link could not be handed off.
    fn open(&self, url: &str) -> Result<(), HandoffError>;
}

/// Opens links with the platform's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserOpener;

impl LinkOpener for BrowserOpener {
    fn open(&self, url: &str) -> Result<(), HandoffError> {
        webbrowser::open(url)?;
        info!(url_len = url.len(), "Order link opened in browser");
        Ok(())
    }
}
