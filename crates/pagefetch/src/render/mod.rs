//! Headless rendering.
//!
//! A [`RenderingClient`] opens one [`RenderSession`] per run; the session is
//! reused for every job and closed exactly once at the end.

use async_trait::async_trait;

use crate::error::FetchError;

pub mod chrome;

pub use chrome::ChromeClient;

/// Fully rendered markup of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContent {
    pub url: String,
    pub html: String,
}

#[async_trait]
pub trait RenderSession: Send + Sync {
    /// Navigates to `url`, waits for the network to go idle plus the settle
    /// delay, and returns the serialized document.
    async fn render(&self, url: &str) -> Result<RenderedContent, FetchError>;

    /// Releases the session. Calling it twice is a no-op.
    async fn close(&mut self) -> Result<(), FetchError>;
}

#[async_trait]
pub trait RenderingClient: Send + Sync {
    async fn open(&self) -> Result<Box<dyn RenderSession>, FetchError>;
}
