//! Browser port
//!
//! The remote browser is the one shared mutable resource of a run: current
//! page, focus and pending navigations all live on the other side of this
//! interface. Every call observes the live DOM; nothing is cached.

use async_trait::async_trait;
use harvest_domain::Locator;
use thiserror::Error;

/// The Enter key, as understood by [`BrowserPort::type_text`]
pub const ENTER: char = '\u{E007}';

/// Errors that can occur while driving the browser
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrowserError {
    #[error("No such element: {0}")]
    NoSuchElement(String),

    #[error("Stale element reference: {0}")]
    StaleElement(String),

    #[error("Element not interactable: {0}")]
    NotInteractable(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Protocol error: {0}")]
    ProtocolError(String),
}

impl BrowserError {
    /// Faults caused by the page still rendering; polling treats them as "try again"
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BrowserError::NoSuchElement(_)
                | BrowserError::StaleElement(_)
                | BrowserError::NotInteractable(_)
        )
    }
}

/// Opaque reference to an element found by [`BrowserPort::locate`].
///
/// Handles go stale once the page is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Identity of the page shown when the marker was taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMarker(String);

impl PageMarker {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Capabilities the crawler needs from a remote browser
#[async_trait]
pub trait BrowserPort: Send + Sync {
    /// Load `url` in the current tab
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    async fn current_url(&self) -> Result<String, BrowserError>;

    async fn page_source(&self) -> Result<String, BrowserError>;

    /// Elements matching `locator` in document order, optionally only displayed ones
    async fn locate(
        &self,
        locator: &Locator,
        visible_only: bool,
    ) -> Result<Vec<ElementHandle>, BrowserError>;

    /// Rendered text of an element
    async fn text(&self, element: &ElementHandle) -> Result<String, BrowserError>;

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, BrowserError>;

    /// Whether an `<option>` or checkbox is selected
    async fn is_selected(&self, element: &ElementHandle) -> Result<bool, BrowserError>;

    async fn click(&self, element: &ElementHandle) -> Result<(), BrowserError>;

    /// Send keystrokes; [`ENTER`] submits the surrounding form
    async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<(), BrowserError>;

    /// Mark the page currently shown, for a later [`page_replaced`](Self::page_replaced)
    async fn page_marker(&self) -> Result<PageMarker, BrowserError>;

    /// True once the marked page is gone and its successor has finished loading
    async fn page_replaced(&self, marker: &PageMarker) -> Result<bool, BrowserError>;
}
