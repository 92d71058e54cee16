//! WebDriver browser adapter.
//!
//! Drives an already running driver (chromedriver, Selenium) through
//! fantoccini. One adapter owns exactly one browser session; call
//! [`WebDriverBrowser::close`] to end it.

use async_trait::async_trait;
use fantoccini::elements::{Element, ElementRef};
use fantoccini::error::{CmdError, ErrorStatus, NewSessionError};
use fantoccini::{Client, ClientBuilder, Locator as By};
use harvest_application::{BrowserError, BrowserPort, ElementHandle, PageMarker};
use harvest_domain::Locator;
use serde_json::{Map, Value, json};
use std::path::PathBuf;
use tracing::{debug, info, trace};

const READY_STATE_SCRIPT: &str = "return document.readyState";

/// Chrome settings for a new session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserOptions {
    pub headless: bool,
    /// Persistent profile, so cookies survive between runs
    pub profile_dir: Option<PathBuf>,
    /// Extra command-line switches
    pub args: Vec<String>,
}

impl BrowserOptions {
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.headless {
            args.push("--headless=new".to_string());
        }
        if let Some(dir) = &self.profile_dir {
            args.push(format!("--user-data-dir={}", dir.display()));
        }
        args.extend(self.args.iter().cloned());
        args
    }

    /// `alwaysMatch` capabilities for the new session
    pub fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert("browserName".to_string(), json!("chrome"));
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": self.chrome_args() }),
        );
        caps
    }
}

pub struct WebDriverBrowser {
    client: Client,
}

impl WebDriverBrowser {
    /// Open a new browser session on the driver at `endpoint`
    pub async fn connect(endpoint: &str, options: &BrowserOptions) -> Result<Self, BrowserError> {
        info!("Connecting to WebDriver at {}", endpoint);
        let client = ClientBuilder::native()
            .capabilities(options.capabilities())
            .connect(endpoint)
            .await
            .map_err(map_session_error)?;
        Ok(Self { client })
    }

    /// End the browser session
    pub async fn close(&self) -> Result<(), BrowserError> {
        info!("Closing WebDriver session");
        self.client.clone().close().await.map_err(map_error)
    }

    fn element(&self, handle: &ElementHandle) -> Element {
        Element::from_element_id(self.client.clone(), ElementRef::from(handle.id().to_string()))
    }
}

fn handle(element: &Element) -> ElementHandle {
    ElementHandle::new(element.element_id().to_string())
}

fn map_session_error(e: NewSessionError) -> BrowserError {
    match e {
        NewSessionError::SessionNotCreated(wd) => BrowserError::SessionError(wd.to_string()),
        other => BrowserError::ConnectionError(format!("Failed to reach WebDriver: {}", other)),
    }
}

fn map_error(e: CmdError) -> BrowserError {
    match e {
        CmdError::Standard(wd) => match wd.error {
            ErrorStatus::NoSuchElement => BrowserError::NoSuchElement(wd.to_string()),
            ErrorStatus::StaleElementReference => BrowserError::StaleElement(wd.to_string()),
            ErrorStatus::ElementNotInteractable | ErrorStatus::ElementClickIntercepted => {
                BrowserError::NotInteractable(wd.to_string())
            }
            ErrorStatus::InvalidSessionId | ErrorStatus::SessionNotCreated => {
                BrowserError::SessionError(wd.to_string())
            }
            _ => BrowserError::ProtocolError(wd.to_string()),
        },
        CmdError::Lost(e) => BrowserError::ConnectionError(e.to_string()),
        other => BrowserError::ProtocolError(other.to_string()),
    }
}

#[async_trait]
impl BrowserPort for WebDriverBrowser {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        debug!("Navigating to {}", url);
        self.client.goto(url).await.map_err(map_error)
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        let url = self.client.current_url().await.map_err(map_error)?;
        Ok(url.to_string())
    }

    async fn page_source(&self) -> Result<String, BrowserError> {
        self.client.source().await.map_err(map_error)
    }

    /// Elements that go stale while their visibility is checked are left out
    async fn locate(
        &self,
        locator: &Locator,
        visible_only: bool,
    ) -> Result<Vec<ElementHandle>, BrowserError> {
        let elements = self
            .client
            .find_all(By::XPath(locator.as_str()))
            .await
            .map_err(map_error)?;

        let mut handles = Vec::new();
        for element in &elements {
            if visible_only {
                match element.is_displayed().await.map_err(map_error) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) if e.is_transient() => {
                        trace!("Dropping element that went away: {}", e);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }
            handles.push(handle(element));
        }
        trace!("{} -> {} element(s)", locator, handles.len());
        Ok(handles)
    }

    async fn text(&self, element: &ElementHandle) -> Result<String, BrowserError> {
        self.element(element).text().await.map_err(map_error)
    }

    /// Resolved DOM property first (absolute `href`), then the raw attribute
    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        let element = self.element(element);
        if let Some(value) = element.prop(name).await.map_err(map_error)? {
            return Ok(Some(value));
        }
        element.attr(name).await.map_err(map_error)
    }

    async fn is_selected(&self, element: &ElementHandle) -> Result<bool, BrowserError> {
        self.element(element).is_selected().await.map_err(map_error)
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), BrowserError> {
        self.element(element).click().await.map_err(map_error)
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<(), BrowserError> {
        self.element(element).send_keys(text).await.map_err(map_error)
    }

    /// The current `<html>` element
    async fn page_marker(&self) -> Result<PageMarker, BrowserError> {
        let root = self
            .client
            .find(By::XPath("/html"))
            .await
            .map_err(map_error)?;
        Ok(PageMarker::new(root.element_id().to_string()))
    }

    /// The marked `<html>` element is gone and the new document has loaded
    async fn page_replaced(&self, marker: &PageMarker) -> Result<bool, BrowserError> {
        let root = Element::from_element_id(
            self.client.clone(),
            ElementRef::from(marker.id().to_string()),
        );
        match root.tag_name().await.map_err(map_error) {
            Ok(_) => return Ok(false),
            Err(e) if e.is_transient() => {}
            Err(e) => return Err(e),
        }
        let state = self
            .client
            .execute(READY_STATE_SCRIPT, Vec::new())
            .await
            .map_err(map_error)?;
        Ok(state.as_str() == Some("complete"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fantoccini::error::WebDriver;

    #[test]
    fn test_chrome_args() {
        let options = BrowserOptions {
            headless: true,
            profile_dir: Some(PathBuf::from("/cache/amazon")),
            args: vec!["--disable-gpu".into()],
        };
        assert_eq!(
            options.chrome_args(),
            vec![
                "--headless=new".to_string(),
                "--user-data-dir=/cache/amazon".to_string(),
                "--disable-gpu".to_string(),
            ]
        );
    }

    #[test]
    fn test_capabilities() {
        let caps = BrowserOptions::default().capabilities();
        assert_eq!(caps["browserName"], "chrome");
        assert_eq!(caps["goog:chromeOptions"]["args"], json!([]));
    }

    #[test]
    fn test_error_mapping() {
        let stale = CmdError::Standard(WebDriver::new(
            ErrorStatus::StaleElementReference,
            "element is not attached",
        ));
        assert!(matches!(map_error(stale), BrowserError::StaleElement(_)));

        let missing = CmdError::Standard(WebDriver::new(ErrorStatus::NoSuchElement, "//a"));
        assert!(map_error(missing).is_transient());

        let session = CmdError::Standard(WebDriver::new(ErrorStatus::InvalidSessionId, "gone"));
        assert!(matches!(map_error(session), BrowserError::SessionError(_)));
    }

    #[tokio::test]
    async fn test_connect_to_unreachable_driver() {
        let result =
            WebDriverBrowser::connect("http://127.0.0.1:9", &BrowserOptions::default()).await;
        assert!(matches!(result, Err(BrowserError::ConnectionError(_))));
    }
}
