//! Browser adapters
//!
//! [`WebDriverBrowser`] implements the
//! [`BrowserPort`](harvest_application::BrowserPort) on fantoccini against an
//! externally started WebDriver server (chromedriver, Selenium).

mod webdriver;

pub use webdriver::{BrowserOptions, WebDriverBrowser};
