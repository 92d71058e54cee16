//! Navigation rules: where the crawler may go and how it finds things once there.
//!
//! - [`locator::Locator`]: XPath queries handed to the browser port
//! - [`url_guard::UrlGuard`]: vendor host allow-list checked after every navigation

pub mod locator;
pub mod url_guard;
