//! Per-run crawl context
//!
//! Carries the browser, the vendor profile and the wait policy into every
//! stage of a run. There is no global state: each run builds one context.

use crate::config::WaitPolicy;
use crate::ports::browser::{BrowserPort, ElementHandle};
use crate::use_cases::error::CrawlError;
use crate::wait::{self, WaitError};
use harvest_domain::{DomainProfile, Locator, RecordPatterns, UrlGuard};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;
use url::Url;

pub struct CrawlContext {
    browser: Arc<dyn BrowserPort>,
    profile: DomainProfile,
    patterns: RecordPatterns,
    guard: UrlGuard,
    policy: WaitPolicy,
}

impl CrawlContext {
    /// Fails with [`CrawlError::Configuration`] if the profile's patterns
    /// do not compile.
    pub fn new(
        browser: Arc<dyn BrowserPort>,
        profile: DomainProfile,
        policy: WaitPolicy,
    ) -> Result<Self, CrawlError> {
        let patterns = RecordPatterns::for_profile(&profile)?;
        let guard = profile.url_guard()?;
        Ok(Self {
            browser,
            profile,
            patterns,
            guard,
            policy,
        })
    }

    pub fn browser(&self) -> &dyn BrowserPort {
        self.browser.as_ref()
    }

    pub fn profile(&self) -> &DomainProfile {
        &self.profile
    }

    pub fn patterns(&self) -> &RecordPatterns {
        &self.patterns
    }

    pub fn policy(&self) -> &WaitPolicy {
        &self.policy
    }

    /// Validate a URL before navigating to it
    pub fn check_url(&self, url: &str) -> Result<Url, CrawlError> {
        Ok(self.guard.check(url)?)
    }

    /// Validate wherever the browser ended up
    pub async fn check_current_url(&self) -> Result<Url, CrawlError> {
        let current = self.browser.current_url().await?;
        self.check_url(&current)
    }

    /// Run a navigation-causing `action`, wait for the new page, then make
    /// sure it is still on the vendor's domain.
    pub async fn barrier<T, Fut>(&self, action: Fut) -> Result<T, CrawlError>
    where
        Fut: Future<Output = Result<T, CrawlError>>,
    {
        let value = wait::with_page_load_barrier(self.browser(), &self.policy, action).await?;
        let url = self.check_current_url().await?;
        debug!("Page loaded: {}", url);
        Ok(value)
    }

    /// Navigate to `url` across a page-load barrier
    pub async fn open(&self, url: &str) -> Result<(), CrawlError> {
        self.check_url(url)?;
        let browser = self.browser();
        self.barrier(async move {
            browser.navigate(url).await?;
            Ok(())
        })
        .await
    }

    /// Click `element` across a page-load barrier
    pub async fn click_and_wait(&self, element: &ElementHandle) -> Result<(), CrawlError> {
        let browser = self.browser();
        self.barrier(async move {
            browser.click(element).await?;
            Ok(())
        })
        .await
    }

    /// Type `text` into `element` across a page-load barrier
    pub async fn type_and_wait(&self, element: &ElementHandle, text: &str) -> Result<(), CrawlError> {
        let browser = self.browser();
        self.barrier(async move {
            browser.type_text(element, text).await?;
            Ok(())
        })
        .await
    }

    /// Locate once, without waiting
    pub async fn find(
        &self,
        locator: &Locator,
        visible_only: bool,
    ) -> Result<Vec<ElementHandle>, CrawlError> {
        Ok(self.browser.locate(locator, visible_only).await?)
    }

    /// Wait until `locator` matches at least one element
    pub async fn wait_for(
        &self,
        locator: &Locator,
        visible_only: bool,
    ) -> Result<Vec<ElementHandle>, WaitError> {
        let browser = self.browser();
        wait::wait_until(&self.policy, || async move {
            Ok(wait::non_empty(browser.locate(locator, visible_only).await?))
        })
        .await
    }

    /// Wait for `locator` and take its first match
    pub async fn wait_for_one(
        &self,
        locator: &Locator,
        visible_only: bool,
    ) -> Result<ElementHandle, WaitError> {
        let browser = self.browser();
        wait::wait_until(&self.policy, || async move {
            Ok(browser.locate(locator, visible_only).await?.into_iter().next())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBrowser, FakePage, fast_policy};
    use harvest_domain::tables::DOT_DE;

    #[tokio::test(start_paused = true)]
    async fn test_open_rejects_off_domain_before_navigating() {
        let browser = Arc::new(FakeBrowser::new());
        let ctx = CrawlContext::new(browser.clone(), DOT_DE, fast_policy()).unwrap();

        let err = ctx.open("https://amazon.de.evil.example/").await.unwrap_err();
        assert!(matches!(err, CrawlError::Navigation(_)));
        assert!(browser.navigations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_redirect_off_domain_is_caught_after_barrier() {
        let browser = Arc::new(FakeBrowser::new());
        browser.add_page(
            "https://www.amazon.de/",
            FakePage::new().redirect_to("https://evil.example/"),
        );
        browser.add_page("https://evil.example/", FakePage::new());
        let ctx = CrawlContext::new(browser.clone(), DOT_DE, fast_policy()).unwrap();

        let err = ctx.open("https://www.amazon.de/").await.unwrap_err();
        assert!(matches!(err, CrawlError::Navigation(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_times_out_on_missing_element() {
        let browser = Arc::new(FakeBrowser::new());
        browser.add_page("https://www.amazon.de/", FakePage::new());
        let ctx = CrawlContext::new(browser.clone(), DOT_DE, fast_policy()).unwrap();
        ctx.open("https://www.amazon.de/").await.unwrap();

        let result = ctx.wait_for_one(&DOT_DE.password_field(), true).await;
        assert!(matches!(result, Err(WaitError::Timeout(_))));
    }
}
