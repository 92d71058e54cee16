//! Discovery traversal
//!
//! Walks the order history: every order group in the filter, every page of
//! each group, optionally repeated for the digital orders section. Produces
//! the ordered list of invoice references still missing from the store.

use crate::config::DiscoveryOptions;
use crate::ports::browser::ElementHandle;
use crate::ports::progress::{ArchiveProgress, NoProgress};
use crate::use_cases::context::CrawlContext;
use crate::use_cases::error::CrawlError;
use crate::wait::retry;
use harvest_domain::{Locator, Offer, RecordId, RecordReference, ReferenceCollector};
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub struct DiscoverRecords<'c> {
    ctx: &'c CrawlContext,
    options: &'c DiscoveryOptions,
    progress: &'c dyn ArchiveProgress,
}

impl<'c> DiscoverRecords<'c> {
    pub fn new(ctx: &'c CrawlContext, options: &'c DiscoveryOptions) -> Self {
        Self {
            ctx,
            options,
            progress: &NoProgress,
        }
    }

    pub fn with_progress(mut self, progress: &'c dyn ArchiveProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Collect references to every invoice not in `persisted`, in discovery order
    pub async fn execute(
        &self,
        persisted: HashSet<RecordId>,
    ) -> Result<Vec<RecordReference>, CrawlError> {
        let profile = self.ctx.profile();
        let mut collector = ReferenceCollector::new(persisted);

        self.open_order_history().await?;

        if self.options.regular {
            self.traverse_order_groups(&mut collector).await?;
        }

        if self.options.digital {
            match profile.digital_orders_link() {
                Some(link) => {
                    self.open_digital_orders(&link).await?;
                    self.traverse_order_groups(&mut collector).await?;
                }
                None => warn!(
                    "amazon{} has no digital orders section, skipping",
                    profile.key()
                ),
            }
        }

        info!("Discovered {} invoice(s) to retrieve", collector.len());
        Ok(collector.into_references())
    }

    async fn open_order_history(&self) -> Result<(), CrawlError> {
        let ctx = self.ctx;
        let browser = ctx.browser();
        let profile = ctx.profile();

        // Hidden behind a menu on some locales, so visibility is not required
        let link = ctx
            .wait_for_one(&profile.your_orders_link(), false)
            .await
            .map_err(|e| CrawlError::from_wait("order history link", e))?;
        let href = browser.attribute(&link, "href").await?.ok_or_else(|| {
            CrawlError::Structural(format!("'{}' link has no href", profile.your_orders))
        })?;
        ctx.check_url(&href)?;

        info!("Opening order history");
        let policy = ctx.policy();
        let href = href.as_str();
        retry(policy.retry_delay, policy.retry_attempts, || async move {
            browser.navigate(href).await
        })
        .await?;
        ctx.check_current_url().await?;
        Ok(())
    }

    async fn open_digital_orders(&self, link: &Locator) -> Result<(), CrawlError> {
        let ctx = self.ctx;
        let element = ctx
            .wait_for_one(link, true)
            .await
            .map_err(|e| CrawlError::from_wait("digital orders link", e))?;

        info!("Opening digital orders");
        let browser = ctx.browser();
        let policy = ctx.policy();
        let element = &element;
        // Only the click is retried; the landing page is checked once
        ctx.barrier(async move {
            retry(policy.retry_delay, policy.retry_attempts, || async move {
                browser.click(element).await
            })
            .await?;
            Ok(())
        })
        .await
    }

    async fn traverse_order_groups(
        &self,
        collector: &mut ReferenceCollector,
    ) -> Result<(), CrawlError> {
        let ctx = self.ctx;
        let browser = ctx.browser();
        let profile = ctx.profile();
        let mut index = 0;

        loop {
            // Selecting a group reloads the page, so the filter is located afresh each time
            ctx.wait_for(&profile.order_filter(), true)
                .await
                .map_err(|e| CrawlError::from_wait("order filter", e))?;
            let options = ctx.find(&profile.order_filter_options(), false).await?;
            let Some(option) = options.get(index) else {
                break;
            };
            index += 1;

            let name = browser.text(option).await?.trim().to_string();
            if name == profile.archived_group {
                debug!("Skipping archived orders");
                continue;
            }
            if !self.options.allows_group(&name) {
                info!("Skipping order group: {:?}", name);
                continue;
            }

            info!("Retrieving order group: {:?}", name);
            self.progress.on_order_group(&name);
            if !browser.is_selected(option).await? {
                ctx.click_and_wait(option).await?;
            }
            self.collect_pages(collector).await?;
        }
        Ok(())
    }

    async fn collect_pages(&self, collector: &mut ReferenceCollector) -> Result<(), CrawlError> {
        let ctx = self.ctx;
        let browser = ctx.browser();
        let profile = ctx.profile();
        let mut first_page = true;

        loop {
            let anchors = if first_page {
                ctx.find(&profile.invoice_anchors(), false).await?
            } else {
                ctx.wait_for(&profile.invoice_anchors(), false)
                    .await
                    .map_err(|e| CrawlError::from_wait("invoice links", e))?
            };
            first_page = false;

            for anchor in &anchors {
                self.offer(collector, anchor).await?;
            }

            let next = ctx.find(&profile.next_page_link(), true).await?;
            match next.as_slice() {
                [] => {
                    debug!("Found no more pages");
                    break;
                }
                [next] => {
                    debug!("Next page");
                    ctx.click_and_wait(next).await?;
                }
                more => {
                    return Err(CrawlError::Structural(format!(
                        "Found {} '{}' links on one page",
                        more.len(),
                        profile.next_page
                    )));
                }
            }
        }
        Ok(())
    }

    async fn offer(
        &self,
        collector: &mut ReferenceCollector,
        anchor: &ElementHandle,
    ) -> Result<(), CrawlError> {
        let ctx = self.ctx;
        let browser = ctx.browser();
        let label = browser.text(anchor).await?;
        let href = browser.attribute(anchor, "href").await?.unwrap_or_default();
        match collector.offer(ctx.profile(), ctx.patterns(), &label, &href)? {
            Offer::Queued { id, rewritten } => {
                if rewritten {
                    info!("Found likely Amazon Fresh order, using the direct invoice URL");
                }
                info!("Found order {}", id);
                self.progress.on_record_found(&id);
            }
            Offer::AlreadySeen(id) => debug!("Skipping already-seen order {}", id),
            Offer::AlreadyPersisted(id) => {
                info!("Skipping already-downloaded invoice for order {}", id)
            }
            Offer::NotInvoice { label } if !label.is_empty() => {
                info!("Skipping invoice link with unknown label: {:?}", label)
            }
            Offer::NotInvoice { .. } => {}
        }
        Ok(())
    }
}
