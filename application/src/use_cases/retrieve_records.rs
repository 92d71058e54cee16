//! Retrieval and persistence pipeline
//!
//! Visits each discovered reference in order, waits for the invoice page to
//! finish rendering, verifies it and hands it to the record store. The first
//! failure aborts the run.

use crate::ports::browser::BrowserError;
use crate::ports::progress::{ArchiveProgress, NoProgress};
use crate::ports::record_store::RecordStore;
use crate::use_cases::context::CrawlContext;
use crate::use_cases::error::CrawlError;
use crate::use_cases::session::SessionController;
use crate::wait;
use harvest_domain::{DocumentState, RecordDocument, RecordId, RecordReference};
use std::path::PathBuf;
use tokio::time::Instant;
use tracing::{debug, info};

/// A record page that stopped rendering
enum Settled {
    Ready(String),
    Problem,
    PasswordPrompt,
}

pub struct RetrieveRecords<'c, S: RecordStore + ?Sized> {
    ctx: &'c CrawlContext,
    store: &'c S,
    progress: &'c dyn ArchiveProgress,
}

impl<'c, S: RecordStore + ?Sized> RetrieveRecords<'c, S> {
    pub fn new(ctx: &'c CrawlContext, store: &'c S) -> Self {
        Self {
            ctx,
            store,
            progress: &NoProgress,
        }
    }

    pub fn with_progress(mut self, progress: &'c dyn ArchiveProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Retrieve and write every reference, returning the written paths in order
    pub async fn execute(
        &self,
        session: &mut SessionController<'_>,
        references: &[RecordReference],
    ) -> Result<Vec<(RecordId, PathBuf)>, CrawlError> {
        let mut written = Vec::with_capacity(references.len());
        for reference in references {
            let path = self.retrieve(session, reference).await?;
            written.push((reference.id.clone(), path));
        }
        Ok(written)
    }

    async fn retrieve(
        &self,
        session: &mut SessionController<'_>,
        reference: &RecordReference,
    ) -> Result<PathBuf, CrawlError> {
        let ctx = self.ctx;
        let id = &reference.id;

        info!("Downloading invoice for order {}", id);
        self.progress.on_record_start(id);
        ctx.open(&reference.href).await?;

        let source = self.await_terminal(session, id).await?;
        let require_year = self.store.layout().dir_per_year;
        let document = RecordDocument::from_page(id.clone(), source, ctx.patterns(), require_year)?;
        let path = self.store.write(&document)?;

        info!("Wrote {}", path.display());
        self.progress.on_record_written(id, &path);
        Ok(path)
    }

    /// Poll the page until it is complete or cancelled.
    ///
    /// A password prompt triggers re-authentication; polling then continues
    /// under the same deadline.
    async fn await_terminal(
        &self,
        session: &mut SessionController<'_>,
        id: &RecordId,
    ) -> Result<String, CrawlError> {
        let policy = self.ctx.policy();
        let deadline = Instant::now() + policy.timeout;
        let what = format!("Order {}", id);

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let settled = wait::poll_until(remaining, policy.poll_interval, || self.poll_page(id))
                .await
                .map_err(|e| CrawlError::extraction_wait(&what, e))?;

            match settled {
                Settled::Ready(source) => return Ok(source),
                Settled::Problem => {
                    return Err(CrawlError::Extraction(format!(
                        "Failed to retrieve information for order {}",
                        id
                    )));
                }
                Settled::PasswordPrompt => session.resume_login().await?,
            }
        }
    }

    /// One look at the page; `None` while it is still rendering
    async fn poll_page(&self, id: &RecordId) -> Result<Option<Settled>, BrowserError> {
        let browser = self.ctx.browser();
        let profile = self.ctx.profile();
        let source = browser.page_source().await?;

        Ok(match DocumentState::classify(profile, &source) {
            state if state.is_success() => Some(Settled::Ready(source)),
            DocumentState::Problem => Some(Settled::Problem),
            _ => {
                // Digital orders render parts of the page late; a password
                // prompt means the session expired meanwhile
                if browser.locate(&profile.password_field(), true).await?.is_empty() {
                    debug!("Order {} still rendering", id);
                    None
                } else {
                    Some(Settled::PasswordPrompt)
                }
            }
        })
    }
}
