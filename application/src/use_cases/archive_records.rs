//! Archive use case: one complete run
//!
//! Login, snapshot of the store, discovery, then retrieval. Holds the only
//! browser session of the process for the duration of the run.

use crate::config::{DiscoveryOptions, WaitPolicy};
use crate::ports::browser::BrowserPort;
use crate::ports::progress::{ArchiveProgress, NoProgress};
use crate::ports::record_store::RecordStore;
use crate::ports::secrets::Credentials;
use crate::use_cases::context::CrawlContext;
use crate::use_cases::discover_records::DiscoverRecords;
use crate::use_cases::error::CrawlError;
use crate::use_cases::retrieve_records::RetrieveRecords;
use crate::use_cases::session::SessionController;
use chrono::{DateTime, Utc};
use harvest_domain::{DomainProfile, RecordId};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Input for the [`ArchiveRecordsUseCase`]
#[derive(Debug, Clone)]
pub struct ArchiveInput {
    pub profile: DomainProfile,
    pub credentials: Credentials,
    pub discovery: DiscoveryOptions,
}

impl ArchiveInput {
    pub fn new(profile: DomainProfile, credentials: Credentials) -> Self {
        Self {
            profile,
            credentials,
            discovery: DiscoveryOptions::default(),
        }
    }

    pub fn with_discovery(mut self, discovery: DiscoveryOptions) -> Self {
        self.discovery = discovery;
        self
    }
}

/// What a run did
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveSummary {
    pub profile_key: String,
    /// References queued by discovery
    pub discovered: usize,
    /// Ids already in the store before the run
    pub already_archived: usize,
    pub written: Vec<(RecordId, PathBuf)>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ArchiveSummary {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Use case for archiving every invoice not yet in the store
pub struct ArchiveRecordsUseCase {
    browser: Arc<dyn BrowserPort>,
    store: Arc<dyn RecordStore>,
    policy: WaitPolicy,
}

impl ArchiveRecordsUseCase {
    pub fn new(browser: Arc<dyn BrowserPort>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            browser,
            store,
            policy: WaitPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: WaitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn execute(&self, input: ArchiveInput) -> Result<ArchiveSummary, CrawlError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        input: ArchiveInput,
        progress: &dyn ArchiveProgress,
    ) -> Result<ArchiveSummary, CrawlError> {
        let started_at = Utc::now();
        let profile_key = input.profile.key();
        info!("Archiving invoices from amazon{}", profile_key);

        let ctx = CrawlContext::new(self.browser.clone(), input.profile, self.policy.clone())?;
        let mut session = SessionController::new(&ctx, input.credentials).with_progress(progress);
        session.login().await?;

        let store = self.store.as_ref();
        store.prepare()?;
        let persisted = store.persisted_ids()?;
        let already_archived = persisted.len();
        info!("{} invoice(s) already archived", already_archived);

        let references = DiscoverRecords::new(&ctx, &input.discovery)
            .with_progress(progress)
            .execute(persisted)
            .await?;
        progress.on_discovery_complete(references.len());

        let written = RetrieveRecords::new(&ctx, store)
            .with_progress(progress)
            .execute(&mut session, &references)
            .await?;

        Ok(ArchiveSummary {
            profile_key,
            discovered: references.len(),
            already_archived,
            written,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
