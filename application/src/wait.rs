//! Wait and retry primitives
//!
//! Every suspension in a run happens here: a bounded poll with a sleep
//! between attempts. Nothing else in the crawler sleeps or assumes that a
//! navigation has finished.

use crate::config::WaitPolicy;
use crate::ports::browser::{BrowserError, BrowserPort};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::{trace, warn};

/// Errors that can occur while waiting for a condition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaitError {
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Browser(#[from] BrowserError),
}

/// Poll `predicate` under the policy's timeout and poll interval.
///
/// See [`poll_until`].
pub async fn wait_until<T, F, Fut>(policy: &WaitPolicy, predicate: F) -> Result<T, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, BrowserError>>,
{
    poll_until(policy.timeout, policy.poll_interval, predicate).await
}

/// Evaluate `predicate` until it yields `Some`, or fail once `timeout` elapses.
///
/// The predicate is evaluated at least once. Transient browser errors (the
/// element is not there yet, or went stale mid-query) count as "not yet";
/// any other error ends the wait immediately.
pub async fn poll_until<T, F, Fut>(
    timeout: Duration,
    poll_interval: Duration,
    mut predicate: F,
) -> Result<T, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, BrowserError>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        match predicate().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) if e.is_transient() => trace!("Transient browser error while polling: {}", e),
            Err(e) => return Err(WaitError::Browser(e)),
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(WaitError::Timeout(timeout));
        }
        sleep(poll_interval.min(deadline - now)).await;
    }
}

/// `Some(items)` when `items` is non-empty, for predicates built on `locate`
pub fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

/// Run `action`, retrying after `delay` on failure, at most `max_attempts` times.
///
/// Absorbs races right after a navigation, such as a link that is present but
/// not yet followable. The last error is returned once attempts run out.
pub async fn retry<T, E, F, Fut>(delay: Duration, max_attempts: usize, mut action: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match action().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                warn!(
                    "Attempt {}/{} failed, retrying in {:?}: {}",
                    attempt, max_attempts, delay, e
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Run `action` and block until the page it navigates away from is replaced.
///
/// The marker is taken before `action` starts, so a navigation that completes
/// while `action` is still running is not missed. Returns once the new page
/// has loaded, or with [`WaitError::Timeout`] if it never does.
pub async fn with_page_load_barrier<B, T, E, Fut>(
    browser: &B,
    policy: &WaitPolicy,
    action: Fut,
) -> Result<T, E>
where
    B: BrowserPort + ?Sized,
    Fut: Future<Output = Result<T, E>>,
    E: From<WaitError>,
{
    let marker = browser.page_marker().await.map_err(WaitError::from)?;
    let value = action.await?;

    let marker = &marker;
    wait_until(policy, || async move {
        Ok(browser.page_replaced(marker).await?.then_some(()))
    })
    .await?;
    Ok(value)
}
