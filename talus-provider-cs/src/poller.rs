//! Status poller for long-running control-plane operations
//!
//! The remote side reports a lifecycle status string; operations are
//! considered done only when the status lands exactly on a target, or,
//! for deletions (empty target set), when the resource disappears.

use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

/// Errors terminating a poll
#[derive(Debug, Error)]
pub enum PollError<E: std::error::Error> {
    #[error("timed out waiting for status, last observed: {last:?}")]
    Timeout { last: Option<String> },

    #[error("entered failure status '{0}'")]
    Failure(String),

    #[error("unexpected status '{0}'")]
    Unexpected(String),

    #[error("resource disappeared while waiting")]
    Gone,

    #[error(transparent)]
    Refresh(E),
}

/// A bounded-duration, fixed-interval status-refresh loop
#[derive(Debug, Clone)]
pub struct StatusPoller {
    pending: Vec<String>,
    target: Vec<String>,
    failure: Vec<String>,
    interval: Duration,
    timeout: Duration,
}

impl StatusPoller {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self {
            pending: Vec::new(),
            target: Vec::new(),
            failure: Vec::new(),
            interval,
            timeout,
        }
    }

    /// Statuses that mean the operation is still in progress
    pub fn pending(mut self, statuses: &[&str]) -> Self {
        self.pending = statuses.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Statuses that mean the operation completed. An empty target set
    /// means success is the resource disappearing.
    pub fn target(mut self, statuses: &[&str]) -> Self {
        self.target = statuses.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Statuses that are fatal the moment they are observed
    pub fn failure(mut self, statuses: &[&str]) -> Self {
        self.failure = statuses.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Drive `refresh` until a terminal condition is reached.
    ///
    /// `refresh` returns the current status, or `None` when the resource
    /// no longer exists. Returns the final status on success (`None` for
    /// a successful disappearance).
    pub async fn wait_for<F, Fut, E>(&self, mut refresh: F) -> Result<Option<String>, PollError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<String>, E>>,
        E: std::error::Error,
    {
        let deadline = Instant::now() + self.timeout;
        let mut last: Option<String> = None;

        loop {
            let observed = refresh().await.map_err(PollError::Refresh)?;

            match observed {
                None => {
                    if self.target.is_empty() {
                        return Ok(None);
                    }
                    return Err(PollError::Gone);
                }
                Some(status) => {
                    if self.target.iter().any(|t| *t == status) {
                        return Ok(Some(status));
                    }
                    if self.failure.iter().any(|f| *f == status) {
                        return Err(PollError::Failure(status));
                    }
                    if !self.pending.iter().any(|p| *p == status) {
                        return Err(PollError::Unexpected(status));
                    }
                    last = Some(status);
                }
            }

            if Instant::now() + self.interval > deadline {
                return Err(PollError::Timeout { last });
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::Mutex;

    fn poller() -> StatusPoller {
        StatusPoller::new(Duration::from_millis(5), Duration::from_millis(500))
            .pending(&["initial"])
            .target(&["active"])
            .failure(&["deleting", "failed"])
    }

    /// Refresh closure that walks through a fixed status sequence
    fn sequence(statuses: Vec<Option<&'static str>>) -> impl FnMut() -> std::future::Ready<Result<Option<String>, Infallible>>
    {
        let remaining = Mutex::new(statuses.into_iter());
        move || {
            let next = remaining
                .lock()
                .unwrap()
                .next()
                .expect("refresh called past end of sequence");
            std::future::ready(Ok(next.map(|s| s.to_string())))
        }
    }

    #[tokio::test]
    async fn reaches_target_after_pending() {
        let result = poller()
            .wait_for(sequence(vec![
                Some("initial"),
                Some("initial"),
                Some("active"),
            ]))
            .await;

        assert_eq!(result.unwrap(), Some("active".to_string()));
    }

    #[tokio::test]
    async fn failure_status_is_fatal_immediately() {
        let result = poller()
            .wait_for(sequence(vec![Some("initial"), Some("failed")]))
            .await;

        assert!(matches!(result, Err(PollError::Failure(s)) if s == "failed"));
    }

    #[tokio::test]
    async fn unexpected_status_is_fatal() {
        let result = poller().wait_for(sequence(vec![Some("upgrading")])).await;

        assert!(matches!(result, Err(PollError::Unexpected(s)) if s == "upgrading"));
    }

    #[tokio::test]
    async fn timeout_reports_last_observed_status() {
        let poller = StatusPoller::new(Duration::from_millis(5), Duration::from_millis(20))
            .pending(&["initial"])
            .target(&["active"]);

        let result = poller
            .wait_for(|| std::future::ready(Ok::<_, Infallible>(Some("initial".to_string()))))
            .await;

        assert!(
            matches!(result, Err(PollError::Timeout { last: Some(ref s) }) if s == "initial")
        );
    }

    #[tokio::test]
    async fn empty_target_succeeds_on_disappearance() {
        let poller = StatusPoller::new(Duration::from_millis(5), Duration::from_millis(500))
            .pending(&["active", "deleting"]);

        let result = poller
            .wait_for(sequence(vec![Some("active"), Some("deleting"), None]))
            .await;

        assert_eq!(result.unwrap(), None);
    }

    #[tokio::test]
    async fn disappearance_with_target_set_is_fatal() {
        let result = poller().wait_for(sequence(vec![None])).await;

        assert!(matches!(result, Err(PollError::Gone)));
    }
}
