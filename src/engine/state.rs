//! Resource state machine
//!
//! A descriptor-driven poller that waits for a remote resource to move from
//! a set of pending statuses into a target status. Every reconciler builds a
//! [`StateConf`] with its own status lexicon and hands it a refresh function.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use super::context::HostContext;
use crate::error::{Error, Result};

/// Status string reported while a resource is gone
pub const GONE: &str = "<gone>";

/// What a refresh observed
#[derive(Debug, Clone, PartialEq)]
pub enum Observed<T> {
    Present(T, String),
    Gone,
}

impl<T> Observed<T> {
    pub fn status(&self) -> &str {
        match self {
            Self::Present(_, status) => status,
            Self::Gone => GONE,
        }
    }
}

/// Wait descriptor
#[derive(Debug, Clone)]
pub struct StateConf {
    resource: String,
    pending: Vec<String>,
    target: Vec<String>,
    fail: Vec<String>,
    accept_gone: bool,
    strict: bool,
    settle: bool,
    delay: Duration,
    min_timeout: Duration,
    max_interval: Duration,
    not_found_checks: u32,
    timeout: Duration,
}

impl StateConf {
    /// Start a descriptor for `resource` (used in messages, e.g. `"port p-123"`),
    /// with delays taken from the host context's tuning
    pub fn new(ctx: &HostContext, resource: impl Into<String>, timeout: Duration) -> Self {
        let tuning = ctx.tuning();
        Self {
            resource: resource.into(),
            pending: Vec::new(),
            target: Vec::new(),
            fail: Vec::new(),
            accept_gone: false,
            strict: false,
            settle: false,
            delay: tuning.poll_delay,
            min_timeout: tuning.poll_min_timeout,
            max_interval: tuning.poll_max_interval,
            not_found_checks: tuning.not_found_checks,
            timeout,
        }
    }

    pub fn pending(mut self, statuses: &[&str]) -> Self {
        self.pending = statuses.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn target(mut self, statuses: &[&str]) -> Self {
        self.target = statuses.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn fail_on(mut self, statuses: &[&str]) -> Self {
        self.fail = statuses.iter().map(|s| s.to_string()).collect();
        self
    }

    /// The resource disappearing also ends the wait successfully
    pub fn accept_gone(mut self) -> Self {
        self.accept_gone = true;
        self
    }

    /// Statuses outside pending/target fail instead of being waited through
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Any status outside pending ends the wait (read-side polling)
    pub fn until_settled(mut self) -> Self {
        self.settle = true;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn min_timeout(mut self, min_timeout: Duration) -> Self {
        self.min_timeout = min_timeout;
        self
    }

    pub fn not_found_checks(mut self, checks: u32) -> Self {
        self.not_found_checks = checks;
        self
    }

    fn target_list(&self) -> Vec<String> {
        let mut target = self.target.clone();
        if self.accept_gone {
            target.push(GONE.to_string());
        }
        target
    }

    fn next_interval(&self, current: Duration) -> Duration {
        (current * 2).min(self.max_interval.max(self.min_timeout))
    }

    /// Poll `refresh` until a target status is observed.
    ///
    /// Returns the last object, or `None` when the resource is gone and gone
    /// was accepted.
    pub async fn wait<T, F, Fut>(&self, ctx: &HostContext, mut refresh: F) -> Result<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Observed<T>>>,
    {
        let deadline = Instant::now() + self.timeout;
        let mut last_status = String::from("<unknown>");
        let mut not_found: u32 = 0;
        let mut interval = self.min_timeout;

        debug!(
            resource = %self.resource,
            pending = ?self.pending,
            target = ?self.target_list(),
            "Waiting for state"
        );

        if !self.delay.is_zero() {
            ctx.sleep(self.delay.min(self.timeout)).await?;
        }

        loop {
            if Instant::now() >= deadline {
                return Err(self.timeout_error(last_status));
            }

            match ctx.run(refresh()).await?? {
                Observed::Gone => {
                    last_status = GONE.to_string();
                    if self.accept_gone {
                        info!(resource = %self.resource, "Resource is gone");
                        return Ok(None);
                    }
                    not_found += 1;
                    if not_found > self.not_found_checks {
                        return Err(Error::NotFound {
                            resource: self.resource.clone(),
                            checks: not_found,
                        });
                    }
                    debug!(resource = %self.resource, not_found, "Resource not visible yet");
                }
                Observed::Present(object, status) => {
                    not_found = 0;
                    if self.fail.contains(&status) {
                        return Err(Error::UnexpectedState {
                            resource: self.resource.clone(),
                            status,
                            target: self.target_list(),
                        });
                    }
                    let settled = self.settle && !self.pending.contains(&status);
                    if settled || self.target.contains(&status) {
                        info!(resource = %self.resource, status = %status, "Reached target state");
                        return Ok(Some(object));
                    }
                    if !self.pending.contains(&status) {
                        if self.strict {
                            return Err(Error::UnexpectedState {
                                resource: self.resource.clone(),
                                status,
                                target: self.target_list(),
                            });
                        }
                        debug!(
                            resource = %self.resource,
                            status = %status,
                            "Unknown status, treating as pending"
                        );
                    }
                    last_status = status;
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(self.timeout_error(last_status));
            }
            ctx.sleep(interval.min(deadline - now)).await?;
            interval = self.next_interval(interval);
        }
    }

    fn timeout_error(&self, last_status: String) -> Error {
        Error::Timeout {
            resource: self.resource.clone(),
            last_status,
            target: self.target_list(),
        }
    }
}
