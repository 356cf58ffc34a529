//! Host context: cancellation, per-operation timeouts and engine tuning

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Subtracted from every host timeout so waits resolve before the host gives up
pub const SAFETY_MARGIN: Duration = Duration::from_secs(60);

/// Host callback kinds that carry a timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Create,
    Read,
    Update,
    Delete,
}

impl Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Host-provided per-operation timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub create: Duration,
    pub read: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            create: Duration::from_secs(20 * 60),
            read: Duration::from_secs(10 * 60),
            update: Duration::from_secs(20 * 60),
            delete: Duration::from_secs(20 * 60),
        }
    }
}

impl Timeouts {
    /// Same timeout for every operation
    pub fn uniform(timeout: Duration) -> Self {
        Self {
            create: timeout,
            read: timeout,
            update: timeout,
            delete: timeout,
        }
    }

    pub fn get(&self, op: Op) -> Duration {
        match op {
            Op::Create => self.create,
            Op::Read => self.read,
            Op::Update => self.update,
            Op::Delete => self.delete,
        }
    }

    /// Time the engine may spend on `op`: the host timeout minus [`SAFETY_MARGIN`].
    /// Timeouts not larger than the margin are used as-is.
    pub fn budget(&self, op: Op) -> Duration {
        let timeout = self.get(op);
        if timeout > SAFETY_MARGIN {
            timeout - SAFETY_MARGIN
        } else {
            timeout
        }
    }
}

/// Point in time one host callback has to finish by.
///
/// Taken once per callback from [`Timeouts::budget`]; every stage of the
/// callback (vendor call, state wait, follow-up call) spends what is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self(Instant::now() + budget)
    }

    pub fn remaining(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }

    /// What is left, but no more than `limit`
    pub fn within(&self, limit: Duration) -> Duration {
        self.remaining().min(limit)
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }
}

/// Polling and backoff knobs shared by the retry loop and the state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Pause before the first state poll
    pub poll_delay: Duration,
    /// Minimum interval between state polls
    pub poll_min_timeout: Duration,
    /// Upper bound for the poll interval
    pub poll_max_interval: Duration,
    /// Consecutive "gone" observations tolerated while a resource should exist
    pub not_found_checks: u32,
    pub retry_initial_backoff: Duration,
    pub retry_max_backoff: Duration,
    pub retry_multiplier: f64,
    /// Add up to 25% jitter to retry backoff
    pub retry_jitter: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            poll_delay: Duration::from_secs(10),
            poll_min_timeout: Duration::from_secs(5),
            poll_max_interval: Duration::from_secs(10),
            not_found_checks: 3,
            retry_initial_backoff: Duration::from_secs(1),
            retry_max_backoff: Duration::from_secs(10),
            retry_multiplier: 2.0,
            retry_jitter: true,
        }
    }
}

impl Tuning {
    /// Millisecond-scale settings for talking to local mock servers
    pub fn fast() -> Self {
        Self {
            poll_delay: Duration::from_millis(5),
            poll_min_timeout: Duration::from_millis(5),
            poll_max_interval: Duration::from_millis(20),
            not_found_checks: 3,
            retry_initial_backoff: Duration::from_millis(5),
            retry_max_backoff: Duration::from_millis(20),
            retry_multiplier: 2.0,
            retry_jitter: false,
        }
    }

    /// Longest a single state refresh may spend retrying transient errors
    pub fn refresh_timeout(&self) -> Duration {
        (self.poll_max_interval * 3).max(self.retry_max_backoff)
    }

    /// Backoff before retry number `attempt` (1-based), exponential and capped
    pub fn retry_backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let base = self.retry_initial_backoff.as_secs_f64() * self.retry_multiplier.powi(exponent);
        let capped = base.min(self.retry_max_backoff.as_secs_f64());

        let secs = if self.retry_jitter {
            // Add up to 25% jitter
            let jitter_range = capped * 0.25;
            let jitter = rand::random::<f64>() * jitter_range * 2.0 - jitter_range;
            (capped + jitter).max(0.0)
        } else {
            capped
        };

        Duration::from_secs_f64(secs)
    }
}

/// Per-invocation context handed to every host callback
#[derive(Debug, Clone, Default)]
pub struct HostContext {
    cancel: CancellationToken,
    tuning: Tuning,
}

impl HostContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Sleep unless the host cancels first
    pub async fn sleep(&self, duration: Duration) -> Result<()> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }

    /// Drive `fut` to completion unless the host cancels first
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            out = fut => Ok(out),
        }
    }
}
