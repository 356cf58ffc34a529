//! Retry & error classification
//!
//! Every vendor call made by a reconciler goes through [`retry`], which keeps
//! re-issuing the call until it succeeds, fails terminally, or the deadline
//! passes. [`classify`] decides which bucket an [`SdkError`] falls in.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use super::context::HostContext;
use crate::error::{Error, Result};
use crate::zenlayer::error::{INTERNAL_SERVER_ERROR, READ_TIMED_OUT, RESOURCE_NOT_FOUND};
use crate::zenlayer::SdkError;

/// How an error should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Worth retrying until the deadline
    Transient,
    /// The resource does not exist (or no longer exists)
    NotFound,
    Terminal,
}

/// Outcome of one attempt inside [`retry`]
#[derive(Debug)]
pub enum RetryError {
    Retryable(Error),
    NonRetryable(Error),
}

/// Classify an SDK error.
///
/// `retry_codes` are vendor codes the caller opts into retrying,
/// `not_found_codes` are the resource-specific not-found sentinels
/// (the generic `RESOURCE_NOT_FOUND` always counts).
pub fn classify(err: &SdkError, retry_codes: &[&str], not_found_codes: &[&str]) -> ErrorClass {
    match err {
        SdkError::Transport { .. } => ErrorClass::Transient,
        SdkError::Api { status, code, .. } => {
            let code = code.as_str();
            if code == RESOURCE_NOT_FOUND || not_found_codes.contains(&code) {
                ErrorClass::NotFound
            } else if *status >= 500
                || code == INTERNAL_SERVER_ERROR
                || code == READ_TIMED_OUT
                || retry_codes.contains(&code)
            {
                ErrorClass::Transient
            } else {
                ErrorClass::Terminal
            }
        }
        SdkError::Decode { .. } | SdkError::Config(_) => ErrorClass::Terminal,
    }
}

/// Whether `err` is a not-found sentinel
pub fn is_not_found(err: &SdkError, not_found_codes: &[&str]) -> bool {
    classify(err, &[], not_found_codes) == ErrorClass::NotFound
}

/// Run `op` until it succeeds, fails with a non-retryable error, or `timeout` elapses.
///
/// On deadline expiry the last error is returned. Host cancellation aborts the
/// loop at the next suspension point.
pub async fn retry<T, F, Fut>(ctx: &HostContext, timeout: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, RetryError>>,
{
    let deadline = Instant::now() + timeout;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        let err = match ctx.run(op()).await? {
            Ok(value) => return Ok(value),
            Err(RetryError::NonRetryable(err)) => return Err(err),
            Err(RetryError::Retryable(err)) => err,
        };

        let now = Instant::now();
        if now >= deadline {
            warn!(attempt, error = %err, "Retry deadline reached, giving up");
            return Err(err);
        }

        let wait = ctx.tuning().retry_backoff(attempt).min(deadline - now);
        warn!(
            attempt,
            error = %err,
            wait_ms = wait.as_millis() as u64,
            "Transient error, retrying with backoff"
        );
        ctx.sleep(wait).await?;
    }
}

/// [`retry`] for a plain SDK call: transient errors (plus `retry_codes`) are
/// retried, everything else is surfaced as-is.
pub async fn retry_call<T, F, Fut>(
    ctx: &HostContext,
    timeout: Duration,
    retry_codes: &[&str],
    mut call: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, SdkError>>,
{
    retry(ctx, timeout, || {
        let fut = call();
        async move {
            fut.await.map_err(|err| match classify(&err, retry_codes, &[]) {
                ErrorClass::Transient => RetryError::Retryable(err.into()),
                ErrorClass::NotFound | ErrorClass::Terminal => RetryError::NonRetryable(err.into()),
            })
        }
    })
    .await
}

/// [`retry_call`] for lookups by id: a not-found sentinel becomes `Ok(None)`.
pub async fn retry_lookup<T, F, Fut>(
    ctx: &HostContext,
    timeout: Duration,
    not_found_codes: &[&str],
    mut call: F,
) -> Result<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<Option<T>, SdkError>>,
{
    retry(ctx, timeout, || {
        let fut = call();
        async move {
            match fut.await {
                Ok(found) => Ok(found),
                Err(err) => match classify(&err, &[], not_found_codes) {
                    ErrorClass::NotFound => Ok(None),
                    ErrorClass::Transient => Err(RetryError::Retryable(err.into())),
                    ErrorClass::Terminal => Err(RetryError::NonRetryable(err.into())),
                },
            }
        }
    })
    .await
}

/// [`retry_call`] for delete-style calls where not-found (and any `ok_codes`)
/// mean the work is already done. Returns `true` when the resource was gone.
pub async fn retry_idempotent<F, Fut>(
    ctx: &HostContext,
    timeout: Duration,
    retry_codes: &[&str],
    not_found_codes: &[&str],
    ok_codes: &[&str],
    mut call: F,
) -> Result<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<(), SdkError>>,
{
    retry(ctx, timeout, || {
        let fut = call();
        async move {
            match fut.await {
                Ok(()) => Ok(false),
                Err(err) => match classify(&err, retry_codes, not_found_codes) {
                    ErrorClass::NotFound => {
                        debug!(code = ?err.code(), "Resource already gone");
                        Ok(true)
                    }
                    _ if err.has_code(ok_codes) => {
                        debug!(code = ?err.code(), "Request already satisfied");
                        Ok(false)
                    }
                    ErrorClass::Transient => Err(RetryError::Retryable(err.into())),
                    ErrorClass::Terminal => Err(RetryError::NonRetryable(err.into())),
                },
            }
        }
    })
    .await
}
