//! Reconciliation engine
//!
//! - [`context`] - host context: cancellation, timeouts, tuning
//! - [`retry`] - error classification and the deadline-bounded retry loop
//! - [`pager`] - concurrent list materialization
//! - [`state`] - the status poller every reconciler waits with

pub mod context;
pub mod pager;
pub mod retry;
pub mod state;

pub use context::{Deadline, HostContext, Op, Timeouts, Tuning, SAFETY_MARGIN};
pub use pager::{fetch_all, remaining_pages, Page, PageRequest, MAX_CONCURRENCY, PAGE_SIZE};
pub use retry::{
    classify, is_not_found, retry, retry_call, retry_idempotent, retry_lookup, ErrorClass,
    RetryError,
};
pub use state::{Observed, StateConf, GONE};
