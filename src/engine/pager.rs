//! Concurrent pager
//!
//! Materializes a whole list from an endpoint paged by `pageNum`/`pageSize`:
//! page 1 is fetched first to learn `totalCount`, the remaining pages are
//! fetched concurrently (at most [`MAX_CONCURRENCY`] in flight) and stitched
//! back together in page order.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::context::HostContext;
use super::retry::retry_call;
use crate::error::{Error, Result};
use crate::zenlayer::SdkError;

pub const PAGE_SIZE: u32 = 100;
pub const MAX_CONCURRENCY: usize = 50;

/// Page coordinates handed to the fetch function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_num: u32,
    pub page_size: u32,
}

/// One page of results
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub total_count: u64,
    pub items: Vec<T>,
}

/// Number of pages still to fetch once page 1 is in
pub fn remaining_pages(total_count: u64, page_size: u32) -> u32 {
    let pages = total_count.div_ceil(u64::from(page_size.max(1)));
    u32::try_from(pages.saturating_sub(1)).unwrap_or(u32::MAX)
}

/// Fetch every page and concatenate them in page order.
///
/// Each page request runs under the retry wrapper with `timeout`. A page that
/// still fails fails the whole call; a partial list is never returned.
pub async fn fetch_all<T, F, Fut>(ctx: &HostContext, timeout: Duration, fetch: F) -> Result<Vec<T>>
where
    F: Fn(PageRequest) -> Fut,
    Fut: Future<Output = std::result::Result<Page<T>, SdkError>>,
{
    let first = fetch_page(ctx, timeout, &fetch, 1).await?;
    let remaining = remaining_pages(first.total_count, PAGE_SIZE);

    debug!(
        total_count = first.total_count,
        remaining_pages = remaining,
        "Fetched first page"
    );

    if remaining == 0 {
        return Ok(first.items);
    }

    let semaphore = Semaphore::new(MAX_CONCURRENCY);
    let tasks = (0..remaining).map(|i| {
        let semaphore = &semaphore;
        let fetch = &fetch;
        async move {
            let _permit = semaphore.acquire().await.map_err(|_| Error::Cancelled)?;
            fetch_page(ctx, timeout, fetch, i + 2).await
        }
    });

    // Barrier: every page task has finished (or the host cancelled)
    let results = ctx.run(join_all(tasks)).await?;

    let mut slots: Vec<Option<Vec<T>>> = (0..remaining).map(|_| None).collect();
    let mut first_error = None;
    for (slot, result) in slots.iter_mut().zip(results) {
        match result {
            Ok(page) => *slot = Some(page.items),
            Err(err) => {
                warn!(error = %err, "Page fetch failed");
                first_error.get_or_insert(err);
            }
        }
    }

    if let Some(err) = first_error {
        return Err(err);
    }

    let mut items = first.items;
    for chunk in slots.into_iter().flatten() {
        items.extend(chunk);
    }
    Ok(items)
}

async fn fetch_page<T, F, Fut>(
    ctx: &HostContext,
    timeout: Duration,
    fetch: &F,
    page_num: u32,
) -> Result<Page<T>>
where
    F: Fn(PageRequest) -> Fut,
    Fut: Future<Output = std::result::Result<Page<T>, SdkError>>,
{
    retry_call(ctx, timeout, &[], || {
        fetch(PageRequest {
            page_num,
            page_size: PAGE_SIZE,
        })
    })
    .await
}
