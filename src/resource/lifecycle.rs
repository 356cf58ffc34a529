//! Shared create/read/delete flows
//!
//! Each resource kind describes its vendor calls and status lexicon through
//! [`Lifecycle`]; the flows below drive them through the retry loop and the
//! state machine the same way for every kind.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::engine::{retry_idempotent, retry_lookup, Deadline, HostContext, Observed, StateConf};
use crate::error::{Error, Result};
use crate::zenlayer::SdkResult;

/// Vendor operations and status lexicon of one resource kind
#[async_trait]
pub trait Lifecycle: Send + Sync {
    type Info: Send + Sync;

    /// Used in log lines and error messages, e.g. `port`
    const LABEL: &'static str;
    /// Statuses a resource passes through while the vendor is working on it
    const OPERATIONAL: &'static [&'static str];
    const RUNNING: &'static str;
    /// Soft-deleted status
    const RECYCLED: &'static str;
    const FAIL: &'static [&'static str] = &[];
    /// Vendor code for an unknown id
    const NOT_FOUND_CODE: &'static str;
    /// Vendor code for soft-deleting something already in the recycle bin
    const RECYCLED_CODE: &'static str;
    /// Extra codes worth retrying on the soft-delete call
    const DELETE_RETRY_CODES: &'static [&'static str] = &[];

    async fn lookup(&self, id: &str) -> SdkResult<Option<Self::Info>>;

    fn status(info: &Self::Info) -> &str;

    async fn soft_delete(&self, id: &str) -> SdkResult<()>;

    async fn destroy(&self, id: &str) -> SdkResult<()>;
}

fn label<L: Lifecycle>(id: &str) -> String {
    format!("{} {}", L::LABEL, id)
}

fn observe<L: Lifecycle>(found: Option<L::Info>) -> Observed<L::Info> {
    match found {
        Some(info) => {
            let status = L::status(&info).to_string();
            Observed::Present(info, status)
        }
        None => Observed::Gone,
    }
}

/// Look `id` up once (under retry); `None` when the vendor does not know it
pub async fn fetch<L: Lifecycle>(
    kind: &L,
    ctx: &HostContext,
    id: &str,
    timeout: Duration,
) -> Result<Option<L::Info>> {
    retry_lookup(ctx, timeout, &[L::NOT_FOUND_CODE], || kind.lookup(id)).await
}

/// One refresh inside a state wait: retries are bounded by the poll cadence
/// and by what is left of the callback
async fn refresh<L: Lifecycle>(
    kind: &L,
    ctx: &HostContext,
    id: &str,
    deadline: Deadline,
) -> Result<Observed<L::Info>> {
    let timeout = deadline.within(ctx.tuning().refresh_timeout());
    fetch(kind, ctx, id, timeout).await.map(observe::<L>)
}

/// Poll a fresh or modified resource until it is `RUNNING`
pub async fn wait_running<L: Lifecycle>(
    kind: &L,
    ctx: &HostContext,
    id: &str,
    pending: &[&str],
    deadline: Deadline,
) -> Result<L::Info> {
    let found = StateConf::new(ctx, label::<L>(id), deadline.remaining())
        .pending(pending)
        .target(&[L::RUNNING])
        .fail_on(L::FAIL)
        .wait(ctx, || refresh(kind, ctx, id, deadline))
        .await?;

    found.ok_or_else(|| Error::NotFound {
        resource: label::<L>(id),
        checks: ctx.tuning().not_found_checks,
    })
}

/// Fetch `id`, polling through operational statuses so the host never
/// stores a transient one. `None` when the resource is gone.
pub async fn read_settled<L: Lifecycle>(
    kind: &L,
    ctx: &HostContext,
    id: &str,
    deadline: Deadline,
) -> Result<Option<L::Info>> {
    let Some(info) = fetch(kind, ctx, id, deadline.remaining()).await? else {
        info!(resource = %label::<L>(id), "Resource is gone, clearing id");
        return Ok(None);
    };

    let status = L::status(&info);
    if !L::OPERATIONAL.contains(&status) {
        return Ok(Some(info));
    }

    debug!(resource = %label::<L>(id), status = %status, "Polling through operational status");
    StateConf::new(ctx, label::<L>(id), deadline.remaining())
        .pending(L::OPERATIONAL)
        .until_settled()
        .accept_gone()
        .wait(ctx, || refresh(kind, ctx, id, deadline))
        .await
}

/// Two-stage delete: soft delete into the recycle bin, then destroy when
/// `force` is set. Already-recycled and not-found answers count as success.
/// All stages share `deadline`.
pub async fn delete<L: Lifecycle>(
    kind: &L,
    ctx: &HostContext,
    id: &str,
    force: bool,
    deadline: Deadline,
) -> Result<()> {
    let gone = retry_idempotent(
        ctx,
        deadline.remaining(),
        L::DELETE_RETRY_CODES,
        &[L::NOT_FOUND_CODE],
        &[L::RECYCLED_CODE],
        || kind.soft_delete(id),
    )
    .await?;
    if gone {
        info!(resource = %label::<L>(id), "Resource already gone");
        return Ok(());
    }

    let recycled = StateConf::new(ctx, label::<L>(id), deadline.remaining())
        .pending(L::OPERATIONAL)
        .target(&[L::RECYCLED])
        .accept_gone()
        .strict()
        .wait(ctx, || refresh(kind, ctx, id, deadline))
        .await?;

    if recycled.is_none() || !force {
        return Ok(());
    }

    info!(resource = %label::<L>(id), "Destroying recycled resource");
    retry_idempotent(ctx, deadline.remaining(), &[], &[L::NOT_FOUND_CODE], &[], || {
        kind.destroy(id)
    })
    .await?;
    Ok(())
}
