use std::{future::Future, time::Duration};

use futures_util::{stream, StreamExt};
use indexmap::IndexSet;
use typed_builder::TypedBuilder;
use ubet_model::{Address, ReferrerMap};

use crate::source::ReferralSource;

/// Default number of in-flight referrer lookups.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Options for fetching a snapshot.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct FetchOptions {
    /// Maximum number of in-flight referrer lookups. `0` is treated as `1`.
    #[builder(default = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
    /// Deadline for the whole fetch.
    #[builder(default, setter(strip_option))]
    pub timeout: Option<Duration>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FetchOptions {
    fn limit(&self) -> usize {
        self.concurrency.max(1)
    }
}

/// Resolve every registered user's referrer into a [`ReferrerMap`].
///
/// Fails with [`Error::SourceUnavailable`](crate::Error::SourceUnavailable)
/// if the users cannot be listed. Failed lookups are recorded in the
/// snapshot instead of failing the fetch. Exceeding the timeout yields
/// [`Error::Cancelled`](crate::Error::Cancelled).
pub async fn fetch_snapshot<S>(source: &S, options: &FetchOptions) -> crate::Result<ReferrerMap>
where
    S: ReferralSource,
{
    match options.timeout {
        Some(timeout) => tokio::time::timeout(timeout, fetch(source, options))
            .await
            .map_err(|_| {
                tracing::warn!(?timeout, "snapshot fetch timed out");
                crate::Error::Cancelled
            })?,
        None => fetch(source, options).await,
    }
}

/// Same as [`fetch_snapshot`], but aborts with
/// [`Error::Cancelled`](crate::Error::Cancelled) once `cancel` completes.
///
/// Lookups in flight are dropped, no partial snapshot is returned.
pub async fn fetch_snapshot_with_cancel<S>(
    source: &S,
    options: &FetchOptions,
    cancel: impl Future<Output = ()>,
) -> crate::Result<ReferrerMap>
where
    S: ReferralSource,
{
    tokio::select! {
        biased;
        () = cancel => {
            tracing::info!("snapshot fetch cancelled");
            Err(crate::Error::Cancelled)
        }
        res = fetch_snapshot(source, options) => res,
    }
}

async fn fetch<S>(source: &S, options: &FetchOptions) -> crate::Result<ReferrerMap>
where
    S: ReferralSource,
{
    let listed = source
        .list_all_registered_users()
        .await
        .map_err(crate::Error::into_source_unavailable)?;
    let users: IndexSet<Address> = listed.into_iter().collect();
    tracing::debug!(users = users.len(), "listed registered users");

    let mut builder = ReferrerMap::builder();
    let mut lookups = stream::iter(users)
        .map(|user| async move {
            let res = source.get_referrer_of(&user).await;
            (user, res)
        })
        .buffer_unordered(options.limit());

    while let Some((user, res)) = lookups.next().await {
        match res {
            Ok(referrer) => {
                builder.insert_referrer(user, referrer);
            }
            Err(crate::Error::Cancelled) => return Err(crate::Error::Cancelled),
            Err(err) => {
                tracing::warn!(%user, %err, "referrer lookup failed");
                builder.insert_failure(user, err.lookup_message());
            }
        }
    }

    let snapshot = builder.build();
    tracing::debug!(
        users = snapshot.len(),
        failures = snapshot.failure_count(),
        "fetched snapshot"
    );
    Ok(snapshot)
}
