use std::future::Future;

use typed_builder::TypedBuilder;
use ubet_model::{
    Address, DownlineBuilder, DownlineOptions, DownlineReport, ReferrerMap, RegistryStats, Upline,
};

use crate::{
    fetch::{fetch_snapshot, fetch_snapshot_with_cancel, FetchOptions},
    source::ReferralSource,
};

/// Options for building a downline report.
#[derive(Debug, Clone, Copy, Default, TypedBuilder)]
pub struct ReportOptions {
    /// Fetch options.
    #[builder(default)]
    pub fetch: FetchOptions,
    /// Walk options.
    #[builder(default)]
    pub downline: DownlineOptions,
}

/// Referral operations over a [`ReferralSource`].
///
/// Every operation fetches a fresh snapshot. Use [`ReferralOps::snapshot`]
/// together with the methods of [`ReferrerMap`] to answer several
/// questions from the same state.
pub trait ReferralOps {
    /// Fetch a snapshot of the registry.
    fn snapshot(&self, options: &FetchOptions) -> impl Future<Output = crate::Result<ReferrerMap>>;

    /// Build the downline report of `subject`.
    fn downline_report(
        &self,
        subject: &Address,
        options: &ReportOptions,
    ) -> impl Future<Output = crate::Result<DownlineReport>>;

    /// Get the users directly referred by `user`, sorted.
    fn direct_referrals(
        &self,
        user: &Address,
        options: &FetchOptions,
    ) -> impl Future<Output = crate::Result<Vec<Address>>>;

    /// Get the referrer chain of `user`.
    fn upline(
        &self,
        user: &Address,
        options: &FetchOptions,
    ) -> impl Future<Output = crate::Result<Upline>>;

    /// Get summary statistics of the registry.
    fn registry_stats(
        &self,
        options: &FetchOptions,
    ) -> impl Future<Output = crate::Result<RegistryStats>>;
}

impl<S: ReferralSource> ReferralOps for S {
    async fn snapshot(&self, options: &FetchOptions) -> crate::Result<ReferrerMap> {
        fetch_snapshot(self, options).await
    }

    async fn downline_report(
        &self,
        subject: &Address,
        options: &ReportOptions,
    ) -> crate::Result<DownlineReport> {
        let snapshot = fetch_snapshot(self, &options.fetch).await?;
        Ok(report(&snapshot, subject, options))
    }

    async fn direct_referrals(
        &self,
        user: &Address,
        options: &FetchOptions,
    ) -> crate::Result<Vec<Address>> {
        let snapshot = fetch_snapshot(self, options).await?;
        Ok(snapshot.referees_of(user).to_vec())
    }

    async fn upline(&self, user: &Address, options: &FetchOptions) -> crate::Result<Upline> {
        let snapshot = fetch_snapshot(self, options).await?;
        let upline = snapshot.upline(user);
        if upline.truncated {
            tracing::warn!(%user, "upline is cyclic, truncated");
        }
        Ok(upline)
    }

    async fn registry_stats(&self, options: &FetchOptions) -> crate::Result<RegistryStats> {
        let snapshot = fetch_snapshot(self, options).await?;
        Ok(snapshot.stats())
    }
}

/// Build the downline report of `subject` with default options.
pub async fn build_downline_report<S: ReferralSource>(
    source: &S,
    subject: &Address,
) -> crate::Result<DownlineReport> {
    source
        .downline_report(subject, &ReportOptions::default())
        .await
}

/// Build the downline report of `subject` with the given options.
pub async fn build_downline_report_with_options<S: ReferralSource>(
    source: &S,
    subject: &Address,
    options: &ReportOptions,
) -> crate::Result<DownlineReport> {
    source.downline_report(subject, options).await
}

/// Build the downline report of `subject`, aborting with
/// [`Error::Cancelled`](crate::Error::Cancelled) once `cancel` completes.
pub async fn build_downline_report_with_cancel<S: ReferralSource>(
    source: &S,
    subject: &Address,
    options: &ReportOptions,
    cancel: impl Future<Output = ()>,
) -> crate::Result<DownlineReport> {
    let snapshot = fetch_snapshot_with_cancel(source, &options.fetch, cancel).await?;
    Ok(report(&snapshot, subject, options))
}

fn report(snapshot: &ReferrerMap, subject: &Address, options: &ReportOptions) -> DownlineReport {
    let report = DownlineBuilder::new(snapshot)
        .with_options(options.downline)
        .build(subject);
    let cycles = report.cycle_omissions();
    if cycles != 0 {
        tracing::warn!(%subject, %cycles, "cyclic referrer chains omitted");
    }
    tracing::info!(
        %subject,
        total = report.total_users,
        direct = report.direct_referrals,
        indirect = report.indirect_referrals,
        omitted = report.omitted.len(),
        "built downline report"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{utils::test::setup_fmt_tracing, MemorySource};

    fn source() -> MemorySource {
        MemorySource::from_edges([
            ("a", Some("s")),
            ("b", Some("s")),
            ("c", Some("a")),
            ("s", None),
        ])
    }

    #[tokio::test]
    async fn direct_referrals_are_sorted() -> crate::Result<()> {
        let referrals = source()
            .direct_referrals(&"s".into(), &FetchOptions::default())
            .await?;
        assert_eq!(referrals, vec![Address::new("a"), Address::new("b")]);
        Ok(())
    }

    #[tokio::test]
    async fn upline_ends_at_root() -> crate::Result<()> {
        let _guard = setup_fmt_tracing("debug");
        let upline = source()
            .upline(&"c".into(), &FetchOptions::default())
            .await?;
        assert_eq!(upline.chain, vec![Address::new("a"), Address::new("s")]);
        assert!(!upline.truncated);
        Ok(())
    }

    #[tokio::test]
    async fn stats() -> crate::Result<()> {
        let stats = source().registry_stats(&FetchOptions::default()).await?;
        assert_eq!(stats.total_registered, 4);
        assert_eq!(stats.roots, 1);
        assert_eq!(stats.max_depth, 2);
        Ok(())
    }
}
