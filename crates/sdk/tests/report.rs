use std::{
    collections::HashMap,
    future::pending,
    num::NonZeroU32,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use ubet_sdk::{
    build_downline_report, build_downline_report_with_cancel,
    model::{Address, DownlineOptions, OmissionReason},
    source::memory::EdgeFile,
    Error, FetchOptions, MemorySource, ReferralOps, ReferralSource, ReportOptions,
};

fn scenario() -> MemorySource {
    MemorySource::from_edges([
        ("0xS", None),
        ("0xA", Some("0xS")),
        ("0xB", Some("0xS")),
        ("0xC", Some("0xA")),
        ("0xD", Some("0xC")),
    ])
}

/// Never answers a lookup.
struct Stalled {
    users: Vec<Address>,
}

impl ReferralSource for Stalled {
    async fn list_all_registered_users(&self) -> ubet_sdk::Result<Vec<Address>> {
        Ok(self.users.clone())
    }

    async fn get_referrer_of(&self, _user: &Address) -> ubet_sdk::Result<Option<Address>> {
        pending().await
    }
}

/// Records the peak number of concurrent lookups.
struct Counting {
    inner: MemorySource,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl ReferralSource for Counting {
    async fn list_all_registered_users(&self) -> ubet_sdk::Result<Vec<Address>> {
        self.inner.list_all_registered_users().await
    }

    async fn get_referrer_of(&self, user: &Address) -> ubet_sdk::Result<Option<Address>> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.inner.get_referrer_of(user).await
    }
}

#[tokio::test]
async fn example_scenario() -> eyre::Result<()> {
    let report = build_downline_report(&scenario(), &"0xs".into()).await?;

    assert_eq!(report.total_users, 4);
    assert_eq!(report.direct_referrals, 2);
    assert_eq!(report.indirect_referrals, 2);
    assert_eq!(
        report.levels.iter().map(|(l, n)| (*l, *n)).collect::<Vec<_>>(),
        vec![(1, 2), (2, 1), (3, 1)]
    );

    let referred = report
        .users
        .iter()
        .map(|entry| (entry.address.as_str(), entry.referred_users.clone()))
        .collect::<HashMap<_, _>>();
    assert_eq!(referred["0xa"], vec![Address::new("0xC")]);
    assert_eq!(referred["0xc"], vec![Address::new("0xD")]);
    assert!(referred["0xb"].is_empty());
    assert!(referred["0xd"].is_empty());
    assert!(report.is_complete());
    Ok(())
}

#[tokio::test]
async fn lookup_failure_is_omitted() -> eyre::Result<()> {
    let mut source = scenario();
    source.insert_lookup_error("0xC".into(), "execution reverted");

    let report = build_downline_report(&source, &"0xS".into()).await?;

    assert!(report.get(&"0xc".into()).is_none());
    // D hangs off C, whose referrer is unknown.
    assert!(report.get(&"0xd".into()).is_none());
    assert_eq!(report.total_users, 2);
    assert_eq!(report.omitted.len(), 1);
    assert_eq!(report.omitted[0].address, Address::new("0xc"));
    assert!(matches!(
        &report.omitted[0].reason,
        OmissionReason::LookupFailed(msg) if msg == "execution reverted"
    ));
    Ok(())
}

#[tokio::test]
async fn listing_failure_aborts() {
    let mut source = scenario();
    source.set_listing_error(Some("node unreachable".to_string()));

    let err = build_downline_report(&source, &"0xS".into())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable(_)));
}

#[tokio::test]
async fn cancellation() {
    let source = Stalled {
        users: vec!["0xa".into(), "0xb".into()],
    };
    let err = build_downline_report_with_cancel(
        &source,
        &"0xa".into(),
        &ReportOptions::default(),
        tokio::time::sleep(Duration::from_millis(20)),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

#[tokio::test]
async fn timeout_is_cancellation() {
    let source = Stalled {
        users: vec!["0xa".into()],
    };
    let options = ReportOptions::builder()
        .fetch(
            FetchOptions::builder()
                .timeout(Duration::from_millis(20))
                .build(),
        )
        .build();
    let err = source
        .downline_report(&"0xa".into(), &options)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

#[tokio::test]
async fn lookups_are_bounded() -> eyre::Result<()> {
    let edges = (0..40).map(|idx| {
        let user = format!("0x{idx:02}");
        let referrer = (idx > 0).then(|| format!("0x{:02}", idx / 2));
        (user, referrer)
    });
    let peak = Arc::new(AtomicUsize::new(0));
    let source = Counting {
        inner: MemorySource::from_edges(edges),
        in_flight: Arc::default(),
        peak: peak.clone(),
    };
    let options = ReportOptions::builder()
        .fetch(FetchOptions::builder().concurrency(4).build())
        .build();

    let report = source.downline_report(&"0x00".into(), &options).await?;

    assert_eq!(report.total_users, 39);
    let peak = peak.load(Ordering::SeqCst);
    assert!(peak <= 4, "peak concurrency {peak}");
    Ok(())
}

#[tokio::test]
async fn max_depth() -> eyre::Result<()> {
    let options = ReportOptions::builder()
        .downline(
            DownlineOptions::builder()
                .max_depth(NonZeroU32::MIN.saturating_add(1))
                .build(),
        )
        .build();
    let report = scenario().downline_report(&"0xS".into(), &options).await?;
    assert_eq!(report.total_users, 3);
    assert!(report.get(&"0xd".into()).is_none());
    Ok(())
}

#[tokio::test]
async fn repeated_reports_are_equal() -> eyre::Result<()> {
    let source = scenario();
    let first = build_downline_report(&source, &"0xS".into()).await?;
    let second = build_downline_report(&source, &"0xS".into()).await?;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn from_edge_file() -> eyre::Result<()> {
    let file: EdgeFile = serde_json::from_str(
        r#"{
            "users": [
                { "address": "0xS" },
                { "address": "0xA", "referrer": "0xS" },
                { "address": "0xB", "referrer": "0xA" },
                { "address": "0xX", "referrer": "0xY" },
                { "address": "0xY", "referrer": "0xX" }
            ]
        }"#,
    )?;
    let source = MemorySource::from(file);

    let report = build_downline_report(&source, &"0xs".into()).await?;
    assert_eq!(report.total_users, 2);
    assert_eq!(report.cycle_omissions(), 2);

    let stats = source.registry_stats(&FetchOptions::default()).await?;
    assert_eq!(stats.cyclic_users, 2);
    assert_eq!(stats.roots, 1);
    Ok(())
}
