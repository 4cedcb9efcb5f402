use std::path::Path;

use downline::Downline;
use enum_dispatch::enum_dispatch;
use eyre::OptionExt;
use init_config::InitConfig;
use pools::Pools;
use referrals::Referrals;
use stats::Stats;
use ubet_sdk::{fetch_snapshot_with_cancel, model::ReferrerMap};
use upline::Upline;

use crate::{config::Config, source::AnySource};

mod downline;
mod init_config;
mod pools;
mod referrals;
mod stats;
mod upline;

/// Commands.
#[enum_dispatch]
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Initialize config file.
    InitConfig(InitConfig),
    /// Show the downline report of a user.
    Downline(Downline),
    /// List the users directly referred by a user.
    Referrals(Referrals),
    /// Show the referrer chain of a user.
    Upline(Upline),
    /// Show registry statistics.
    Stats(Stats),
    /// List the configured pool tiers.
    Pools(Pools),
}

#[enum_dispatch(Commands)]
pub(crate) trait Command {
    fn is_source_required(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: Context<'_>) -> eyre::Result<()>;
}

pub(crate) struct Context<'a> {
    config_path: &'a Path,
    config: &'a Config,
    source: Option<&'a AnySource>,
}

impl<'a> Context<'a> {
    pub(super) fn new(
        config_path: &'a Path,
        config: &'a Config,
        source: Option<&'a AnySource>,
    ) -> Self {
        Self {
            config_path,
            config,
            source,
        }
    }

    pub(crate) fn config_path(&self) -> &Path {
        self.config_path
    }

    pub(crate) fn config(&self) -> &Config {
        self.config
    }

    pub(crate) fn source(&self) -> eyre::Result<&AnySource> {
        self.source.ok_or_eyre("referral source is not provided")
    }

    /// Fetch a snapshot of the registry, aborting on Ctrl-C.
    pub(crate) async fn snapshot(&self) -> eyre::Result<ReferrerMap> {
        let source = self.source()?;
        let options = self.config.fetch_options();
        Ok(fetch_snapshot_with_cancel(source, &options, shutdown_signal()).await?)
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
pub(crate) async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
