use crate::config::Columns;

/// Registry statistics.
#[derive(Debug, clap::Args)]
pub struct Stats {
    /// Skip the chain ID check.
    #[arg(long)]
    skip_chain_check: bool,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    #[serde(flatten)]
    stats: ubet_sdk::model::RegistryStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    on_chain_total: Option<u64>,
}

impl super::Command for Stats {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let source = ctx.source()?;
        if !self.skip_chain_check {
            source.check_chain_id(ctx.config().chain_id()).await?;
        }

        let snapshot = ctx.snapshot().await?;
        let on_chain_total = match source.as_rpc() {
            Some(rpc) => Some(rpc.total_registered().await?),
            None => None,
        };
        let report = Report {
            stats: snapshot.stats(),
            on_chain_total,
        };
        if let Some(total) = on_chain_total {
            let listed = report.stats.total_registered as u64;
            if total != listed {
                tracing::warn!(%total, %listed, "registry listing disagrees with the on-chain total");
            }
        }

        let output = ctx.config().output();
        println!(
            "{}",
            output.display_one(
                &report,
                Columns::new([
                    ("totalRegistered", "Registered"),
                    ("onChainTotal", "On-chain Total"),
                    ("roots", "Roots"),
                    ("referred", "Referred"),
                    ("maxDepth", "Max Depth"),
                    ("lookupFailures", "Lookup Failures"),
                    ("cyclicUsers", "Cyclic Users"),
                ]),
            )?
        );
        Ok(())
    }
}
