use ubet_sdk::model::Address;

use crate::config::Columns;

/// Referrer chain.
#[derive(Debug, clap::Args)]
pub struct Upline {
    /// The user.
    address: Address,
}

#[derive(serde::Serialize)]
struct Hop<'a> {
    level: usize,
    referrer: &'a Address,
}

impl super::Command for Upline {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let source = ctx.source()?;
        if let Some(rpc) = source.as_rpc() {
            if !rpc.check_if_registered(&self.address).await? {
                eyre::bail!("`{}` is not registered", self.address);
            }
        }

        let snapshot = ctx.snapshot().await?;
        let upline = snapshot.upline(&self.address);
        if upline.truncated {
            tracing::warn!(address = %self.address, "referrer chain is cyclic, truncated");
        }

        let hops = upline
            .chain
            .iter()
            .enumerate()
            .map(|(idx, referrer)| Hop {
                level: idx + 1,
                referrer,
            });
        let output = ctx.config().output();
        println!(
            "{}",
            output.display_many(
                hops,
                Columns::new([("level", "Level"), ("referrer", "Referrer")]),
            )?
        );
        Ok(())
    }
}
