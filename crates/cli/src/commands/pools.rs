use crate::config::Columns;

/// Pool tiers.
#[derive(Debug, clap::Args)]
pub struct Pools {}

impl super::Command for Pools {
    fn is_source_required(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let config = ctx.config();
        let output = config.output();
        println!(
            "{}",
            output.display_keyed_many(
                "pool",
                config.pools(),
                Columns::new([
                    ("pool", "Pool"),
                    ("name", "Name"),
                    ("entryFeeUsd", "Entry Fee (USD)"),
                    ("address", "Address"),
                ]),
            )?
        );
        Ok(())
    }
}
