use ubet_sdk::model::Address;

use crate::config::Columns;

/// Direct referrals.
#[derive(Debug, clap::Args)]
pub struct Referrals {
    /// The referrer.
    address: Address,
}

#[derive(serde::Serialize)]
struct Referral<'a> {
    address: &'a Address,
    referrals: usize,
}

impl super::Command for Referrals {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let snapshot = ctx.snapshot().await?;
        if !snapshot.contains(&self.address) {
            tracing::warn!(address = %self.address, "user is not registered");
        }
        let referrals = snapshot
            .referees_of(&self.address)
            .iter()
            .map(|address| Referral {
                address,
                referrals: snapshot.referees_of(address).len(),
            });
        let output = ctx.config().output();
        println!(
            "{}",
            output.display_many(
                referrals,
                Columns::new([
                    ("address", "Address"),
                    ("referrals", "Direct Referrals"),
                ]),
            )?
        );
        Ok(())
    }
}
