use std::num::NonZeroU32;

use ubet_sdk::{
    build_downline_report_with_cancel,
    model::{Address, DownlineOptions, DownlineReport, OmissionReason},
    ReportOptions,
};

use crate::config::{Columns, OutputFormat};

use super::shutdown_signal;

/// Downline report.
#[derive(Debug, clap::Args)]
pub struct Downline {
    /// The subject of the report.
    address: Address,
    /// Only include users up to this level.
    #[arg(long)]
    max_depth: Option<NonZeroU32>,
}

#[derive(serde::Serialize)]
struct Summary<'a> {
    subject: &'a Address,
    total: usize,
    direct: usize,
    indirect: usize,
    omitted: usize,
}

#[derive(serde::Serialize)]
struct Level {
    level: u32,
    users: usize,
}

#[derive(serde::Serialize)]
struct OmittedUser<'a> {
    address: &'a Address,
    reason: String,
}

impl super::Command for Downline {
    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let source = ctx.source()?;
        let options = ReportOptions {
            fetch: ctx.config().fetch_options(),
            downline: DownlineOptions {
                max_depth: self.max_depth,
            },
        };
        let report =
            build_downline_report_with_cancel(source, &self.address, &options, shutdown_signal())
                .await?;
        println!("{}", render(&report, ctx.config().output())?);
        Ok(())
    }
}

fn render(report: &DownlineReport, output: OutputFormat) -> eyre::Result<String> {
    if matches!(output, OutputFormat::Json) {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    let summary = Summary {
        subject: &report.subject,
        total: report.total_users,
        direct: report.direct_referrals,
        indirect: report.indirect_referrals,
        omitted: report.omitted.len(),
    };
    let levels = report
        .levels
        .iter()
        .map(|(level, users)| Level {
            level: *level,
            users: *users,
        });

    let mut sections = vec![
        output.display_one(
            &summary,
            Columns::new([
                ("subject", "Subject"),
                ("total", "Total Users"),
                ("direct", "Direct Referrals"),
                ("indirect", "Indirect Referrals"),
                ("omitted", "Omitted"),
            ]),
        )?,
        output.display_many(
            levels,
            Columns::new([("level", "Level"), ("users", "Users")]),
        )?,
        output.display_many(
            &report.users,
            Columns::new([
                ("address", "Address"),
                ("level", "Level"),
                ("referrer", "Referrer"),
                ("referredUsers", "Referred Users"),
            ]),
        )?,
    ];

    if !report.omitted.is_empty() {
        let omitted = report.omitted.iter().map(|omission| OmittedUser {
            address: &omission.address,
            reason: match &omission.reason {
                OmissionReason::LookupFailed(msg) => format!("lookup failed: {msg}"),
                OmissionReason::CycleGuardTripped => "cyclic referrer chain".to_string(),
            },
        });
        sections.push(output.display_many(
            omitted,
            Columns::new([("address", "Omitted"), ("reason", "Reason")]),
        )?);
    }

    Ok(sections.join("\n"))
}
