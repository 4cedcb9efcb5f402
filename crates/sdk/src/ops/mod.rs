/// Referral operations.
pub mod referral;

pub use referral::{ReferralOps, ReportOptions};
