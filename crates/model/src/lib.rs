#![deny(missing_docs)]
#![deny(unreachable_pub)]

//! Referral graph model for the Universal Bet platform.
//!
//! Everything in this crate is a pure computation over an immutable
//! [`ReferrerMap`] snapshot. Fetching the snapshot is left to the caller.

/// Address type.
pub mod address;

/// Referrer map snapshot.
pub mod snapshot;

/// Downline tree builder.
pub mod downline;

/// Downline report and its aggregator.
pub mod report;

/// Upline (referrer chain) lookup.
pub mod upline;

/// Registry statistics.
pub mod stats;

/// Error type.
pub mod error;

pub use address::Address;
pub use downline::{DownlineBuilder, DownlineOptions, Membership};
pub use error::Error;
pub use report::{DownlineEntry, DownlineReport, Omission, OmissionReason};
pub use snapshot::{ReferrerMap, ReferrerMapBuilder};
pub use stats::RegistryStats;
pub use upline::Upline;

/// Alias for result.
pub type Result<T> = std::result::Result<T, Error>;
