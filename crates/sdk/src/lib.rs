#![deny(missing_docs)]
#![deny(unreachable_pub)]

//! # Universal Bet SDK
//!
//! Builds referral reports for the Universal Bet raffle platform.
//!
//! Report building is split into two phases. [`fetch`] resolves the whole
//! registry from a [`ReferralSource`] into an immutable
//! [`ReferrerMap`](crate::model::ReferrerMap) snapshot; this is the only async
//! and fallible step. The downline walk and aggregation then run over the
//! snapshot without any I/O, see [`ubet_model`].

/// Error type.
pub mod error;

/// Constants of the BSC testnet deployment.
pub mod constants;

/// Contract ABI encoding and decoding.
pub mod abi;

/// Referral edge sources.
pub mod source;

/// Snapshot fetching.
pub mod fetch;

/// Operations.
pub mod ops;

/// Pool tiers.
pub mod pool;

#[cfg(test)]
mod utils;

/// Model support.
pub mod model {
    pub use ubet_model::*;
}

pub use error::Error;
pub use fetch::{fetch_snapshot, fetch_snapshot_with_cancel, FetchOptions};
pub use ops::referral::{
    build_downline_report, build_downline_report_with_cancel, build_downline_report_with_options,
    ReferralOps, ReportOptions,
};
pub use source::{memory::MemorySource, ReferralSource};

#[cfg(client)]
pub use source::rpc::RpcReferralSource;

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;
