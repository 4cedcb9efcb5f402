/// In-memory edge source.
pub mod memory;

/// JSON-RPC source backed by the on-chain referral registry.
#[cfg(client)]
pub mod rpc;

use std::future::Future;

use ubet_model::Address;

/// A source of referral edges.
///
/// Implementations are best-effort external systems. A failure of
/// [`list_all_registered_users`](ReferralSource::list_all_registered_users)
/// aborts report building, a failure of
/// [`get_referrer_of`](ReferralSource::get_referrer_of) only excludes the
/// user concerned.
pub trait ReferralSource {
    /// List every registered user.
    fn list_all_registered_users(&self) -> impl Future<Output = crate::Result<Vec<Address>>>;

    /// Get the direct referrer of the user, or `None` for a root.
    ///
    /// Implementations may return the zero address for a root, it is
    /// normalized to `None` by the snapshot.
    fn get_referrer_of(
        &self,
        user: &Address,
    ) -> impl Future<Output = crate::Result<Option<Address>>>;
}

impl<T: ReferralSource> ReferralSource for &T {
    fn list_all_registered_users(&self) -> impl Future<Output = crate::Result<Vec<Address>>> {
        (**self).list_all_registered_users()
    }

    fn get_referrer_of(
        &self,
        user: &Address,
    ) -> impl Future<Output = crate::Result<Option<Address>>> {
        (**self).get_referrer_of(user)
    }
}
