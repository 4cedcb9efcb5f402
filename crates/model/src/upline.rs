use crate::{Address, ReferrerMap};

/// The referrer chain of a user, nearest referrer first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Upline {
    /// The user.
    pub user: Address,
    /// Referrers from the direct referrer up to the root.
    pub chain: Vec<Address>,
    /// Whether the walk was cut off by the cycle guard.
    pub truncated: bool,
}

impl Upline {
    /// The root of the chain, if the chain is well-formed and non-empty.
    pub fn root(&self) -> Option<&Address> {
        if self.truncated {
            None
        } else {
            self.chain.last()
        }
    }
}

impl ReferrerMap {
    /// Collect the referrer chain of the user.
    pub fn upline(&self, user: &Address) -> Upline {
        let bound = self.walk_bound();
        let mut chain = Vec::new();
        let mut current = user;
        let mut truncated = false;
        while let Some(next) = self.referrer_of(current) {
            // Every hop consumes a distinct registered user unless there is a cycle.
            if chain.len() == bound {
                truncated = true;
                break;
            }
            chain.push(next.clone());
            current = next;
        }
        Upline {
            user: user.clone(),
            chain,
            truncated,
        }
    }
}
