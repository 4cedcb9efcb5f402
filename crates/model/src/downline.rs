use std::num::NonZeroU32;

use typed_builder::TypedBuilder;

use crate::{
    report::{Aggregator, DownlineReport, Omission, OmissionReason},
    Address, ReferrerMap,
};

/// Options for building a downline report.
#[derive(Debug, Clone, Copy, Default, TypedBuilder)]
pub struct DownlineOptions {
    /// Only keep entries at or above this level.
    ///
    /// Deeper users are dropped silently, they are not omissions.
    #[builder(default, setter(strip_option))]
    pub max_depth: Option<NonZeroU32>,
}

/// Where a user stands relative to a report subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Membership {
    /// The user descends from the subject.
    Member {
        /// Distance from the subject, starting at `1`.
        level: u32,
        /// The direct referrer of the user (the first hop of the walk).
        referrer: Address,
    },
    /// The chain ends at a root without meeting the subject.
    NotMember,
    /// The walk did not terminate within the bound, the chain is cyclic.
    CycleGuardTripped,
}

impl ReferrerMap {
    /// Walk upward from `user` until reaching `subject` or a root.
    ///
    /// The walk takes at most [`ReferrerMap::walk_bound`] hops.
    pub fn membership(&self, user: &Address, subject: &Address) -> Membership {
        if user == subject {
            return Membership::NotMember;
        }
        let Some(first_hop) = self.referrer_of(user) else {
            return Membership::NotMember;
        };

        let mut current = first_hop;
        let mut level: u32 = 1;
        for _ in 0..self.walk_bound() {
            if current == subject {
                return Membership::Member {
                    level,
                    referrer: first_hop.clone(),
                };
            }
            match self.referrer_of(current) {
                Some(next) => {
                    current = next;
                    level = level.saturating_add(1);
                }
                None => return Membership::NotMember,
            }
        }
        Membership::CycleGuardTripped
    }
}

/// Builds the downline of a subject from a [`ReferrerMap`].
#[derive(Debug, Clone, Copy)]
pub struct DownlineBuilder<'a> {
    map: &'a ReferrerMap,
    options: DownlineOptions,
}

impl<'a> DownlineBuilder<'a> {
    /// Create a builder over the snapshot.
    pub fn new(map: &'a ReferrerMap) -> Self {
        Self {
            map,
            options: DownlineOptions::default(),
        }
    }

    /// Set options.
    pub fn with_options(mut self, options: DownlineOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the report for the given subject.
    pub fn build(&self, subject: &Address) -> DownlineReport {
        let mut aggregator = Aggregator::default();
        let mut omitted = self
            .map
            .failures()
            .map(|(user, msg)| Omission {
                address: user.clone(),
                reason: OmissionReason::LookupFailed(msg.to_string()),
            })
            .collect::<Vec<_>>();

        for user in self.map.users() {
            match self.map.membership(user, subject) {
                Membership::Member { level, referrer } => {
                    if self.is_within_depth(level) {
                        aggregator.push(user.clone(), referrer, level);
                    }
                }
                Membership::NotMember => {}
                Membership::CycleGuardTripped => omitted.push(Omission {
                    address: user.clone(),
                    reason: OmissionReason::CycleGuardTripped,
                }),
            }
        }

        omitted.sort_by(|a, b| a.address.cmp(&b.address));
        aggregator.finish(subject.clone(), omitted)
    }

    fn is_within_depth(&self, level: u32) -> bool {
        self.options
            .max_depth
            .map(|max| level <= max.get())
            .unwrap_or(true)
    }
}
