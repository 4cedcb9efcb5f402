use std::collections::{BTreeMap, HashMap};

use indexmap::IndexSet;

use crate::Address;

/// An immutable snapshot of the referral registry.
///
/// Holds the registered population, the resolved `referee -> referrer`
/// edges and a reverse index from each referrer to its direct referees.
/// Users whose referrer could not be resolved are kept in the population
/// but have no edge; the failure message is retained.
#[derive(Debug, Clone, Default)]
pub struct ReferrerMap {
    users: IndexSet<Address>,
    referrers: HashMap<Address, Address>,
    referees: HashMap<Address, Vec<Address>>,
    failures: BTreeMap<Address, String>,
}

impl ReferrerMap {
    /// Create a [`ReferrerMapBuilder`].
    pub fn builder() -> ReferrerMapBuilder {
        ReferrerMapBuilder::default()
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Returns whether the user is part of the registered population.
    pub fn contains(&self, user: &Address) -> bool {
        self.users.contains(user)
    }

    /// All registered users, in first-seen order.
    pub fn users(&self) -> impl Iterator<Item = &Address> {
        self.users.iter()
    }

    /// Get the direct referrer of the user.
    ///
    /// Returns `None` for roots, unknown users and users whose lookup failed.
    pub fn referrer_of(&self, user: &Address) -> Option<&Address> {
        self.referrers.get(user)
    }

    /// Get the direct referees of the given address, sorted by address.
    pub fn referees_of(&self, referrer: &Address) -> &[Address] {
        self.referees
            .get(referrer)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Users whose referrer lookup failed, with the failure message.
    pub fn failures(&self) -> impl Iterator<Item = (&Address, &str)> {
        self.failures.iter().map(|(user, msg)| (user, msg.as_str()))
    }

    /// Number of users whose referrer lookup failed.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// The maximum number of upward hops any well-formed chain can take.
    ///
    /// A walk that needs more hops than this must be going around a cycle.
    pub fn walk_bound(&self) -> usize {
        self.users.len().max(1)
    }
}

/// Builder for [`ReferrerMap`].
#[derive(Debug, Default)]
pub struct ReferrerMapBuilder {
    users: IndexSet<Address>,
    referrers: HashMap<Address, Address>,
    failures: BTreeMap<Address, String>,
}

impl ReferrerMapBuilder {
    /// Register a user without resolving its referrer.
    ///
    /// Returns `true` if the user is newly inserted.
    pub fn insert_user(&mut self, user: Address) -> bool {
        self.users.insert(user)
    }

    /// Record the resolved referrer of a user.
    ///
    /// A zero referrer marks the user as a root. A later record for the same
    /// user replaces the earlier one.
    pub fn insert_referrer(&mut self, user: Address, referrer: Option<Address>) -> &mut Self {
        self.failures.remove(&user);
        match referrer.and_then(Address::non_zero) {
            Some(referrer) => {
                self.referrers.insert(user.clone(), referrer);
            }
            None => {
                self.referrers.remove(&user);
            }
        }
        self.users.insert(user);
        self
    }

    /// Record a failed referrer lookup. The user is treated as a root.
    pub fn insert_failure(&mut self, user: Address, message: impl ToString) -> &mut Self {
        self.referrers.remove(&user);
        self.failures.insert(user.clone(), message.to_string());
        self.users.insert(user);
        self
    }

    /// Freeze into a [`ReferrerMap`], building the reverse index.
    pub fn build(self) -> ReferrerMap {
        let Self {
            users,
            referrers,
            failures,
        } = self;

        let mut referees: HashMap<Address, Vec<Address>> = HashMap::new();
        for (referee, referrer) in referrers.iter() {
            referees
                .entry(referrer.clone())
                .or_default()
                .push(referee.clone());
        }
        for list in referees.values_mut() {
            list.sort_unstable();
        }

        ReferrerMap {
            users,
            referrers,
            referees,
            failures,
        }
    }
}

impl<A: Into<Address>> FromIterator<(A, Option<A>)> for ReferrerMap {
    fn from_iter<T: IntoIterator<Item = (A, Option<A>)>>(iter: T) -> Self {
        let mut builder = Self::builder();
        for (user, referrer) in iter {
            builder.insert_referrer(user.into(), referrer.map(Into::into));
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_index() {
        let map = ReferrerMap::from_iter([
            ("s", None),
            ("b", Some("s")),
            ("a", Some("s")),
            ("c", Some("A")),
        ]);
        assert_eq!(map.len(), 4);
        assert_eq!(
            map.referees_of(&"s".into()),
            &[Address::new("a"), Address::new("b")]
        );
        assert_eq!(map.referees_of(&"a".into()), &[Address::new("c")]);
        assert!(map.referees_of(&"c".into()).is_empty());
        assert_eq!(map.referrer_of(&"c".into()), Some(&Address::new("a")));
        assert_eq!(map.referrer_of(&"s".into()), None);
    }

    #[test]
    fn zero_referrer_is_root() {
        let map = ReferrerMap::from_iter([(
            "a",
            Some("0x0000000000000000000000000000000000000000"),
        )]);
        assert_eq!(map.referrer_of(&"a".into()), None);
        assert!(map.referees_of(&Address::zero()).is_empty());
    }

    #[test]
    fn duplicates_collapse() {
        let mut builder = ReferrerMap::builder();
        builder
            .insert_referrer("A".into(), Some("s".into()))
            .insert_referrer("a".into(), Some("s".into()));
        let map = builder.build();
        assert_eq!(map.len(), 1);
        assert_eq!(map.referees_of(&"s".into()).len(), 1);
    }

    #[test]
    fn failures_are_roots() {
        let mut builder = ReferrerMap::builder();
        builder
            .insert_referrer("a".into(), Some("s".into()))
            .insert_failure("a".into(), "rpc timeout");
        let map = builder.build();
        assert_eq!(map.referrer_of(&"a".into()), None);
        assert_eq!(map.failure_count(), 1);
        assert_eq!(
            map.failures().collect::<Vec<_>>(),
            vec![(&Address::new("a"), "rpc timeout")]
        );
        assert!(map.contains(&"a".into()));
    }
}
