use std::collections::{BTreeMap, HashMap};

use crate::Address;

/// A user found in the downline of the report subject.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DownlineEntry {
    /// Address of the user.
    pub address: Address,
    /// Direct referrer of the user.
    pub referrer: Address,
    /// Distance from the subject. Direct referrals are at level `1`.
    pub level: u32,
    /// Direct referees of this user that are also in the report.
    pub referred_users: Vec<Address>,
}

/// Why a user was left out of consideration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", content = "message", rename_all = "kebab-case")
)]
pub enum OmissionReason {
    /// The referrer of the user could not be resolved.
    LookupFailed(String),
    /// The referrer chain of the user is cyclic.
    CycleGuardTripped,
}

/// A user omitted from the report.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Omission {
    /// Address of the user.
    pub address: Address,
    /// Reason.
    pub reason: OmissionReason,
}

/// Downline report of a single subject.
///
/// `users` is ordered by `(level, address)` and every `referred_users` list
/// is ordered by address, so equal inputs always give equal reports.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DownlineReport {
    /// The subject of the report.
    pub subject: Address,
    /// Number of entries.
    pub total_users: usize,
    /// Number of entries at level `1`.
    pub direct_referrals: usize,
    /// Number of entries at level `2` or deeper.
    pub indirect_referrals: usize,
    /// Number of entries per level. Only non-empty levels are present.
    pub levels: BTreeMap<u32, usize>,
    /// Entries.
    pub users: Vec<DownlineEntry>,
    /// Users left out because of data-integrity problems.
    #[cfg_attr(feature = "serde", serde(default))]
    pub omitted: Vec<Omission>,
}

impl DownlineReport {
    /// Returns `true` if no user was omitted.
    pub fn is_complete(&self) -> bool {
        self.omitted.is_empty()
    }

    /// Get the entry of the given user.
    pub fn get(&self, address: &Address) -> Option<&DownlineEntry> {
        self.users.iter().find(|entry| entry.address == *address)
    }

    /// Entries at the given level.
    pub fn at_level(&self, level: u32) -> impl Iterator<Item = &DownlineEntry> {
        self.users.iter().filter(move |entry| entry.level == level)
    }

    /// Number of omissions caused by cyclic referrer chains.
    pub fn cycle_omissions(&self) -> usize {
        self.omitted
            .iter()
            .filter(|omission| matches!(omission.reason, OmissionReason::CycleGuardTripped))
            .count()
    }
}

/// Turns downline members into a [`DownlineReport`].
#[derive(Debug, Default)]
pub(crate) struct Aggregator {
    entries: Vec<DownlineEntry>,
    levels: BTreeMap<u32, usize>,
    direct: usize,
}

impl Aggregator {
    pub(crate) fn push(&mut self, address: Address, referrer: Address, level: u32) {
        *self.levels.entry(level).or_default() += 1;
        if level == 1 {
            self.direct += 1;
        }
        self.entries.push(DownlineEntry {
            address,
            referrer,
            level,
            referred_users: Vec::new(),
        });
    }

    pub(crate) fn finish(self, subject: Address, omitted: Vec<Omission>) -> DownlineReport {
        let Self {
            mut entries,
            levels,
            direct,
        } = self;

        entries.sort_unstable_by(|a, b| {
            a.level
                .cmp(&b.level)
                .then_with(|| a.address.cmp(&b.address))
        });

        // Entries are sorted, so each group is sorted by address as well.
        let mut groups: HashMap<Address, Vec<Address>> = HashMap::new();
        for entry in entries.iter() {
            groups
                .entry(entry.referrer.clone())
                .or_default()
                .push(entry.address.clone());
        }
        for entry in entries.iter_mut() {
            entry.referred_users = groups.remove(&entry.address).unwrap_or_default();
        }

        let total = entries.len();
        DownlineReport {
            subject,
            total_users: total,
            direct_referrals: direct,
            indirect_referrals: total - direct,
            levels,
            users: entries,
            omitted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate() {
        let mut aggregator = Aggregator::default();
        aggregator.push("d".into(), "c".into(), 3);
        aggregator.push("b".into(), "s".into(), 1);
        aggregator.push("c".into(), "a".into(), 2);
        aggregator.push("a".into(), "s".into(), 1);
        let report = aggregator.finish("s".into(), vec![]);

        assert_eq!(report.total_users, 4);
        assert_eq!(report.direct_referrals, 2);
        assert_eq!(report.indirect_referrals, 2);
        assert_eq!(report.levels, BTreeMap::from([(1, 2), (2, 1), (3, 1)]));
        let order = report
            .users
            .iter()
            .map(|entry| entry.address.as_str())
            .collect::<Vec<_>>();
        assert_eq!(order, ["a", "b", "c", "d"]);
        assert_eq!(
            report.get(&"a".into()).unwrap().referred_users,
            vec![Address::new("c")]
        );
        assert!(report.get(&"b".into()).unwrap().referred_users.is_empty());
        assert!(report.is_complete());
    }

    #[test]
    fn empty() {
        let report = Aggregator::default().finish("s".into(), vec![]);
        assert_eq!(report.total_users, 0);
        assert!(report.levels.is_empty());
        assert!(report.users.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn camel_case_json() {
        let mut aggregator = Aggregator::default();
        aggregator.push("a".into(), "s".into(), 1);
        let report = aggregator.finish(
            "s".into(),
            vec![Omission {
                address: "x".into(),
                reason: OmissionReason::CycleGuardTripped,
            }],
        );
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["totalUsers"], 1);
        assert_eq!(value["directReferrals"], 1);
        assert_eq!(value["indirectReferrals"], 0);
        assert_eq!(value["levels"]["1"], 1);
        assert_eq!(value["users"][0]["referredUsers"], serde_json::json!([]));
        assert_eq!(value["omitted"][0]["reason"]["kind"], "cycle-guard-tripped");

        let decoded: DownlineReport = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, report);
    }
}
