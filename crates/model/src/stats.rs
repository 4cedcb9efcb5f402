use crate::ReferrerMap;

/// Statistics of the whole registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RegistryStats {
    /// Number of registered users.
    pub total_registered: usize,
    /// Users registered without a referrer.
    pub roots: usize,
    /// Users with a resolved referrer.
    pub referred: usize,
    /// Length of the longest well-formed referrer chain.
    pub max_depth: usize,
    /// Users whose referrer lookup failed.
    pub lookup_failures: usize,
    /// Users whose referrer chain is cyclic.
    pub cyclic_users: usize,
}

impl ReferrerMap {
    /// Compute [`RegistryStats`].
    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats {
            total_registered: self.len(),
            lookup_failures: self.failure_count(),
            ..Default::default()
        };
        for user in self.users() {
            if self.referrer_of(user).is_some() {
                stats.referred += 1;
            }
            let upline = self.upline(user);
            if upline.truncated {
                stats.cyclic_users += 1;
            } else {
                stats.max_depth = stats.max_depth.max(upline.chain.len());
            }
        }
        stats.roots = stats.total_registered - stats.referred - stats.lookup_failures;
        stats
    }
}

#[cfg(test)]
mod tests {
    use crate::ReferrerMap;

    #[test]
    fn stats() {
        let mut builder = ReferrerMap::builder();
        builder
            .insert_referrer("s".into(), None)
            .insert_referrer("a".into(), Some("s".into()))
            .insert_referrer("b".into(), Some("s".into()))
            .insert_referrer("c".into(), Some("a".into()))
            .insert_referrer("x".into(), Some("y".into()))
            .insert_referrer("y".into(), Some("x".into()))
            .insert_failure("f".into(), "unreachable");
        let stats = builder.build().stats();
        assert_eq!(stats.total_registered, 7);
        assert_eq!(stats.referred, 5);
        assert_eq!(stats.roots, 1);
        assert_eq!(stats.lookup_failures, 1);
        assert_eq!(stats.cyclic_users, 2);
        assert_eq!(stats.max_depth, 2);
    }
}
