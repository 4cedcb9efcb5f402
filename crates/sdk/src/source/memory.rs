use std::collections::HashMap;

use ubet_model::Address;

use super::ReferralSource;

type Lookup = Result<Option<Address>, String>;

/// A [`ReferralSource`] backed by a static edge list.
///
/// Failures can be injected to exercise the degraded paths.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    users: Vec<Address>,
    lookups: HashMap<Address, Lookup>,
    listing_error: Option<String>,
}

impl MemorySource {
    /// Create from `(user, referrer)` edges.
    pub fn from_edges<A: Into<Address>>(edges: impl IntoIterator<Item = (A, Option<A>)>) -> Self {
        let mut source = Self::default();
        for (user, referrer) in edges {
            source.insert(user.into(), referrer.map(Into::into));
        }
        source
    }

    /// Register a user with the given referrer.
    pub fn insert(&mut self, user: Address, referrer: Option<Address>) -> &mut Self {
        self.push_user(&user);
        self.lookups.insert(user, Ok(referrer));
        self
    }

    /// Register a user whose referrer lookup fails.
    pub fn insert_lookup_error(&mut self, user: Address, message: impl ToString) -> &mut Self {
        self.push_user(&user);
        self.lookups.insert(user, Err(message.to_string()));
        self
    }

    /// Make the listing call fail.
    pub fn set_listing_error(&mut self, message: Option<String>) -> &mut Self {
        self.listing_error = message;
        self
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns whether no user is registered.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn push_user(&mut self, user: &Address) {
        if !self.lookups.contains_key(user) {
            self.users.push(user.clone());
        }
    }
}

impl ReferralSource for MemorySource {
    async fn list_all_registered_users(&self) -> crate::Result<Vec<Address>> {
        match self.listing_error.as_ref() {
            Some(msg) => Err(crate::Error::SourceUnavailable(msg.clone())),
            None => Ok(self.users.clone()),
        }
    }

    async fn get_referrer_of(&self, user: &Address) -> crate::Result<Option<Address>> {
        match self.lookups.get(user) {
            Some(Ok(referrer)) => Ok(referrer.clone()),
            Some(Err(msg)) => Err(crate::Error::lookup_failed(user, msg)),
            None => Ok(None),
        }
    }
}

/// Edge file format for [`MemorySource`].
///
/// ```json
/// { "users": [ { "address": "0xa", "referrer": "0xb" }, { "address": "0xb" } ] }
/// ```
#[cfg(serde)]
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeFile {
    /// Registered users.
    #[serde(default)]
    pub users: Vec<EdgeRecord>,
    /// Simulate an unreachable registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_error: Option<String>,
}

/// A single user in an [`EdgeFile`].
#[cfg(serde)]
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    /// The user.
    pub address: Address,
    /// The direct referrer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<Address>,
    /// Simulate a failed lookup for this user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup_error: Option<String>,
}

#[cfg(serde)]
impl From<EdgeFile> for MemorySource {
    fn from(file: EdgeFile) -> Self {
        let mut source = Self::default();
        for record in file.users {
            match record.lookup_error {
                Some(msg) => source.insert_lookup_error(record.address, msg),
                None => source.insert(record.address, record.referrer),
            };
        }
        source.set_listing_error(file.listing_error);
        source
    }
}
