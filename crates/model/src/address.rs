use std::{borrow::Borrow, fmt, str::FromStr};

use crate::Error;

/// The all-zero EVM address, used by the registry to mean "no referrer".
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

const EVM_ADDRESS_HEX_LEN: usize = 40;

/// A user identifier in canonical (trimmed, lowercase) form.
///
/// Equality is therefore case-insensitive with respect to the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(String);

impl Address {
    /// Create an [`Address`] from any string, normalizing it.
    pub fn new(address: impl AsRef<str>) -> Self {
        Self(address.as_ref().trim().to_lowercase())
    }

    /// Parse a strict EVM address (`0x` followed by 40 hex digits).
    pub fn parse_evm(address: &str) -> crate::Result<Self> {
        let address = Self::new(address);
        let Some(digits) = address.0.strip_prefix("0x") else {
            return Err(Error::InvalidAddress(address.0, "missing `0x` prefix"));
        };
        if digits.len() != EVM_ADDRESS_HEX_LEN {
            return Err(Error::InvalidAddress(address.0, "expected 40 hex digits"));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidAddress(address.0, "non-hex digit"));
        }
        Ok(address)
    }

    /// Create from the raw 20 bytes of an EVM address.
    pub fn from_evm_bytes(bytes: &[u8; 20]) -> Self {
        use fmt::Write;

        let mut s = String::with_capacity(2 + EVM_ADDRESS_HEX_LEN);
        s.push_str("0x");
        for b in bytes {
            // Writing into a `String` cannot fail.
            _ = write!(s, "{b:02x}");
        }
        Self(s)
    }

    /// The zero address.
    pub fn zero() -> Self {
        Self(ZERO_ADDRESS.to_string())
    }

    /// Returns whether this is the "no referrer" identity.
    ///
    /// Only the empty string and [`ZERO_ADDRESS`] count. Short forms such as
    /// `0x00` are ordinary identifiers.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty() || self.0 == ZERO_ADDRESS
    }

    /// Returns `None` if this is the zero identity.
    pub fn non_zero(self) -> Option<Self> {
        (!self.is_zero()).then_some(self)
    }

    /// Get as str.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let address = Self::new(s);
        if address.0.is_empty() {
            return Err(Error::EmptyAddress);
        }
        Ok(address)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Address {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let address: std::borrow::Cow<'de, str> = serde::Deserialize::deserialize(deserializer)?;
        Ok(Self::new(address))
    }
}
