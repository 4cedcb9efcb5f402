use indexmap::IndexMap;
use ubet_model::Address;

use crate::constants::TOKEN_DECIMALS;

/// A raffle pool tier.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(serde, derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(serde, serde(rename_all = "camelCase"))]
pub struct PoolTier {
    /// Display name.
    pub name: String,
    /// Pool contract.
    pub address: Address,
    /// Entry fee in whole USD.
    pub entry_fee_usd: u64,
}

impl PoolTier {
    /// Create a new tier.
    pub fn new(name: impl ToString, address: impl Into<Address>, entry_fee_usd: u64) -> Self {
        Self {
            name: name.to_string(),
            address: address.into(),
            entry_fee_usd,
        }
    }

    /// Entry fee in the smallest unit of the pool token.
    ///
    /// Returns `None` on overflow.
    pub fn entry_fee_units(&self) -> Option<u128> {
        10u128
            .checked_pow(u32::from(TOKEN_DECIMALS))
            .and_then(|unit| unit.checked_mul(u128::from(self.entry_fee_usd)))
    }
}

/// Pool tiers of the BSC testnet deployment, keyed by pool type.
///
/// Pool types are historical identifiers and do not match the entry fees.
pub fn default_pool_tiers() -> IndexMap<String, PoolTier> {
    [
        ("POOL_1_DOLLAR", "$1 Pool", "0x1BF59e98C2ae24805C6CfB604Aa8C144E587ac6a", 1),
        ("POOL_2_DOLLAR", "$10 Pool", "0xBb21092B01257Ac601909739fE82206C0c3884EC", 10),
        ("POOL_5_DOLLAR", "$100 Pool", "0x4A93D831F24C192F850eacc48084f5c10918fAC3", 100),
        ("POOL_10_DOLLAR", "$1000 Pool", "0x075AC4F96b552466Fde25219F289A3dA28B562a8", 1_000),
        ("POOL_20_DOLLAR", "$10000 Pool", "0x31FCAB5ab1eDad7cFCB7f87803e817935465F4DE", 10_000),
        ("POOL_50_DOLLAR", "$100000 Pool", "0x0EBad2a80B180E254DCEFd492894542775F65F1b", 100_000),
    ]
    .into_iter()
    .map(|(key, name, address, fee)| (key.to_string(), PoolTier::new(name, address, fee)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tiers() {
        let tiers = default_pool_tiers();
        assert_eq!(tiers.len(), 6);
        let first = &tiers["POOL_1_DOLLAR"];
        assert_eq!(first.name, "$1 Pool");
        assert_eq!(tiers["POOL_50_DOLLAR"].entry_fee_usd, 100_000);
        assert_eq!(first.entry_fee_units(), Some(1_000_000_000_000_000_000));
        assert!(tiers
            .values()
            .all(|tier| Address::parse_evm(tier.address.as_str()).is_ok()));
    }
}
