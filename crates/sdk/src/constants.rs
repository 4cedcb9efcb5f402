/// Address of the referral registry contract.
pub const REFERRAL_REGISTRY_ADDRESS: &str = "0x6EDbcb1df05E09cceB74cb4239b3856B33a292aF";

/// Address of the USDT token used for pool entry fees.
pub const USDT_TOKEN_ADDRESS: &str = "0x4aE58BfC16b20bD67755FFD5560e85779D962415";

/// Chain ID of the network the contracts are deployed on (BSC testnet).
pub const CHAIN_ID: u64 = 97;

/// Default JSON-RPC endpoint for [`CHAIN_ID`].
pub const DEFAULT_RPC_URL: &str = "https://data-seed-prebsc-1-s1.binance.org:8545";

/// Decimals of the pool token.
pub const TOKEN_DECIMALS: u8 = 18;
