mod output;

use std::time::Duration;

use indexmap::IndexMap;
use serde_with::{serde_as, DisplayFromStr};
use ubet_sdk::{
    constants::{CHAIN_ID, DEFAULT_RPC_URL, REFERRAL_REGISTRY_ADDRESS},
    fetch::DEFAULT_CONCURRENCY,
    model::Address,
    pool::{default_pool_tiers, PoolTier},
    FetchOptions,
};
use url::Url;

pub use output::{Columns, OutputFormat};

/// Configuration.
///
/// Unset fields fall back to the config file, then to the built-in defaults.
#[serde_as]
#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone, Default)]
pub struct Config {
    /// JSON-RPC endpoint.
    #[arg(long = "url", short = 'u')]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rpc_url: Option<Url>,
    /// Referral registry contract.
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    registry: Option<Address>,
    /// Expected chain ID of the endpoint.
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chain_id: Option<u64>,
    /// Maximum number of in-flight referrer lookups.
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    concurrency: Option<usize>,
    /// Deadline for fetching the registry, e.g. `30s`.
    #[arg(long)]
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout: Option<humantime::Duration>,
    /// Read referral edges from this file instead of the registry.
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edges: Option<String>,
    /// Output format.
    #[arg(long, short)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output: Option<OutputFormat>,
    /// Pool tiers.
    #[arg(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pools: Option<IndexMap<String, PoolTier>>,
}

impl Config {
    /// The config written by `init-config`.
    pub fn init() -> eyre::Result<Self> {
        Ok(Self {
            rpc_url: Some(DEFAULT_RPC_URL.parse()?),
            registry: Some(REFERRAL_REGISTRY_ADDRESS.parse()?),
            chain_id: Some(CHAIN_ID),
            concurrency: Some(DEFAULT_CONCURRENCY),
            timeout: Some(Duration::from_secs(60).into()),
            edges: None,
            output: Some(OutputFormat::default()),
            pools: Some(default_pool_tiers()),
        })
    }

    /// Returns the JSON-RPC endpoint.
    pub fn rpc_url(&self) -> eyre::Result<Url> {
        match self.rpc_url.as_ref() {
            Some(url) => Ok(url.clone()),
            None => Ok(DEFAULT_RPC_URL.parse()?),
        }
    }

    /// Returns the referral registry contract.
    pub fn registry(&self) -> eyre::Result<Address> {
        match self.registry.as_ref() {
            Some(registry) => Ok(registry.clone()),
            None => Ok(REFERRAL_REGISTRY_ADDRESS.parse()?),
        }
    }

    /// Returns the expected chain ID.
    pub fn chain_id(&self) -> u64 {
        self.chain_id.unwrap_or(CHAIN_ID)
    }

    /// Returns the options for fetching the registry.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            concurrency: self.concurrency.unwrap_or(DEFAULT_CONCURRENCY),
            timeout: self.timeout.map(Into::into),
        }
    }

    /// Returns the path to the edge file, if any.
    pub fn edges(&self) -> eyre::Result<Option<String>> {
        self.edges
            .as_ref()
            .map(|path| -> eyre::Result<String> { Ok(shellexpand::full(path)?.into_owned()) })
            .transpose()
    }

    /// Returns the output format.
    pub fn output(&self) -> OutputFormat {
        self.output.unwrap_or_default()
    }

    /// Returns the pool tiers.
    pub fn pools(&self) -> IndexMap<String, PoolTier> {
        self.pools.clone().unwrap_or_else(default_pool_tiers)
    }
}
