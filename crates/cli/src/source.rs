use std::path::Path;

use eyre::OptionExt;
use ubet_sdk::{
    model::Address, source::memory::EdgeFile, MemorySource, ReferralSource, RpcReferralSource,
};

use crate::config::Config;

/// The referral source selected by the config.
#[derive(Debug)]
pub enum AnySource {
    /// The on-chain registry.
    Rpc(RpcReferralSource),
    /// An edge file.
    Memory(MemorySource),
}

impl AnySource {
    /// Create from config.
    pub async fn new(config: &Config) -> eyre::Result<Self> {
        match config.edges()? {
            Some(path) => {
                let source = Self::Memory(load_edges(path).await?);
                tracing::debug!("using edge file");
                Ok(source)
            }
            None => {
                let url = config.rpc_url()?;
                tracing::debug!(%url, "using JSON-RPC endpoint");
                let source = RpcReferralSource::try_new(url, config.registry()?)?;
                Ok(Self::Rpc(source))
            }
        }
    }

    /// Returns the JSON-RPC source, if selected.
    pub fn as_rpc(&self) -> Option<&RpcReferralSource> {
        match self {
            Self::Rpc(source) => Some(source),
            Self::Memory(_) => None,
        }
    }

    /// Check that the endpoint serves the expected chain.
    pub async fn check_chain_id(&self, expected: u64) -> eyre::Result<()> {
        if let Some(rpc) = self.as_rpc() {
            let chain_id = rpc.chain_id().await?;
            if chain_id != expected {
                eyre::bail!("chain ID mismatch: expected {expected}, endpoint serves {chain_id}");
            }
        }
        Ok(())
    }
}

impl ReferralSource for AnySource {
    async fn list_all_registered_users(&self) -> ubet_sdk::Result<Vec<Address>> {
        match self {
            Self::Rpc(source) => source.list_all_registered_users().await,
            Self::Memory(source) => source.list_all_registered_users().await,
        }
    }

    async fn get_referrer_of(&self, user: &Address) -> ubet_sdk::Result<Option<Address>> {
        match self {
            Self::Rpc(source) => source.get_referrer_of(user).await,
            Self::Memory(source) => source.get_referrer_of(user).await,
        }
    }
}

/// Load an edge file, JSON or TOML by extension.
pub async fn load_edges(path: impl AsRef<Path>) -> eyre::Result<MemorySource> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_eyre("edge file must have a `.json` or `.toml` extension")?;
    let file: EdgeFile = match extension {
        "json" => serde_json::from_str(&content)?,
        "toml" => toml::from_str(&content)?,
        other => eyre::bail!("unsupported edge file extension: `{other}`"),
    };
    tracing::debug!(users = file.users.len(), path = %path.display(), "loaded edge file");
    Ok(file.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, content: &str) -> eyre::Result<std::path::PathBuf> {
        let dir = std::env::temp_dir().join(format!("ubet-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    #[tokio::test]
    async fn load_toml_edges() -> eyre::Result<()> {
        let path = temp_file(
            "edges.toml",
            r#"
            [[users]]
            address = "0xS"

            [[users]]
            address = "0xA"
            referrer = "0xS"

            [[users]]
            address = "0xB"
            lookupError = "reverted"
            "#,
        )?;
        let source = load_edges(&path).await?;
        assert_eq!(source.len(), 3);
        assert_eq!(
            source.get_referrer_of(&"0xa".into()).await?,
            Some(Address::new("0xs"))
        );
        assert!(source.get_referrer_of(&"0xb".into()).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn reject_unknown_extension() -> eyre::Result<()> {
        let path = temp_file("edges.yaml", "users: []")?;
        assert!(load_edges(&path).await.is_err());
        Ok(())
    }
}
