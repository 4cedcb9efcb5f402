use tokio::{fs, io::AsyncWriteExt};

use crate::config::Config;

/// Initialize config.
#[derive(Debug, clap::Args)]
pub struct InitConfig {
    /// Replace if the config file already exists.
    #[arg(long, short)]
    force: bool,
}

impl super::Command for InitConfig {
    fn is_source_required(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: super::Context<'_>) -> eyre::Result<()> {
        let config_path = ctx.config_path();
        if fs::try_exists(config_path).await? && !self.force {
            eyre::bail!("Config file already exists. Use `--force` to overwrite it.");
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = toml::to_string_pretty(&Config::init()?)?;
        let mut file = fs::File::create(config_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;

        tracing::info!(path = %config_path.display(), "config written");
        println!("{}", config_path.display());
        Ok(())
    }
}
