use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use ubet_cli::Cli;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::init()?;
    tracing::debug!(?cli, "parsed command line");

    cli.execute().await
}
