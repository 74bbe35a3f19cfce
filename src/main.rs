use capture_the_ether::{opts::Opts, Ctx};
use clap::Parser;
use eyre::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Opts::parse();
    let target = opts.target.unwrap_or_else(|| opts.challenge.default_target());
    info!(challenge = ?opts.challenge, %target, "solving");

    let ctx = Ctx::connect(&opts).await?;
    opts.challenge.solve(&ctx, target).await
}
