use clap::Parser;
use zncup::cli::DeployArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = DeployArgs::parse();
    zncup::commands::deploy::handle(args).await
}
