use clap::Parser;
use zncup::cli::UndeployArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = UndeployArgs::parse();
    zncup::commands::undeploy::handle(args).await
}
