use anyhow::Result;
use api_client::CliClient;
use args::{Args, Operation};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod api_client;
mod args;
mod ops;

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let password = args.password()?;
    let client = CliClient::new(&args, &password)?;

    match args.operation {
        Operation::Get => ops::show_efficiency_savings(&client),
        Operation::Post => ops::create_efficiency_policy(&client),
        Operation::Patch => ops::assign_efficiency_policy(&client),
        Operation::Delete => ops::delete_efficiency_policy(&client),
    }
}
