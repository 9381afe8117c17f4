//! Acctbook main entry point

use acctbook_api::start_server;
use acctbook_config::Config;
use clap::Parser;
use std::path::PathBuf;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "acctbook")]
#[command(author = "Acctbook Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A small accounting web application for managing billable items", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = match Config::load(args.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.to_details());
            return Err(e.into());
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!(
        "Config loaded from {}: store backend={}, page size={}",
        args.config.display(),
        config.store.backend,
        config.pagination.page_size
    );

    let store = acctbook_store::connect(&config.store)?;

    let rt = Runtime::new()?;
    rt.block_on(start_server(config, store))?;

    Ok(())
}
