use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gearcat_core::Currency;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod convert;
mod provider;
mod quote;

#[derive(Debug, Parser)]
#[command(name = "gearcat-cli")]
#[command(about = "Convert scraped gear listings into a priced catalog import")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert a ParseHub export into a catalog import document
    Convert {
        /// ParseHub export JSON file
        #[arg(long, short)]
        input: PathBuf,
        /// Output file; defaults to `shopify_<timestamp>.json`
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Store currency; defaults to `GEARCAT_TARGET_CURRENCY`
        #[arg(long)]
        target: Option<Currency>,
        /// Fixed conversion rate instead of the live rate source
        #[arg(long)]
        rate: Option<Decimal>,
        /// Convert and report without writing the output file
        #[arg(long)]
        dry_run: bool,
    },
    /// Price a single listing and print the breakdown
    Quote {
        /// Listed price as displayed, e.g. "$1,299.00"
        #[arg(long)]
        price: String,
        /// Listed weight
        #[arg(long)]
        weight: Option<String>,
        /// Weight unit label (lb, lbs, kg); defaults to kg
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        target: Option<Currency>,
        #[arg(long)]
        rate: Option<Decimal>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("gearcat-cli: run with --help for available commands");
        return Ok(());
    };

    let config = gearcat_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(
        env = %config.env,
        base = %config.base_currency,
        target = %config.target_currency,
        "gearcat-cli starting"
    );

    match command {
        Commands::Convert {
            input,
            output,
            target,
            rate,
            dry_run,
        } => {
            convert::run_convert(
                &config,
                convert::ConvertArgs {
                    input,
                    output,
                    target,
                    rate,
                    dry_run,
                },
            )
            .await?;
        }
        Commands::Quote {
            price,
            weight,
            unit,
            target,
            rate,
        } => {
            quote::run_quote(
                &config,
                quote::QuoteArgs {
                    price,
                    weight,
                    unit,
                    target,
                    rate,
                },
            )
            .await?;
        }
    }

    Ok(())
}
