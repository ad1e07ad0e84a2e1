//! Git Eth Transactions CLI
//!
//! Fetches a wallet's history from four block explorers and writes a
//! heatmap dataset and report card.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use git_eth_txs::aggregator::AggregatorConfig;
use git_eth_txs::commands::{
    display_schema, display_version, execute_report, parse_weight_arg, utc_offset_from_hours,
    validate_args, validate_report_file, ReportArgs,
};
use git_eth_txs::explorer::TxListQuery;
use git_eth_txs::parser::ChainId;
use git_eth_txs::utils::config::{DEFAULT_END_BLOCK, DEFAULT_PAGE_SIZE, DEFAULT_START_BLOCK};

/// Git Eth Transactions - wallet activity heatmaps
#[derive(Parser, Debug)]
#[command(name = "git-eth-txs")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a heatmap and report card for a wallet
    Report {
        /// Wallet address
        #[arg(short, long, env = "WALLET_ADDRESS")]
        address: String,

        /// Output path for JSON report
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Print the JSON report to stdout instead of writing a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// Print the text report card
        #[arg(long)]
        summary: bool,

        /// Chains to query (comma separated)
        #[arg(long, value_delimiter = ',', default_value = "ethereum,polygon,arbitrum,optimism")]
        chains: Vec<ChainId>,

        /// First block to include
        #[arg(long, default_value_t = DEFAULT_START_BLOCK)]
        start_block: u64,

        /// Last block to include
        #[arg(long, default_value_t = DEFAULT_END_BLOCK)]
        end_block: u64,

        /// Transactions requested per chain (single page)
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,

        /// Heatmap weight per chain, e.g. ethereum=100 (default 1)
        #[arg(long = "weight", value_parser = parse_weight_arg)]
        weights: Vec<(ChainId, u32)>,

        /// UTC offset in hours used to bucket days
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        utc_offset: i32,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Explorer API keys may live in a local .env file
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Report {
            address,
            output,
            stdout,
            summary,
            chains,
            start_block,
            end_block,
            page_size,
            weights,
            utc_offset,
        } => {
            let mut aggregator =
                AggregatorConfig::new().with_utc_offset(utc_offset_from_hours(utc_offset)?);
            for (chain, weight) in weights {
                aggregator = aggregator.with_weight(chain, weight);
            }

            let args = ReportArgs {
                address,
                chains,
                query: TxListQuery {
                    start_block,
                    end_block,
                    page_size,
                },
                aggregator,
                output_json: if stdout { None } else { Some(output) },
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_report(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
