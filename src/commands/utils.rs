use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    if report.version != SCHEMA_VERSION {
        anyhow::bail!(
            "Unsupported schema version {} (expected {})",
            report.version,
            SCHEMA_VERSION
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Address: {}", report.address);
    println!("  Generated: {}", report.generated_at);
    println!("  Transactions: {}", report.report_card.total_txs());
    for (chain, chain_report) in report.report_card.iter() {
        println!(
            "    {:<10} {:>6} txs  {:>4} days",
            chain.as_str(),
            chain_report.total_txs,
            report.active_days(chain)
        );
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Git Eth Transactions Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  address: string          - Wallet address (lowercase)");
        println!("  generatedAt: string      - ISO 8601 timestamp");
        println!("  heatmap: object          - Per-chain active days");
        println!("    <chain>: array");
        println!("      date: string         - 'YYYY-M-D', zero-indexed month");
        println!("      count: number        - Heatmap weight");
        println!("  reportCard: object       - One entry per chain");
        println!("    <chain>: object");
        println!("      totalTxs: number     - Transactions fetched");
        println!("      fees: string         - Fees in native token (decimal)");
        println!("      bestFriend: string   - Most frequent counterparty");
        println!("  failedChains: array?    - Chains reported empty after a fetch error");
        println!();
        println!("Chains: ethereum, polygon, arbitrum, optimism");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Git Eth Transactions v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Git-style activity heatmaps for Ethereum, Polygon, Arbitrum and Optimism wallets.");
}
