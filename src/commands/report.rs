//! Report command implementation.
//!
//! The report command:
//! 1. Fetches every chain's transactions from its explorer
//! 2. Aggregates heatmaps and report cards
//! 3. Writes the JSON report
//! 4. Optionally prints the text report card

pub use super::models::ReportArgs;

use crate::aggregator::{aggregate, AggregatorConfig};
use crate::explorer::{
    clients_from_env, fetch_all_chains, is_valid_address, normalize_address, ExplorerClient,
    TxListQuery,
};
use crate::output::{render_report_card, report_to_string, write_report};
use crate::parser::{ActivityReport, ChainId};
use crate::utils::config::{MAX_UTC_OFFSET_HOURS, SCHEMA_VERSION};
use crate::wallet::{SessionEvent, Subscription, WalletSession};
use anyhow::{Context, Result};
use chrono::{FixedOffset, SecondsFormat, Utc};
use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Explorer client construction failures
/// * File write errors
///
/// Individual chain outages are not errors: those chains are reported empty.
pub fn execute_report(args: ReportArgs) -> Result<ActivityReport> {
    let start_time = Instant::now();

    info!("Starting report for address: {}", args.address);

    info!("Step 1/3: Fetching transactions from {} explorers...", args.chains.len());
    let clients = clients_from_env(&args.chains).context("Failed to create explorer clients")?;

    let report = build_report(&args.address, &clients, &args.query, &args.aggregator);

    info!("Step 2/3: Aggregated {} transactions", report.report_card.total_txs());
    for (chain, chain_report) in report.report_card.iter() {
        debug!(
            "  {}: {} txs, {} days, {} {} fees",
            chain,
            chain_report.total_txs,
            report.active_days(chain),
            chain_report.fees,
            chain.native_symbol()
        );
    }

    info!("Step 3/3: Writing report...");
    match &args.output_json {
        Some(path) => {
            write_report(&report, path).context("Failed to write report JSON")?;
            info!("✓ Report written to: {}", path.display());
        }
        None => {
            println!("{}", report_to_string(&report)?);
        }
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("ACTIVITY SUMMARY");
        println!("{}", "=".repeat(80));
        println!("{}", render_report_card(&report));
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Report completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

/// Fetch and aggregate one address into a report
///
/// **Public** - shared by the CLI and session watchers
///
/// Chains without a client are reported empty, never as failed.
pub fn build_report(
    address: &str,
    clients: &[ExplorerClient],
    query: &TxListQuery,
    config: &AggregatorConfig,
) -> ActivityReport {
    let address = normalize_address(address);
    let outcome = fetch_all_chains(clients, &address, query);
    let aggregation = aggregate(&outcome.transactions, config);

    ActivityReport {
        version: SCHEMA_VERSION.to_string(),
        address,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        heatmap: aggregation.heatmap,
        report_card: aggregation.report_card,
        failed_chains: outcome.failed_chains,
    }
}

/// Rebuild the report whenever the session's active account changes
///
/// **Public** - each change produces a fresh report that replaces the last
///
/// Events without an active account (wallet locked) are skipped, as are
/// chain switches, which do not change the multi-chain history.
pub fn watch_reports<F>(
    session: &WalletSession,
    clients: Arc<Vec<ExplorerClient>>,
    query: TxListQuery,
    config: AggregatorConfig,
    mut on_report: F,
) -> Subscription
where
    F: FnMut(ActivityReport) + Send + 'static,
{
    session.watch(move |event| {
        if let SessionEvent::AccountsChanged(accounts) = event {
            if let Some(account) = accounts.first() {
                info!("Active account changed to {}, rebuilding report", account);
                on_report(build_report(account, &clients, &query, &config));
            }
        }
    })
}

/// Validate report arguments
///
/// **Public** - can be called before execute_report for early validation
pub fn validate_args(args: &ReportArgs) -> Result<()> {
    if args.address.trim().is_empty() {
        anyhow::bail!("Address cannot be empty");
    }

    if !is_valid_address(&normalize_address(&args.address)) {
        anyhow::bail!("Address must be 20 bytes (40 hex characters, optional 0x prefix)");
    }

    if args.chains.is_empty() {
        anyhow::bail!("At least one chain must be selected");
    }

    if args.query.start_block > args.query.end_block {
        anyhow::bail!(
            "start block {} is after end block {}",
            args.query.start_block,
            args.query.end_block
        );
    }

    if args.query.page_size == 0 {
        anyhow::bail!("page size must be greater than 0");
    }

    for chain in ChainId::ALL {
        if args.aggregator.weight(chain) == 0 {
            anyhow::bail!("heatmap weight for {} must be greater than 0", chain);
        }
    }

    Ok(())
}

/// Parse a `chain=weight` CLI value
pub fn parse_weight_arg(value: &str) -> Result<(ChainId, u32), String> {
    let (chain, weight) = value
        .split_once('=')
        .ok_or_else(|| format!("expected CHAIN=WEIGHT, got '{}'", value))?;

    let chain: ChainId = chain.parse()?;
    let weight: u32 = weight
        .trim()
        .parse()
        .map_err(|_| format!("invalid weight '{}'", weight))?;

    Ok((chain, weight))
}

/// Turn a `--utc-offset` value in hours into a fixed offset
pub fn utc_offset_from_hours(hours: i32) -> Result<FixedOffset> {
    if hours.abs() > MAX_UTC_OFFSET_HOURS {
        anyhow::bail!(
            "UTC offset {}h is out of range (max ±{}h)",
            hours,
            MAX_UTC_OFFSET_HOURS
        );
    }

    FixedOffset::east_opt(hours * 3600)
        .with_context(|| format!("invalid UTC offset {}h", hours))
}
