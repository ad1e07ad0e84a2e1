//! Text report card for terminal output.

use crate::parser::schema::ActivityReport;
use crate::parser::ChainId;

/// Inner widths of the table columns, padding included
const COLUMN_WIDTHS: [usize; 5] = [14, 10, 13, 24, 17];

/// Shorten an address to `width` leading and trailing characters
///
/// Example: `"0xe644be3a05ed983cc18f5c1769fc1a38917ed030"` with width 6
/// becomes `"0xe644...7ed030"`. Short addresses are returned unchanged.
pub fn ellipse_address(address: &str, width: usize) -> String {
    if !address.is_ascii() || address.len() <= width * 2 + 3 {
        return address.to_string();
    }
    format!(
        "{}...{}",
        &address[..width],
        &address[address.len() - width..]
    )
}

fn border(left: char, join: char, right: char) -> String {
    let segments: Vec<String> = COLUMN_WIDTHS.iter().map(|width| "━".repeat(*width)).collect();
    format!("  {}{}{}", left, segments.join(&join.to_string()), right)
}

/// Render the report card as a table
///
/// **Public** - printed by `report --summary`
pub fn render_report_card(report: &ActivityReport) -> String {
    let mut lines = Vec::new();

    lines.push(format!("  REPORT CARD  {}", report.address));
    lines.push(border('┏', '┳', '┓'));
    lines.push(format!(
        "  ┃ {:<12} ┃ {:>8} ┃ {:>11} ┃ {:>22} ┃ {:<15} ┃",
        "Chain", "Txs", "Active days", "Fees", "Best friend"
    ));
    lines.push(border('┣', '╋', '┫'));

    for (chain, chain_report) in report.report_card.iter() {
        let fees = format!("{} {}", chain_report.fees.round(8).normalized(), chain.native_symbol());
        let best_friend = if chain_report.best_friend.is_empty() {
            "-".to_string()
        } else {
            ellipse_address(&chain_report.best_friend, 6)
        };
        let name = if report.failed_chains.contains(&chain) {
            format!("{}*", chain.display_name())
        } else {
            chain.display_name().to_string()
        };

        lines.push(format!(
            "  ┃ {:<12} ┃ {:>8} ┃ {:>11} ┃ {:>22} ┃ {:<15} ┃",
            name,
            chain_report.total_txs,
            report.active_days(chain),
            fees,
            best_friend
        ));
    }

    lines.push(border('┗', '┻', '┛'));

    let fee_totals: Vec<String> = report
        .report_card
        .fees_by_token()
        .into_iter()
        .map(|(symbol, total)| format!("{} {}", total.round(8).normalized(), symbol))
        .collect();

    lines.push(format!(
        "  Total transactions: {}   Total fees: {}",
        report.report_card.total_txs(),
        fee_totals.join(" + ")
    ));

    if !report.failed_chains.is_empty() {
        let failed: Vec<&str> = report.failed_chains.iter().map(ChainId::as_str).collect();
        lines.push(format!(
            "  * explorer unavailable, shown as empty: {}",
            failed.join(", ")
        ));
    }

    lines.join("\n")
}
