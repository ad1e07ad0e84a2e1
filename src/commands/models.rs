use crate::aggregator::AggregatorConfig;
use crate::explorer::TxListQuery;
use crate::parser::ChainId;
use std::path::PathBuf;

/// Arguments for the report command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Wallet address to report on
    pub address: String,

    /// Chains to query; the others are reported as empty
    pub chains: Vec<ChainId>,

    /// Block range and page size for explorer requests
    pub query: TxListQuery,

    /// Heatmap weights and bucketing zone
    pub aggregator: AggregatorConfig,

    /// Output path for the JSON report (`None` prints it to stdout)
    pub output_json: Option<PathBuf>,

    /// Print the text report card to stdout
    pub print_summary: bool,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            address: String::new(),
            chains: ChainId::ALL.to_vec(),
            query: TxListQuery::default(),
            aggregator: AggregatorConfig::default(),
            output_json: Some(PathBuf::from("report.json")),
            print_summary: false,
        }
    }
}
