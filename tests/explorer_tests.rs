use git_eth_txs::aggregator::{aggregate, AggregatorConfig};
use git_eth_txs::explorer::{
    fetch_all_chains, is_valid_address, normalize_address, parse_txlist_response, ExplorerClient,
    ExplorerResponse, TxListQuery,
};
use git_eth_txs::parser::ChainId;
use git_eth_txs::utils::error::ExplorerError;
use serde_json::json;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

// Nothing listens on the discard port; connections are refused immediately
const UNREACHABLE: &str = "http://127.0.0.1:9/api";

const ADDRESS: &str = "0xE644be3a05ed983cC18f5c1769fc1A38917ED030";

const TXLIST_OK: &str = r#"{
    "status": "1",
    "message": "OK",
    "result": [
      {"timeStamp": "1640995200", "gasPrice": "1", "gasUsed": "21000", "from": "0xa", "to": "0xb"},
      {"timeStamp": "1641081600", "gasPrice": "1", "gasUsed": "21000", "from": "0xa", "to": "0xc"}
    ]
}"#;

const CLOUDFLARE_PAGE: &str = "<html><body><h1>Checking your browser</h1></body></html>";

/// Serve one canned HTTP response on a loopback port
///
/// Returns the endpoint URL and a receiver for the request head.
fn serve_once(status: &str, content_type: &str, body: &str) -> (String, Receiver<String>) {
    // Loopback traffic must not be routed through a proxy from the environment
    std::env::set_var("NO_PROXY", "127.0.0.1");

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/api", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        content_type,
        body.len(),
        body
    );
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        stream.set_read_timeout(Some(Duration::from_secs(5))).ok();

        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => head.extend_from_slice(&buf[..n]),
            }
        }

        sender.send(String::from_utf8_lossy(&head).into_owned()).ok();
        stream.write_all(response.as_bytes()).ok();
    });

    (url, receiver)
}

#[test]
fn test_normalize_address() {
    assert_eq!(normalize_address("abc123"), "0xabc123");
    assert_eq!(normalize_address("0xDEF456"), "0xdef456");
}

#[test]
fn test_is_valid_address() {
    assert!(is_valid_address(&normalize_address(ADDRESS)));
    assert!(!is_valid_address("0x1234"));
    assert!(!is_valid_address("0xzz44be3a05ed983cc18f5c1769fc1a38917ed030"));
    assert!(!is_valid_address("e644be3a05ed983cc18f5c1769fc1a38917ed030"));
}

#[test]
fn test_query_params() {
    let query = TxListQuery::default();

    let params = query.params("0xabc", Some("KEY"));
    assert!(params.contains(&("action", "txlist".to_string())));
    assert!(params.contains(&("startblock", "0".to_string())));
    assert!(params.contains(&("endblock", "99999999".to_string())));
    assert!(params.contains(&("offset", "10000".to_string())));
    assert!(params.contains(&("sort", "asc".to_string())));
    assert!(params.contains(&("apikey", "KEY".to_string())));

    let params = query.params("0xabc", None);
    assert!(params.iter().all(|(name, _)| *name != "apikey"));
}

#[test]
fn test_parse_successful_txlist() {
    let response: ExplorerResponse = serde_json::from_str(TXLIST_OK).unwrap();

    let txs = parse_txlist_response(response).unwrap();

    assert_eq!(txs.len(), 2);
    assert_eq!(txs[1].to_address(), Some("0xc"));
}

#[test]
fn test_parse_rejects_non_array_success() {
    let response: ExplorerResponse = serde_json::from_value(json!({
        "status": "1",
        "message": "OK",
        "result": "unexpected"
    }))
    .unwrap();

    assert!(matches!(
        parse_txlist_response(response),
        Err(ExplorerError::InvalidResponse(_))
    ));
}

#[test]
fn test_parse_rate_limit_is_api_error() {
    let response: ExplorerResponse = serde_json::from_value(json!({
        "status": "0",
        "message": "NOTOK",
        "result": "Max rate limit reached"
    }))
    .unwrap();

    assert!(matches!(
        parse_txlist_response(response),
        Err(ExplorerError::Api { .. })
    ));
}

#[test]
fn test_client_uses_public_explorer_by_default() {
    let client = ExplorerClient::new(ChainId::Optimism, None).unwrap();
    assert_eq!(client.chain(), ChainId::Optimism);
    assert_eq!(client.base_url(), "https://api-optimistic.etherscan.io/api");
}

#[test]
fn test_fetch_transactions_decodes_txlist() {
    let (url, request) = serve_once("200 OK", "application/json", TXLIST_OK);
    let client =
        ExplorerClient::with_base_url(ChainId::Ethereum, url, Some("KEY".to_string())).unwrap();

    let txs = client
        .fetch_transactions(ADDRESS, &TxListQuery::default())
        .unwrap();

    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].timestamp_secs(), Some(1_640_995_200));
    assert_eq!(txs[1].to_address(), Some("0xc"));

    let head = request.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(head.starts_with("GET /api?"));
    assert!(head.contains("action=txlist"));
    assert!(head.contains(&format!("address={}", normalize_address(ADDRESS))));
    assert!(head.contains("apikey=KEY"));
}

#[test]
fn test_fetch_transactions_rejects_html_body() {
    let (url, _request) = serve_once("200 OK", "text/html", CLOUDFLARE_PAGE);
    let client = ExplorerClient::with_base_url(ChainId::Polygon, url, None).unwrap();

    let result = client.fetch_transactions(ADDRESS, &TxListQuery::default());

    assert!(matches!(result, Err(ExplorerError::RequestFailed(_))));
}

#[test]
fn test_fetch_transactions_rejects_server_error() {
    let (url, _request) = serve_once("502 Bad Gateway", "text/plain", "upstream down");
    let client = ExplorerClient::with_base_url(ChainId::Arbitrum, url, None).unwrap();

    match client.fetch_transactions(ADDRESS, &TxListQuery::default()) {
        Err(ExplorerError::InvalidResponse(message)) => {
            assert!(message.contains("502"));
            assert!(message.contains("upstream down"));
        }
        other => panic!("expected InvalidResponse, got {:?}", other),
    }
}

#[test]
fn test_failed_chains_fall_back_to_empty() {
    let clients = vec![
        ExplorerClient::with_base_url(ChainId::Ethereum, UNREACHABLE, None).unwrap(),
        ExplorerClient::with_base_url(ChainId::Polygon, UNREACHABLE, None).unwrap(),
    ];

    let outcome = fetch_all_chains(&clients, ADDRESS, &TxListQuery::default());

    assert_eq!(outcome.failed_chains, vec![ChainId::Ethereum, ChainId::Polygon]);
    assert!(outcome.transactions.get(ChainId::Ethereum).is_empty());
    assert_eq!(outcome.transactions.account(), Some(normalize_address(ADDRESS).as_str()));

    let result = aggregate(&outcome.transactions, &AggregatorConfig::new());
    assert_eq!(result.report_card.len(), 4);
    assert_eq!(result.report_card.total_txs(), 0);
}

#[test]
fn test_bad_explorer_bodies_only_fail_their_chain() {
    let (html, _) = serve_once("200 OK", "text/html", CLOUDFLARE_PAGE);
    let (bad_gateway, _) = serve_once("502 Bad Gateway", "text/html", CLOUDFLARE_PAGE);
    let (healthy, _) = serve_once("200 OK", "application/json", TXLIST_OK);

    let clients = vec![
        ExplorerClient::with_base_url(ChainId::Ethereum, html, None).unwrap(),
        ExplorerClient::with_base_url(ChainId::Polygon, bad_gateway, None).unwrap(),
        ExplorerClient::with_base_url(ChainId::Arbitrum, healthy, None).unwrap(),
    ];

    let outcome = fetch_all_chains(&clients, ADDRESS, &TxListQuery::default());

    assert_eq!(outcome.failed_chains, vec![ChainId::Ethereum, ChainId::Polygon]);
    assert!(outcome.transactions.get(ChainId::Ethereum).is_empty());
    assert!(outcome.transactions.get(ChainId::Polygon).is_empty());
    assert_eq!(outcome.transactions.get(ChainId::Arbitrum).len(), 2);

    let result = aggregate(&outcome.transactions, &AggregatorConfig::new());
    assert_eq!(result.report_card.get(ChainId::Arbitrum).total_txs, 2);
    assert_eq!(result.heatmap[&ChainId::Arbitrum].len(), 2);
    assert_eq!(result.report_card.total_txs(), 2);
}
