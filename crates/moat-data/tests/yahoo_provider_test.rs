//! Integration tests for the Yahoo fundamentals provider against a mock server

use moat_data::{
    DataError, FetchConfig, Frequency, FundamentalsSource, RateLimitConfig, SqliteCache,
    YahooClient, YahooFundamentalsProvider,
};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMESERIES_PATH: &str = "/ws/fundamentals-timeseries/v1/finance/timeseries/MSFT";
const QUOTE_SUMMARY_PATH: &str = "/v10/finance/quoteSummary/MSFT";

fn point(date: &str, raw: f64) -> serde_json::Value {
    serde_json::json!({
        "asOfDate": date,
        "periodType": "12M",
        "currencyCode": "USD",
        "reportedValue": {"raw": raw}
    })
}

fn series(type_name: &str, values: &[(&str, f64)]) -> serde_json::Value {
    let points: Vec<_> = values.iter().map(|(d, v)| point(d, *v)).collect();
    let mut result = serde_json::Map::new();
    result.insert(
        "meta".to_string(),
        serde_json::json!({"symbol": ["MSFT"], "type": [type_name]}),
    );
    result.insert(type_name.to_string(), serde_json::Value::Array(points));
    serde_json::Value::Object(result)
}

/// One body carrying every series; the parser keeps what belongs to each statement.
fn timeseries_body() -> serde_json::Value {
    serde_json::json!({
        "timeseries": {
            "result": [
                series("annualTotalRevenue", &[("2022-06-30", 100.0), ("2023-06-30", 120.0)]),
                series("annualOperatingIncome", &[("2022-06-30", 20.0), ("2023-06-30", 24.0)]),
                series("annualTaxProvision", &[("2022-06-30", 4.0), ("2023-06-30", 4.8)]),
                series("annualDilutedEPS", &[("2022-06-30", 1.0), ("2023-06-30", 1.2)]),
                series("annualInvestedCapital", &[("2022-06-30", 100.0), ("2023-06-30", 110.0)]),
                series("annualCommonStockEquity", &[("2022-06-30", 50.0), ("2023-06-30", 60.0)]),
                series("annualFreeCashFlow", &[("2022-06-30", 10.0), ("2023-06-30", 12.0)]),
            ],
            "error": null
        }
    })
}

fn quote_summary_body() -> serde_json::Value {
    serde_json::json!({
        "quoteSummary": {
            "result": [{
                "defaultKeyStatistics": {"trailingEps": {"raw": 1.3, "fmt": "1.30"}},
                "summaryDetail": {"trailingPE": {"raw": 25.0, "fmt": "25.00"}}
            }],
            "error": null
        }
    })
}

fn client_for(server: &MockServer) -> YahooClient {
    YahooClient::with_rate_limit(RateLimitConfig {
        max_requests: 100,
        window: Duration::from_secs(1),
    })
    .unwrap()
    .with_base_url(server.uri(), format!("{}/cookie", server.uri()))
}

async fn mount_crumb(server: &MockServer, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/cookie"))
        .respond_with(ResponseTemplate::new(404))
        .expect(expected)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/test/getcrumb"))
        .respond_with(ResponseTemplate::new(200).set_body_string("test-crumb"))
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_all_inputs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TIMESERIES_PATH))
        .and(query_param("symbol", "MSFT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(timeseries_body()))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(QUOTE_SUMMARY_PATH))
        .and(query_param("crumb", "test-crumb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_summary_body()))
        .expect(1)
        .mount(&server)
        .await;
    mount_crumb(&server, 1).await;

    let provider = YahooFundamentalsProvider::new(client_for(&server), Frequency::Annual);

    // Lowercase input is normalized
    let income = provider.income_statement("msft").await.unwrap();
    assert_eq!(income.len(), 4);
    assert!(income.contains_row("Operating Income"));
    assert!(!income.contains_row("Free Cash Flow"));

    let balance = provider.balance_sheet("MSFT").await.unwrap();
    assert_eq!(balance.len(), 2);
    assert!(balance.contains_row("Invested Capital"));

    let cash_flow = provider.cash_flow("MSFT").await.unwrap();
    assert_eq!(cash_flow.len(), 1);
    assert_eq!(cash_flow.periods().len(), 2);

    let info = provider.info("MSFT").await.unwrap();
    assert_eq!(info.trailing_eps, Some(1.3));
    assert_eq!(info.trailing_pe, Some(25.0));
}

#[tokio::test]
async fn test_cached_responses_skip_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TIMESERIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(timeseries_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).with_cache(SqliteCache::in_memory().unwrap());
    let provider = YahooFundamentalsProvider::new(client, Frequency::Annual);

    let first = provider.income_statement("MSFT").await.unwrap();
    let second = provider.income_statement("MSFT").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_force_refresh_bypasses_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TIMESERIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(timeseries_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server)
        .with_cache(SqliteCache::in_memory().unwrap())
        .with_fetch_config(FetchConfig {
            force_refresh: true,
            ..FetchConfig::default()
        });
    let provider = YahooFundamentalsProvider::new(client, Frequency::Annual);

    provider.income_statement("MSFT").await.unwrap();
    provider.income_statement("MSFT").await.unwrap();
}

#[tokio::test]
async fn test_crumb_is_reused() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUOTE_SUMMARY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_summary_body()))
        .expect(2)
        .mount(&server)
        .await;
    mount_crumb(&server, 1).await;

    let provider = YahooFundamentalsProvider::new(client_for(&server), Frequency::Annual);
    provider.info("MSFT").await.unwrap();
    provider.info("MSFT").await.unwrap();
}

#[tokio::test]
async fn test_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TIMESERIES_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = YahooFundamentalsProvider::new(client_for(&server), Frequency::Annual);
    let result = provider.income_statement("MSFT").await;
    assert!(matches!(result, Err(DataError::Http(_))));
}

#[tokio::test]
async fn test_empty_symbol() {
    let server = MockServer::start().await;
    let provider = YahooFundamentalsProvider::new(client_for(&server), Frequency::Annual);
    let result = provider.balance_sheet("  ").await;
    assert!(matches!(result, Err(DataError::InvalidSymbol(_))));
}

#[tokio::test]
async fn test_unknown_symbol_has_no_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TIMESERIES_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"timeseries": {"result": [], "error": null}})),
        )
        .mount(&server)
        .await;

    let provider = YahooFundamentalsProvider::new(client_for(&server), Frequency::Annual);
    match provider.cash_flow("MSFT").await {
        Err(DataError::MissingData { symbol, reason }) => {
            assert_eq!(symbol, "MSFT");
            assert!(reason.contains("cash-flow statement"));
        }
        other => panic!("expected MissingData, got {other:?}"),
    }
}
