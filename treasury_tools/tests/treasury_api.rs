use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use treasury_tools::{TreasuryApi, TreasuryApiError, TreasuryConfig};
use wiremock::{
    matchers::{method, path, query_param},
    Mock,
    MockServer,
    ResponseTemplate,
};

fn api_for(server: &MockServer) -> TreasuryApi {
    TreasuryApi::new(TreasuryConfig::new(&format!("{}/v1/accounting/od/rates_of_exchange", server.uri()))).unwrap()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[tokio::test]
async fn fetch_since_sends_the_range_query_and_normalizes_the_batch() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;
    let body = json!({
        "data": [
            { "currency": "Euro", "country": "Euro Zone", "country_currency_desc": "Euro Zone-Euro",
              "exchange_rate": "0.93", "record_date": "2025-06-30" },
            { "currency": "Rupee", "country": "India", "country_currency_desc": "India-Rupee",
              "exchange_rate": "junk", "record_date": "2025-06-30" },
            { "currency": "Yen", "country": "Japan", "country_currency_desc": "Japan-Yen",
              "exchange_rate": "157.5", "record_date": "not-a-date" }
        ]
    });
    Mock::given(method("GET"))
        .and(path("/v1/accounting/od/rates_of_exchange"))
        .and(query_param("filter", "record_date:gte:\"2025-01-01\""))
        .and(query_param("sort", "-record_date"))
        .and(query_param("limit", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let records = api.fetch_rates_since(date("2025-01-01")).await.unwrap();
    // the unparseable-rate record is dropped; the bad date survives as undated
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].currency_code, "EUR");
    assert_eq!(records[0].rate, Decimal::new(93, 2));
    assert_eq!(records[0].effective_date, Some(date("2025-06-30")));
    assert_eq!(records[1].currency_code, "JPY");
    assert_eq!(records[1].effective_date, None);
}

#[tokio::test]
async fn fetch_for_date_sends_an_exact_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/accounting/od/rates_of_exchange"))
        .and(query_param("filter", "record_date:eq:\"2025-03-31\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let records = api.fetch_rates_for_date(date("2025-03-31")).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn non_success_status_is_a_query_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream melted"))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = api.fetch_rates_since(date("2025-01-01")).await.unwrap_err();
    match err {
        TreasuryApiError::QueryError { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "upstream melted");
        },
        other => panic!("Expected QueryError, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_payload_is_a_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not json"))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = api.fetch_rates_since(date("2025-01-01")).await.unwrap_err();
    assert!(matches!(err, TreasuryApiError::JsonError(_)));
}

#[tokio::test]
async fn transport_failure_is_a_response_error() {
    // the discard port has no listener, so the connection is refused
    let api = TreasuryApi::new(TreasuryConfig::new("http://127.0.0.1:9")).unwrap();
    let err = api.fetch_rates_since(date("2025-01-01")).await.unwrap_err();
    assert!(matches!(err, TreasuryApiError::ResponseError(_)));
}
