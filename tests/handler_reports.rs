mod common;

use axum_test::TestServer;
use gsc_gateway::routes::router;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_url_metrics_passthrough() {
    let connector = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metrics/url"))
        .and(query_param("url", "https://example.com/blog"))
        .and(query_param("start", "2024-01-01"))
        .and(query_param("end", "2024-01-02"))
        .and(query_param("device", "mobile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "url": "https://example.com/blog",
                "site_url": "https://example.com/",
                "period": {"start": "2024-01-01", "end": "2024-01-02"},
                "filters": {"device": "mobile"},
                "timeseries": [
                    {"date": "2024-01-01", "clicks": 3, "impressions": 30, "ctr": 0.1, "avg_position": 4.0},
                    {"date": "2024-01-02", "clicks": 1, "impressions": 20, "ctr": 0.05, "avg_position": 6.0}
                ],
                "totals": {"clicks": 4, "impressions": 50, "ctr": 0.08, "avg_position": 4.8},
                "meta": {"days_with_data": 2}
            }
        })))
        .mount(&connector)
        .await;

    let server = common::create_test_server(&connector);
    let response = server
        .post("/gsc/metrics/url")
        .json(&json!({
            "url": "https://example.com/blog",
            "start_date": "2024-01-01",
            "end_date": "2024-01-02",
            "device": "mobile"
        }))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["totals"]["clicks"], 4);
    assert_eq!(json["timeseries"].as_array().unwrap().len(), 2);
    assert_eq!(json["timeseries"][0]["date"], "2024-01-01");
    assert_eq!(json["meta"]["days_with_data"], 2);
}

#[tokio::test]
async fn test_url_metrics_validation() {
    let connector = MockServer::start().await;
    let server = common::create_test_server(&connector);

    let response = server
        .post("/gsc/metrics/url")
        .json(&json!({
            "url": "https://example.com/blog",
            "start_date": "2024-01-01",
            "end_date": "2024-01-31",
            "country": "FRANCE"
        }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(json["error"]["details"].get("country").is_some());
}

#[tokio::test]
async fn test_export_top_pages_json() {
    let connector = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metrics/urls"))
        .and(query_param("siteUrl", "https://example.com/"))
        .and(query_param("limit", "3"))
        .and(query_param("orderBy", "clicks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::url_list_body(
            vec![
                common::page("https://example.com/b", 10, 100, 3.0),
                common::page("https://example.com/c", 20, 400, 2.0),
                common::page("https://example.com/a", 10, 50, 1.5),
            ],
            0,
            3,
            false,
        )))
        .mount(&connector)
        .await;

    let server = common::create_test_server(&connector);
    let response = server
        .get("/gsc/export/top-pages/example.com")
        .add_query_param("limit", "3")
        .add_query_param("days", "7")
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["site_url"], "https://example.com/");
    assert_eq!(json["period"]["days"], 7);

    let urls: Vec<&str> = json["pages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["url"].as_str().unwrap())
        .collect();
    assert_eq!(
        urls,
        vec![
            "https://example.com/c",
            "https://example.com/a",
            "https://example.com/b"
        ]
    );
}

#[tokio::test]
async fn test_export_top_pages_csv() {
    let connector = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metrics/urls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::url_list_body(
            vec![common::page("https://example.com/a,b", 5, 0, 0.0)],
            0,
            1,
            false,
        )))
        .mount(&connector)
        .await;

    let server = common::create_test_server(&connector);
    let response = server
        .get("/gsc/export/top-pages/example.com")
        .add_query_param("format", "csv")
        .await;

    response.assert_status_ok();
    let csv = response.json::<Value>()["csv_data"]
        .as_str()
        .unwrap()
        .to_string();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("url,clicks,impressions,ctr,avg_position"));
    assert!(lines.next().unwrap().starts_with("\"https://example.com/a,b\",5,0,"));
}

#[tokio::test]
async fn test_export_rejects_out_of_range_params() {
    let connector = MockServer::start().await;
    let server = common::create_test_server(&connector);

    let response = server
        .get("/gsc/export/top-pages/example.com")
        .add_query_param("days", "0")
        .await;
    response.assert_status_bad_request();

    let response = server
        .get("/gsc/export/top-pages/example.com")
        .add_query_param("limit", "5000")
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_export_unparsable_params_are_json_errors() {
    let connector = MockServer::start().await;
    let server = common::create_test_server(&connector);

    for (name, value) in [("format", "xml"), ("days", "abc"), ("order_by", "bounces")] {
        let response = server
            .get("/gsc/export/top-pages/example.com")
            .add_query_param(name, value)
            .await;

        response.assert_status_bad_request();
        let json = response.json::<Value>();
        assert_eq!(json["error"]["code"], "validation_error", "{name}={value}");
        assert_eq!(json["error"]["message"], "Invalid query parameters");
    }
}

#[tokio::test]
async fn test_dashboard_walks_pagination_up_to_cap() {
    let connector = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metrics/urls"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::url_list_body(
            vec![
                common::page("https://example.com/a", 6, 100, 2.0),
                common::page("https://example.com/b", 2, 50, 4.0),
            ],
            0,
            10,
            true,
        )))
        .expect(1)
        .mount(&connector)
        .await;
    Mock::given(method("GET"))
        .and(path("/metrics/urls"))
        .and(query_param("offset", "2"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::url_list_body(
            vec![common::page("https://example.com/c", 0, 0, 0.0)],
            2,
            10,
            true,
        )))
        .expect(1)
        .mount(&connector)
        .await;

    let state = common::create_test_state_with_cap(&connector, 3);
    let server = TestServer::new(router(state)).unwrap();

    let response = server
        .get("/gsc/dashboard/example.com")
        .add_query_param("days", "14")
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["site_url"], "https://example.com/");
    assert_eq!(json["period"]["days"], 14);
    assert_eq!(json["totals"]["clicks"], 8);
    assert_eq!(json["totals"]["impressions"], 150);
    assert_eq!(json["totals"]["pages_analyzed"], 3);
    assert_eq!(json["top_pages"][0]["url"], "https://example.com/a");
    assert_eq!(json["all_pages"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_dashboard_rejects_bad_site() {
    let connector = MockServer::start().await;
    let server = common::create_test_server(&connector);

    let response = server.get("/gsc/dashboard/exa%20mple.com").await;
    response.assert_status_bad_request();
}
