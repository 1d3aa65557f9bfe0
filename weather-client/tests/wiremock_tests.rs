//! Integration tests for the HTTP API client using wiremock
//!
//! These run `HttpApi` and the view-controller against a mock backend.

use weather_client::{
    ApiError, ClientConfig, HtmlPage, HttpApi, NewRecord, Query, Region, RecordUpdate,
    ViewController, WeatherApi,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path, query_param},
};

fn sample_weather_response() -> serde_json::Value {
    serde_json::json!({
        "location": "Berlin, Land Berlin, Germany",
        "latitude": 52.52,
        "longitude": 13.405,
        "current": {
            "temperature_2m": 5.5,
            "windspeed_10m": 12.5,
            "relative_humidity_2m": 75,
            "weather_code": "cloudy",
            "time": "2024-01-15T12:00:00Z"
        },
        "daily": {
            "time": ["2024-01-15", "2024-01-16", "2024-01-17", "2024-01-18", "2024-01-19", "2024-01-20", "2024-01-21"],
            "temperature_2m_max": [8.0, 6.0, 10.0, 9.0, 7.0, 6.5, 5.0],
            "temperature_2m_min": [2.0, 1.0, 3.0, 2.5, 0.5, -1.0, -2.0],
            "wind_speed_10m_max": [15.0, 20.0, 12.0, 11.0, 9.0, 8.0, 7.0],
            "weather_code": ["cloudy", "rain", "fair_day", null, "cloudy", "snow", "snow"]
        }
    })
}

/// Create a test client configured to use the mock server
fn create_test_client(mock_server: &MockServer) -> HttpApi {
    let config =
        ClientConfig { base_url: mock_server.uri(), timeout_secs: 5, ..Default::default() };
    HttpApi::new(&config).expect("Failed to create client")
}

// ============================================================================
// Weather lookups
// ============================================================================

#[tokio::test]
async fn test_weather_by_place_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .and(query_param("q", "New York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_weather_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let query = Query::parse("New York").unwrap();
    let result = client.weather(&query).await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
    let weather = result.unwrap();
    assert_eq!(weather.location.as_deref(), Some("Berlin, Land Berlin, Germany"));
    assert_eq!(weather.current.as_ref().and_then(|c| c.humidity), Some(75.0));
    assert_eq!(weather.daily.as_ref().map(|d| d.len()), Some(7));
}

#[tokio::test]
async fn test_weather_by_coordinates_keeps_typed_digits() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .and(query_param("lat", "40.70"))
        .and(query_param("lon", "-74.00"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_weather_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let query = Query::parse(" 40.70 , -74.00 ").unwrap();
    assert!(client.weather(&query).await.is_ok());
}

#[tokio::test]
async fn test_non_2xx_carries_raw_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .respond_with(ResponseTemplate::new(400).set_body_string("missing q or lat/lon"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.weather(&Query::Place("x".into())).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "missing q or lat/lon");
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/searches"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.searches().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let config = ClientConfig {
        base_url: "http://127.0.0.1:1".into(),
        timeout_secs: 2,
        ..Default::default()
    };
    let client = HttpApi::new(&config).unwrap();

    let err = client.records().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
}

// ============================================================================
// Lists and records
// ============================================================================

#[tokio::test]
async fn test_searches_sends_configured_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/searches"))
        .and(query_param("limit", "40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 2, "query": "Oslo, Norway", "searched_at": "2024-01-15T12:00:00Z",
             "latitude": 59.91, "longitude": 10.75, "temperature": -3.2, "weather_code": "snow"},
            {"id": 1, "query": "Paris", "searched_at": "2024-01-14T08:30:00.123Z",
             "latitude": 48.85, "longitude": 2.35, "temperature": null, "weather_code": 3}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig {
        base_url: mock_server.uri(),
        search_limit: Some(40),
        ..Default::default()
    };
    let client = HttpApi::new(&config).unwrap();

    let list = client.searches().await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].query, "Oslo, Norway");
    assert_eq!(list[1].temperature, None);
}

#[tokio::test]
async fn test_create_record_posts_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/records"))
        .and(body_json(serde_json::json!({
            "location": "Oslo",
            "start_date": "2024-01-01",
            "end_date": "2024-01-03"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 12,
            "location": "Oslo",
            "start_date": "2024-01-01",
            "end_date": "2024-01-03",
            "data": {"daily": {}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let created = client
        .create_record(&NewRecord {
            location: "Oslo".into(),
            start_date: "2024-01-01".into(),
            end_date: "2024-01-03".into(),
        })
        .await
        .unwrap();

    assert_eq!(created.id, 12);
    assert_eq!(created.location.as_deref(), Some("Oslo"));
}

#[tokio::test]
async fn test_update_record_puts_only_given_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/records/12"))
        .and(body_json(serde_json::json!({"end_date": "2024-01-05"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 12, "location": "Oslo", "data": {}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let update = RecordUpdate { end_date: Some("2024-01-05".into()), ..Default::default() };
    let updated = client.update_record(12, &update).await.unwrap();
    assert_eq!(updated.id, 12);
}

#[tokio::test]
async fn test_record_detail_and_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 7,
            "location_input": "bergen",
            "resolved_name": "Bergen",
            "start_date": "2024-01-01",
            "end_date": "2024-01-02",
            "weather_json": {"daily": {"time": ["2024-01-01", "2024-01-02"], "temperature_2m_max": [4.0, 5.0]}},
            "daily_list": [],
            "updated_at": "2024-01-01T10:00:00Z"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/records/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "deleted"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/searches/8"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"error": "not found"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let detail = client.record(7).await.unwrap();
    assert_eq!(detail.display_name(), "Bergen");
    assert_eq!(detail.daily().map(|d| d.len()), Some(2));

    assert!(client.delete_record(7).await.is_ok());

    let err = client.delete_search(8).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), r#"{"error":"not found"}"#);
}

// ============================================================================
// Controller end to end
// ============================================================================

#[tokio::test]
async fn test_controller_search_round_trip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .and(query_param("q", "Berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_weather_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/searches"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "query": "Berlin, Land Berlin, Germany", "searched_at": "2024-01-15T12:00:00Z"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let controller = ViewController::new(create_test_client(&mock_server), HtmlPage::new());
    controller.search("Berlin").await;

    let page = controller.surface();
    assert_eq!(page.region(Region::Place).as_deref(), Some("Berlin, Land Berlin, Germany"));
    assert!(page.region(Region::Current).unwrap().contains(">5.5°C<"));
    assert_eq!(page.region(Region::Forecast).unwrap().matches("p-2 rounded").count(), 5);
    assert!(page.region(Region::Searches).unwrap().contains("href='/searches/1/'"));
}

#[tokio::test]
async fn test_controller_search_failure_shows_server_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Location not found"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/searches"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let controller = ViewController::new(create_test_client(&mock_server), HtmlPage::new());
    controller.search("Atlantis").await;

    let page = controller.surface();
    assert!(page.region(Region::Current).unwrap().contains(">Location not found<"));
    assert_eq!(page.region(Region::Forecast).as_deref(), Some(""));
    assert_eq!(page.region(Region::Searches), None);
}
