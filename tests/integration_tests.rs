//! End-to-end tests: mocked providers behind the live HTTP server

use std::net::SocketAddr;
use std::process::Command;

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trip_planner::itinerary::{FlightSection, NO_FLIGHTS_NOTE};
use trip_planner::{TripPlannerConfig, TripPreferences, web};

fn provider_flight(flight_number: &str, price: f64) -> Value {
    json!({
        "flights": [{
            "departure_airport": {
                "name": "Rajiv Gandhi International Airport",
                "id": "HYD",
                "time": "2024-06-01 06:10"
            },
            "arrival_airport": {
                "name": "Visakhapatnam Airport",
                "id": "VTZ",
                "time": "2024-06-01 07:25"
            },
            "duration": 75,
            "airplane": "Airbus A320neo",
            "airline": "IndiGo",
            "travel_class": "Economy",
            "flight_number": flight_number,
            "legroom": "29 in"
        }],
        "total_duration": 75,
        "carbon_emissions": { "this_flight": 61000 },
        "price": price,
        "booking_token": format!("token-{flight_number}")
    })
}

async fn mount_generator(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "# Day 1\nBeach walk at RK Beach." }] }
            }]
        })))
        .mount(server)
        .await;
}

/// Bind an ephemeral port, point the composer's proxy client at it and serve the app
async fn spawn_app(provider: &MockServer, generator: &MockServer) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = TripPlannerConfig::default();
    config.flights.api_key = Some("serpapi_test_key".to_string());
    config.flights.base_url = provider.uri();
    config.flights.proxy_url = Some(format!("http://{addr}"));
    config.generator.api_key = Some("gemini_test_key".to_string());
    config.generator.base_url = generator.uri();
    config.apply_defaults();

    let app = web::app(web::build_state(&config).unwrap(), &config);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn preferences() -> TripPreferences {
    let mut prefs = TripPreferences::from_defaults(
        &trip_planner::TripDefaults::default(),
        "2024-06-01",
        "2024-06-05",
    );
    prefs.include_transportation = true;
    prefs
}

#[tokio::test]
async fn test_itinerary_with_live_flights() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("departure_id", "HYD"))
        .and(query_param("arrival_id", "VTZ"))
        .and(query_param("outbound_date", "2024-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "best_flights": [provider_flight("6E 6553", 4521.0), provider_flight("AI 544", 5230.0)]
        })))
        .expect(1)
        .mount(&provider)
        .await;
    let generator = MockServer::start().await;
    mount_generator(&generator).await;

    let addr = spawn_app(&provider, &generator).await;
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/api/itinerary"))
        .json(&preferences())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["flights_status"], "available");
    assert_eq!(body["flight_blocks"].as_array().unwrap().len(), 2);

    let itinerary = trip_planner::itinerary::parse(body["itinerary"].as_str().unwrap());
    assert!(itinerary.main_content.starts_with("# Day 1"));
    let blocks = itinerary.flight_blocks();
    assert!(blocks[0].contains("**Airline**: IndiGo"));
    assert!(blocks[1].contains("**Price**: $5230"));

    let rendered = itinerary.to_string();
    assert!(rendered.contains("Available Flights"));
    assert!(rendered.contains("6E 6553"));
}

#[tokio::test]
async fn test_empty_route_is_not_found_and_noted_in_itinerary() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "best_flights": [] })))
        .mount(&provider)
        .await;
    let generator = MockServer::start().await;
    mount_generator(&generator).await;

    let addr = spawn_app(&provider, &generator).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/api/flights"))
        .json(&json!({ "source": "HYD", "destination": "VTZ", "date": "2024-06-01" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No flights found");

    let resp = client
        .post(format!("http://{addr}/api/itinerary"))
        .json(&preferences())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["flights_status"], "unavailable");

    let itinerary = trip_planner::itinerary::parse(body["itinerary"].as_str().unwrap());
    assert!(itinerary.has_no_flights());
    assert!(matches!(
        &itinerary.flights,
        FlightSection::NoFlights { note } if note.contains(NO_FLIGHTS_NOTE)
    ));
}

#[tokio::test]
async fn test_missing_source_never_reaches_provider() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "best_flights": [] })))
        .expect(0)
        .mount(&provider)
        .await;
    let generator = MockServer::start().await;

    let addr = spawn_app(&provider, &generator).await;
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/api/flights"))
        .json(&json!({ "destination": "VTZ", "date": "2024-06-01" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Missing required fields");
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_trip-planner"))
        .arg("--help")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("plan"));
}
