//! HTTP API: the flight endpoint and itinerary composition

use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::flights::{FlightQuery, FlightSearch, MAX_FLIGHT_OPTIONS};
use crate::itinerary::ItineraryComposer;
use crate::models::{FlightOption, TripPreferences, preferences::parse_date};
use crate::TravelPlannerError;

const MISSING_FIELDS: &str = "Missing required fields";
const INVALID_DATE: &str = "Invalid date format";

/// Shared handler state; every field is read-only
#[derive(Clone)]
pub struct AppState {
    pub flights: Arc<dyn FlightSearch>,
    pub composer: Arc<ItineraryComposer>,
}

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    /// Flight endpoint mapping: 404 for an empty route, 500 for everything else
    fn from_flight_error(err: &TravelPlannerError) -> Self {
        let status = match err {
            TravelPlannerError::Validation { .. } => StatusCode::BAD_REQUEST,
            TravelPlannerError::NoFlightsFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.user_message(),
        }
    }

    fn from_itinerary_error(err: &TravelPlannerError) -> Self {
        let status = match err {
            TravelPlannerError::Validation { .. } => StatusCode::BAD_REQUEST,
            TravelPlannerError::PlanGenerationFailed { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.user_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// Body of `POST /api/flights`; every field is required
#[derive(Debug, Deserialize)]
pub struct FlightRequest {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
}

impl FlightRequest {
    fn into_query(self) -> Result<FlightQuery, ApiError> {
        let present = |field: Option<String>| field.filter(|value| !value.trim().is_empty());

        let (Some(source), Some(destination), Some(date)) = (
            present(self.source),
            present(self.destination),
            present(self.date),
        ) else {
            return Err(ApiError::bad_request(MISSING_FIELDS));
        };

        if parse_date("date", &date).is_err() {
            return Err(ApiError::bad_request(INVALID_DATE));
        }

        Ok(FlightQuery::new(source, destination, date))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FlightsResponse {
    pub best_flights: Vec<FlightOption>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItineraryResponse {
    /// The full composed text
    pub itinerary: String,
    pub main_content: String,
    pub flight_blocks: Vec<String>,
    /// `not_requested`, `unavailable` or `available`
    pub flights_status: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/flights", post(search_flights))
        .route("/itinerary", post(compose_itinerary))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "version": crate::VERSION }))
}

#[instrument(skip_all)]
async fn search_flights(
    State(state): State<AppState>,
    payload: Result<Json<FlightRequest>, JsonRejection>,
) -> Result<Json<FlightsResponse>, ApiError> {
    let query = match payload {
        Ok(Json(request)) => request.into_query(),
        Err(rejection) => {
            warn!("Unreadable flight request: {}", rejection.body_text());
            Err(ApiError::bad_request(MISSING_FIELDS))
        }
    }
    .inspect_err(|err| error!("Rejected flight request: {}", err.message))?;

    info!(
        source = %query.source,
        destination = %query.destination,
        date = %query.date,
        "Flight request"
    );

    match state.flights.query_flights(&query).await {
        Ok(mut best_flights) => {
            best_flights.truncate(MAX_FLIGHT_OPTIONS);
            info!("Successfully fetched {} best flights", best_flights.len());
            Ok(Json(FlightsResponse { best_flights }))
        }
        Err(err @ TravelPlannerError::NoFlightsFound { .. }) => {
            warn!("No flights found for given route");
            Err(ApiError::from_flight_error(&err))
        }
        Err(err) => {
            error!(kind = err.kind(), "Error fetching flights: {}", err);
            Err(ApiError::from_flight_error(&err))
        }
    }
}

#[instrument(skip_all)]
async fn compose_itinerary(
    State(state): State<AppState>,
    payload: Result<Json<TripPreferences>, JsonRejection>,
) -> Result<Json<ItineraryResponse>, ApiError> {
    let Json(prefs) = payload.map_err(|rejection| {
        warn!("Unreadable itinerary request: {}", rejection.body_text());
        ApiError::bad_request(rejection.body_text())
    })?;

    prefs.validate().map_err(|err| {
        warn!("Invalid preferences: {}", err);
        ApiError::from_itinerary_error(&err)
    })?;

    let itinerary = state.composer.compose_itinerary(&prefs).await.map_err(|err| {
        error!(kind = err.kind(), "Error composing itinerary: {}", err);
        ApiError::from_itinerary_error(&err)
    })?;

    let parsed = itinerary.parse();
    info!(
        flights_status = parsed.flights.status(),
        options = parsed.flight_blocks().len(),
        "Itinerary composed"
    );

    Ok(Json(ItineraryResponse {
        main_content: parsed.main_content.clone(),
        flight_blocks: parsed.flight_blocks().to_vec(),
        flights_status: parsed.flights.status().to_string(),
        itinerary: itinerary.into_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary::composer::tests::{StubFlights, StubGenerator, StubOutcome};
    use crate::itinerary::{FLIGHT_ERROR_NOTE, NO_FLIGHTS_NOTE};
    use crate::models::flight::tests::sample_flight;
    use axum::body::Body;
    use axum::http::{Request, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app(generator: StubGenerator, flights: Arc<StubFlights>) -> Router {
        let composer = ItineraryComposer::new(Arc::new(generator), flights.clone());
        Router::new().nest(
            "/api",
            router(AppState {
                flights,
                composer: Arc::new(composer),
            }),
        )
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn flights_body() -> String {
        json!({ "source": "HYD", "destination": "VTZ", "date": "2024-06-01" }).to_string()
    }

    #[tokio::test]
    async fn test_flights_success() {
        let flights = Arc::new(StubFlights::new(StubOutcome::Flights(vec![
            sample_flight(4521.0),
            sample_flight(5230.0),
        ])));
        let resp = post_json(
            app(StubGenerator::replying("prose"), flights.clone()),
            "/api/flights",
            &flights_body(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let best = json["best_flights"].as_array().expect("best_flights array");
        assert_eq!(best.len(), 2);
        assert_eq!(best[0]["price"], 4521.0);
        assert_eq!(best[1]["price"], 5230.0);
        assert_eq!(best[0]["departure"]["id"], "HYD");
        assert_eq!(flights.call_count(), 1);
    }

    #[tokio::test]
    async fn test_flights_are_capped_at_five() {
        let options = (1..=7).map(|n| sample_flight(f64::from(n))).collect();
        let flights = Arc::new(StubFlights::new(StubOutcome::Flights(options)));
        let resp = post_json(
            app(StubGenerator::replying("prose"), flights),
            "/api/flights",
            &flights_body(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let best = json["best_flights"].as_array().expect("best_flights array");
        assert_eq!(best.len(), MAX_FLIGHT_OPTIONS);
        assert_eq!(best[4]["price"], 5.0);
    }

    #[tokio::test]
    async fn test_missing_source_is_bad_request_without_provider_call() {
        let flights = Arc::new(StubFlights::new(StubOutcome::Flights(vec![sample_flight(1.0)])));
        let body = json!({ "destination": "VTZ", "date": "2024-06-01" }).to_string();
        let resp = post_json(
            app(StubGenerator::replying("prose"), flights.clone()),
            "/api/flights",
            &body,
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({ "error": "Missing required fields" }));
        assert_eq!(flights.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_field_and_garbage_body_are_bad_request() {
        for body in [
            json!({ "source": "  ", "destination": "VTZ", "date": "2024-06-01" }).to_string(),
            "not json".to_string(),
            json!({ "source": 7, "destination": "VTZ", "date": "2024-06-01" }).to_string(),
        ] {
            let flights = Arc::new(StubFlights::new(StubOutcome::NoFlights));
            let resp = post_json(
                app(StubGenerator::replying("prose"), flights.clone()),
                "/api/flights",
                &body,
            )
            .await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(flights.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_invalid_date_is_bad_request() {
        let flights = Arc::new(StubFlights::new(StubOutcome::NoFlights));
        let body = json!({ "source": "HYD", "destination": "VTZ", "date": "June 1st" }).to_string();
        let resp = post_json(
            app(StubGenerator::replying("prose"), flights.clone()),
            "/api/flights",
            &body,
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({ "error": "Invalid date format" }));
        assert_eq!(flights.call_count(), 0);
    }

    #[tokio::test]
    async fn test_no_flights_is_not_found() {
        let flights = Arc::new(StubFlights::new(StubOutcome::NoFlights));
        let resp = post_json(
            app(StubGenerator::replying("prose"), flights),
            "/api/flights",
            &flights_body(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await, json!({ "error": "No flights found" }));
    }

    #[tokio::test]
    async fn test_provider_failure_is_generic_server_error() {
        let flights = Arc::new(StubFlights::new(StubOutcome::Unavailable));
        let resp = post_json(
            app(StubGenerator::replying("prose"), flights),
            "/api/flights",
            &flights_body(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await, json!({ "error": "Failed to fetch flights" }));
    }

    fn itinerary_body(include_transportation: bool) -> String {
        json!({
            "source": "HYD",
            "destination": "VTZ",
            "startDate": "2024-06-01",
            "endDate": "2024-06-04",
            "budget": "5000",
            "travelers": 2,
            "interests": "beaches",
            "includeTransportation": include_transportation
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_itinerary_with_flights() {
        let flights = Arc::new(StubFlights::new(StubOutcome::Flights(vec![
            sample_flight(4521.0),
            sample_flight(5230.0),
        ])));
        let resp = post_json(
            app(StubGenerator::replying("# Day 1"), flights),
            "/api/itinerary",
            &itinerary_body(true),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["flights_status"], "available");
        assert_eq!(json["main_content"], "# Day 1\n\n");
        assert_eq!(json["flight_blocks"].as_array().unwrap().len(), 2);
        assert!(json["itinerary"].as_str().unwrap().contains("## Available Flights"));
    }

    #[tokio::test]
    async fn test_itinerary_without_transportation() {
        let flights = Arc::new(StubFlights::new(StubOutcome::Flights(vec![sample_flight(1.0)])));
        let resp = post_json(
            app(StubGenerator::replying("# Day 1"), flights.clone()),
            "/api/itinerary",
            &itinerary_body(false),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["flights_status"], "not_requested");
        assert_eq!(json["itinerary"], "# Day 1");
        assert_eq!(flights.call_count(), 0);
    }

    #[tokio::test]
    async fn test_itinerary_degrades_when_flights_fail() {
        let flights = Arc::new(StubFlights::new(StubOutcome::Unavailable));
        let resp = post_json(
            app(StubGenerator::replying("# Day 1"), flights),
            "/api/itinerary",
            &itinerary_body(true),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["flights_status"], "unavailable");
        assert!(json["itinerary"].as_str().unwrap().contains(FLIGHT_ERROR_NOTE));
    }

    #[tokio::test]
    async fn test_itinerary_no_flights_note() {
        let flights = Arc::new(StubFlights::new(StubOutcome::NoFlights));
        let resp = post_json(
            app(StubGenerator::replying("# Day 1"), flights),
            "/api/itinerary",
            &itinerary_body(true),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert!(json["itinerary"].as_str().unwrap().contains(NO_FLIGHTS_NOTE));
    }

    #[tokio::test]
    async fn test_itinerary_generator_failure() {
        let flights = Arc::new(StubFlights::new(StubOutcome::NoFlights));
        let resp = post_json(
            app(StubGenerator::failing(), flights),
            "/api/itinerary",
            &itinerary_body(true),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body_json(resp).await,
            json!({ "error": "Failed to generate travel plan. Please try again." })
        );
    }

    #[tokio::test]
    async fn test_itinerary_invalid_preferences() {
        let flights = Arc::new(StubFlights::new(StubOutcome::NoFlights));
        let body = json!({
            "source": "",
            "destination": "VTZ",
            "startDate": "2024-06-01",
            "endDate": "2024-06-04",
            "budget": "5000",
            "travelers": 1,
            "interests": "beaches"
        })
        .to_string();
        let resp = post_json(app(StubGenerator::replying("x"), flights), "/api/itinerary", &body).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("Source"));
    }

    #[tokio::test]
    async fn test_health() {
        let flights = Arc::new(StubFlights::new(StubOutcome::NoFlights));
        let resp = app(StubGenerator::replying("x"), flights)
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "ok");
    }
}
