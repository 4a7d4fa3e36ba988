use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{FlightQuery, FlightSearch, MAX_FLIGHT_OPTIONS};
use crate::config::FlightsConfig;
use crate::models::{Airport, FlightOption};
use crate::{Result, TravelPlannerError};

/// SerpApi Google Flights client
pub struct SerpApiClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout_seconds: u64,
}

/// Search response from the Google Flights engine
#[derive(Debug, Deserialize)]
struct SearchResponse {
    best_flights: Option<Vec<BestFlight>>,
}

#[derive(Debug, Deserialize)]
struct BestFlight {
    flights: Option<Vec<FlightLeg>>,
    total_duration: Option<u32>,
    price: Option<f64>,
    carbon_emissions: Option<CarbonEmissions>,
    booking_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FlightLeg {
    departure_airport: Option<LegAirport>,
    arrival_airport: Option<LegAirport>,
    airline: Option<String>,
    flight_number: Option<String>,
    travel_class: Option<String>,
    airplane: Option<String>,
    legroom: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LegAirport {
    name: Option<String>,
    id: Option<String>,
    time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CarbonEmissions {
    this_flight: Option<f64>,
}

impl SerpApiClient {
    /// Create a new client
    pub fn new(config: &FlightsConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TravelPlannerError::config("Missing flight search API key"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("trip-planner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TravelPlannerError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_seconds: config.timeout_seconds.into(),
        })
    }

    fn search_url(&self, query: &FlightQuery, api_key: &str) -> String {
        format!(
            "{}/search.json?engine=google_flights&type=2&departure_id={}&arrival_id={}&outbound_date={}&currency=USD&hl=en&api_key={}",
            self.base_url,
            urlencoding::encode(query.source.trim()),
            urlencoding::encode(query.destination.trim()),
            urlencoding::encode(query.date.trim()),
            urlencoding::encode(api_key),
        )
    }
}

#[async_trait]
impl FlightSearch for SerpApiClient {
    #[instrument(skip(self, query), fields(source = %query.source, destination = %query.destination, date = %query.date))]
    async fn query_flights(&self, query: &FlightQuery) -> Result<Vec<FlightOption>> {
        info!("Fetching flights from URL: {}", self.search_url(query, "REDACTED"));

        let response = self
            .client
            .get(self.search_url(query, &self.api_key))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TravelPlannerError::timeout("flight provider", self.timeout_seconds)
                } else {
                    // Strip the URL so the key cannot leak through the message
                    TravelPlannerError::provider_unavailable(format!(
                        "request failed: {}",
                        e.without_url()
                    ))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(%status, "Flight provider returned an error");
            debug!("Flight provider error body: {}", error_text);
            return Err(TravelPlannerError::provider_unavailable(format!(
                "provider returned {status}"
            )));
        }

        let body = response.text().await.map_err(|e| {
            TravelPlannerError::provider_unavailable(format!(
                "failed to read body: {}",
                e.without_url()
            ))
        })?;
        let search: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| TravelPlannerError::malformed(format!("response is not valid JSON: {e}")))?;

        let flights = normalize(search, query)?;
        info!("Successfully fetched {} best flights", flights.len());
        Ok(flights)
    }
}

fn normalize(search: SearchResponse, query: &FlightQuery) -> Result<Vec<FlightOption>> {
    let best_flights = search.best_flights.unwrap_or_default();
    if best_flights.is_empty() {
        return Err(TravelPlannerError::no_flights_found(
            &query.source,
            &query.destination,
            &query.date,
        ));
    }

    best_flights
        .into_iter()
        .take(MAX_FLIGHT_OPTIONS)
        .enumerate()
        .map(|(index, flight)| to_flight_option(flight, index))
        .collect()
}

// Multi-leg itineraries are represented by their first leg only.
// Only the leg, its airports and the emissions are required; other fields
// fall back to empty or zero.
fn to_flight_option(flight: BestFlight, index: usize) -> Result<FlightOption> {
    let field = |name: &str| TravelPlannerError::malformed(format!("best_flights[{index}]: missing {name}"));

    let leg = flight
        .flights
        .and_then(|legs| legs.into_iter().next())
        .ok_or_else(|| field("flights[0]"))?;

    let departure = leg
        .departure_airport
        .map(to_airport)
        .ok_or_else(|| field("flights[0].departure_airport"))?;
    let arrival = leg
        .arrival_airport
        .map(to_airport)
        .ok_or_else(|| field("flights[0].arrival_airport"))?;

    let carbon_emissions = flight
        .carbon_emissions
        .and_then(|emissions| emissions.this_flight)
        .ok_or_else(|| field("carbon_emissions.this_flight"))?;

    if flight.price.is_none() || flight.total_duration.is_none() {
        warn!(index, "Flight option without price or total_duration");
    }

    Ok(FlightOption {
        airline: leg.airline.unwrap_or_default(),
        flight_number: leg.flight_number.unwrap_or_default(),
        departure,
        arrival,
        duration: flight.total_duration.unwrap_or_default(),
        travel_class: leg.travel_class.unwrap_or_default(),
        airplane: leg.airplane.unwrap_or_default(),
        legroom: leg.legroom.unwrap_or_default(),
        price: flight.price.unwrap_or_default(),
        carbon_emissions,
        booking_token: flight.booking_token.unwrap_or_default(),
    })
}

fn to_airport(airport: LegAirport) -> Airport {
    Airport {
        airport: airport.name.unwrap_or_default(),
        id: airport.id.unwrap_or_default(),
        time: airport.time.unwrap_or_default(),
    }
}
