use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument, warn};

use super::{FlightQuery, FlightSearch, MAX_FLIGHT_OPTIONS};
use crate::models::FlightOption;
use crate::{Result, TravelPlannerError};

/// Client for a running `POST /api/flights` endpoint
pub struct FlightProxyClient {
    client: Client,
    endpoint: String,
    timeout_seconds: u64,
}

#[derive(Debug, Deserialize)]
struct FlightsResponse {
    #[serde(default)]
    best_flights: Vec<FlightOption>,
}

impl FlightProxyClient {
    /// `base_url` is the server root, e.g. `http://localhost:5001`
    pub fn new(base_url: &str, timeout_seconds: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds.into()))
            .build()
            .map_err(|e| TravelPlannerError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/flights", base_url.trim_end_matches('/')),
            timeout_seconds: timeout_seconds.into(),
        })
    }
}

#[async_trait]
impl FlightSearch for FlightProxyClient {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn query_flights(&self, query: &FlightQuery) -> Result<Vec<FlightOption>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TravelPlannerError::timeout("flight endpoint", self.timeout_seconds)
                } else {
                    TravelPlannerError::provider_unavailable(format!("flight endpoint unreachable: {e}"))
                }
            })?;

        let status = response.status();
        info!(%status, "Flight endpoint responded");

        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Flight endpoint error body: {}", error_text);
            return Err(TravelPlannerError::provider_unavailable(format!(
                "flight endpoint returned {status}"
            )));
        }

        let mut body: FlightsResponse = response
            .json()
            .await
            .map_err(|e| TravelPlannerError::malformed(format!("unexpected flight endpoint body: {e}")))?;
        body.best_flights.truncate(MAX_FLIGHT_OPTIONS);
        Ok(body.best_flights)
    }
}
