//! Flight search
//!
//! `FlightSearch` is the seam between the web layer, the itinerary composer
//! and whatever answers flight queries:
//! - `SerpApiClient` calls the Google Flights engine directly
//! - `FlightProxyClient` calls a running `/api/flights` endpoint

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::models::FlightOption;

pub mod proxy;
pub mod serpapi;

pub use proxy::FlightProxyClient;
pub use serpapi::SerpApiClient;

/// Upper bound on options returned for one query
pub const MAX_FLIGHT_OPTIONS: usize = 5;

/// A one-way flight query
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FlightQuery {
    /// Departure airport code
    pub source: String,
    /// Arrival airport code
    pub destination: String,
    /// Outbound date (`YYYY-MM-DD`)
    pub date: String,
}

impl FlightQuery {
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            date: date.into(),
        }
    }
}

#[async_trait]
pub trait FlightSearch: Send + Sync {
    /// Best flights for the query, provider order, at most `MAX_FLIGHT_OPTIONS`
    async fn query_flights(&self, query: &FlightQuery) -> Result<Vec<FlightOption>>;
}
