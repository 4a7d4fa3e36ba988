//! Trip planner - travel itineraries with live flight options
//!
//! This library provides the flight search proxy, the itinerary composer
//! that combines generated prose with formatted flights, and the parser that
//! splits a composed itinerary back into its parts.

pub mod api;
pub mod config;
pub mod error;
pub mod flights;
pub mod generator;
pub mod itinerary;
pub mod models;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use config::TripPlannerConfig;
pub use error::TravelPlannerError;
pub use flights::{FlightProxyClient, FlightQuery, FlightSearch, SerpApiClient};
pub use generator::{GeminiClient, TextGenerator};
pub use itinerary::{ComposedItinerary, ItineraryComposer, ParsedItinerary};
pub use models::{FlightOption, TripDefaults, TripPreferences};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelPlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
