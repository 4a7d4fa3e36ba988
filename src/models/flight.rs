//! Normalized flight option model

use serde::{Deserialize, Serialize};

/// One end of a flight leg
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Airport {
    /// Airport display name
    pub airport: String,
    /// IATA code
    pub id: String,
    /// Local departure or arrival time as reported by the provider
    pub time: String,
}

/// A single bookable flight, reduced to its first leg
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FlightOption {
    pub airline: String,
    pub flight_number: String,
    pub departure: Airport,
    pub arrival: Airport,
    /// Total duration in minutes
    pub duration: u32,
    pub travel_class: String,
    pub airplane: String,
    pub legroom: String,
    /// Price in USD
    pub price: f64,
    /// Emissions of this flight in grams of CO2
    pub carbon_emissions: f64,
    /// Opaque provider token used to start a booking
    pub booking_token: String,
}

impl FlightOption {
    /// Format the duration as `Xh Ym`
    #[must_use]
    pub fn format_duration(&self) -> String {
        format!("{}h {}m", self.duration / 60, self.duration % 60)
    }

    /// Format emissions in kilograms with two decimals, halves rounded up
    #[must_use]
    pub fn format_carbon_emissions(&self) -> String {
        let kilograms = self.carbon_emissions / 1000.0;
        // `{:.2}` rounds an exact half to even. Exact halves at the second
        // decimal are whole eighths that are not whole quarters.
        let exact_half = (kilograms * 8.0).fract() == 0.0 && (kilograms * 4.0).fract() != 0.0;
        let kilograms = if exact_half {
            (kilograms * 100.0).ceil() / 100.0
        } else {
            kilograms
        };
        format!("{kilograms:.2} kg CO2")
    }

    /// Format the price with a dollar sign
    #[must_use]
    pub fn format_price(&self) -> String {
        format!("${}", self.price)
    }
}
