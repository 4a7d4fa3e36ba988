//! Itinerary composition and parsing
//!
//! A composed itinerary is the model's prose, optionally followed by a
//! flights section in a fixed markdown micro-format:
//!
//! ```text
//! ## Available Flights
//!
//! ---
//! ### Option 1
//! ...
//! ---
//! ```
//!
//! `format` writes that section, `presenter` reads it back by exact heading
//! match, so both sides share the constants below.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod composer;
pub mod format;
pub mod presenter;

pub use composer::ItineraryComposer;
pub use presenter::{FlightSection, ParsedItinerary, parse};

/// Heading that opens the flights section
pub const FLIGHTS_HEADING: &str = "## Available Flights";
/// Prefix of each numbered option heading
pub const OPTION_HEADING_PREFIX: &str = "### Option ";
/// Horizontal rule around each option block
pub const BLOCK_DELIMITER: &str = "---";
/// Written when the route has no flights
pub const NO_FLIGHTS_NOTE: &str = "No flights available for your selected route.";
/// Written when the flight lookup failed
pub const FLIGHT_ERROR_NOTE: &str = "Error fetching flight details. Please try again later.";

/// How the booking token is rendered in an option block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingLinkStyle {
    /// The raw token
    #[default]
    Token,
    /// Older itineraries: `$`-prefixed token, and `---` delimiters with no
    /// line break before the heading or after the closing rule
    Legacy,
}

/// Prose body plus optional flights section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComposedItinerary(String);

impl ComposedItinerary {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Split into main content and flight blocks
    #[must_use]
    pub fn parse(&self) -> ParsedItinerary {
        presenter::parse(&self.0)
    }
}

impl Display for ComposedItinerary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
