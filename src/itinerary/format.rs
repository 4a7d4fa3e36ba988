//! Markdown rendering of flight options

use std::fmt::Write;

use super::{BLOCK_DELIMITER, BookingLinkStyle, FLIGHTS_HEADING, OPTION_HEADING_PREFIX};
use crate::models::FlightOption;

/// Text appended to the prose before any flight content
#[must_use]
pub fn flights_section_header() -> String {
    format!("\n\n{FLIGHTS_HEADING}\n\n")
}

/// Render one option block; `number` is 1-based
#[must_use]
pub fn format_flight_option(number: usize, flight: &FlightOption, style: BookingLinkStyle) -> String {
    // Legacy blocks run the delimiters into the heading and the next block.
    let (booking_link, open, close) = match style {
        BookingLinkStyle::Token => (flight.booking_token.clone(), "\n", "\n"),
        BookingLinkStyle::Legacy => (format!("${}", flight.booking_token), "", ""),
    };

    let mut block = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        block,
        "{BLOCK_DELIMITER}{open}\
         {OPTION_HEADING_PREFIX}{number}\n\
         \n\
         1. **Airline**: {}\n\
         2. **Flight Number**: {}\n\
         3. **Departure**: {} ({})\n\
         4. **Arrival**: {} ({})\n\
         5. **Duration**: {}\n\
         6. **Airplane**: {}\n\
         7. **Legroom**: {}\n\
         8. **Price**: {}\n\
         9. **Carbon Emissions**: {}\n\
         \n\
         10. **Book link**: {}\n\
         {BLOCK_DELIMITER}{close}",
        flight.airline,
        flight.flight_number,
        flight.departure.airport,
        flight.departure.time,
        flight.arrival.airport,
        flight.arrival.time,
        flight.format_duration(),
        flight.airplane,
        flight.legroom,
        flight.format_price(),
        flight.format_carbon_emissions(),
        booking_link,
    );
    block
}

/// Render all options in order, numbered from 1
#[must_use]
pub fn format_flight_options(flights: &[FlightOption], style: BookingLinkStyle) -> String {
    flights
        .iter()
        .enumerate()
        .map(|(index, flight)| format_flight_option(index + 1, flight, style))
        .collect()
}
