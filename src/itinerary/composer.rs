use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::format::{flights_section_header, format_flight_options};
use super::{BookingLinkStyle, ComposedItinerary, FLIGHT_ERROR_NOTE, NO_FLIGHTS_NOTE};
use crate::flights::{FlightQuery, FlightSearch};
use crate::generator::TextGenerator;
use crate::models::TripPreferences;
use crate::{Result, TravelPlannerError};

/// Builds an itinerary from the model's prose and, on request, live flights
pub struct ItineraryComposer {
    generator: Arc<dyn TextGenerator>,
    flights: Arc<dyn FlightSearch>,
    booking_link: BookingLinkStyle,
}

impl ItineraryComposer {
    pub fn new(generator: Arc<dyn TextGenerator>, flights: Arc<dyn FlightSearch>) -> Self {
        Self {
            generator,
            flights,
            booking_link: BookingLinkStyle::default(),
        }
    }

    #[must_use]
    pub fn with_booking_link(mut self, style: BookingLinkStyle) -> Self {
        self.booking_link = style;
        self
    }

    /// Prompt that embeds every preference verbatim
    #[must_use]
    pub fn build_prompt(prefs: &TripPreferences) -> String {
        let mut prompt = format!(
            "Act as a travel planning expert. Create a detailed travel itinerary based on the following preferences:\n\
             - Traveling from: {}\n\
             - Destination: {}\n\
             - Dates: {} to {}\n\
             - Budget: {}\n\
             - Number of Travelers: {}\n\
             - Interests: {}",
            prefs.source,
            prefs.destination,
            prefs.start_date,
            prefs.end_date,
            prefs.budget,
            prefs.travelers,
            prefs.interests,
        );
        if prefs.include_transportation {
            prompt.push_str("\n- Include transportation options.");
        }
        prompt
    }

    /// Generate the prose and append the flights section when asked to.
    ///
    /// Only a failed model call is an error; flight lookup problems are
    /// written into the itinerary as a note.
    #[instrument(skip(self, prefs), fields(source = %prefs.source, destination = %prefs.destination))]
    pub async fn compose_itinerary(&self, prefs: &TripPreferences) -> Result<ComposedItinerary> {
        let prompt = Self::build_prompt(prefs);

        let mut plan = self.generator.generate(&prompt).await.map_err(|e| {
            error!(error = %e, "Error generating travel plan");
            match e {
                TravelPlannerError::PlanGenerationFailed { .. } => e,
                other => TravelPlannerError::plan_generation(other.to_string()),
            }
        })?;

        if prefs.include_transportation {
            plan.push_str(&flights_section_header());
            self.append_flights(&mut plan, prefs).await;
        }

        Ok(ComposedItinerary::new(plan))
    }

    async fn append_flights(&self, plan: &mut String, prefs: &TripPreferences) {
        let query = FlightQuery::new(&prefs.source, &prefs.destination, &prefs.start_date);

        match self.flights.query_flights(&query).await {
            Ok(flights) if !flights.is_empty() => {
                info!("Adding {} flight options", flights.len());
                plan.push_str(&format_flight_options(&flights, self.booking_link));
            }
            Ok(_) | Err(TravelPlannerError::NoFlightsFound { .. }) => {
                info!("No flights available for the selected route");
                plan.push_str(NO_FLIGHTS_NOTE);
                plan.push('\n');
            }
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Error fetching flights");
                plan.push_str(FLIGHT_ERROR_NOTE);
                plan.push('\n');
            }
        }
    }
}
