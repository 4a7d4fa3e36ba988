//! Splits a composed itinerary back into its prose and flight blocks

use regex::Regex;
use std::fmt::Display;
use std::sync::LazyLock;

use super::{BLOCK_DELIMITER, FLIGHTS_HEADING};

static OPTION_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"### Option \d+").expect("option heading regex is valid"));

/// What the flights section of an itinerary holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlightSection {
    /// No `## Available Flights` heading at all
    NotIncluded,
    /// The heading is there but no option blocks follow it
    NoFlights { note: String },
    /// Raw option blocks, in document order
    Options { blocks: Vec<String> },
}

impl FlightSection {
    /// Stable name for API responses
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            FlightSection::NotIncluded => "not_requested",
            FlightSection::NoFlights { .. } => "unavailable",
            FlightSection::Options { .. } => "available",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedItinerary {
    /// Everything before the flights heading
    pub main_content: String,
    pub flights: FlightSection,
}

impl ParsedItinerary {
    /// Option blocks, empty unless the section has options
    #[must_use]
    pub fn flight_blocks(&self) -> &[String] {
        match &self.flights {
            FlightSection::Options { blocks } => blocks.as_slice(),
            _ => &[],
        }
    }

    /// True when a flights section exists but holds no options
    #[must_use]
    pub fn has_no_flights(&self) -> bool {
        matches!(self.flights, FlightSection::NoFlights { .. })
    }
}

/// Parse composed itinerary text. Pure: the same text always gives the same result.
#[must_use]
pub fn parse(text: &str) -> ParsedItinerary {
    let Some((main_content, section)) = text.split_once(FLIGHTS_HEADING) else {
        return ParsedItinerary {
            main_content: text.to_string(),
            flights: FlightSection::NotIncluded,
        };
    };

    let starts: Vec<usize> = OPTION_HEADING.find_iter(section).map(|m| m.start()).collect();
    let flights = if starts.is_empty() {
        FlightSection::NoFlights {
            note: section.trim().to_string(),
        }
    } else {
        let blocks = starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = starts.get(i + 1).copied().unwrap_or(section.len());
                section[start..end].to_string()
            })
            .collect();
        FlightSection::Options { blocks }
    };

    ParsedItinerary {
        main_content: main_content.to_string(),
        flights,
    }
}

// Block text without the surrounding rules, for terminal output
fn strip_delimiters(block: &str) -> &str {
    let mut trimmed = block.trim();
    while let Some(rest) = trimmed.strip_suffix(BLOCK_DELIMITER) {
        trimmed = rest.trim_end();
    }
    trimmed
}

impl Display for ParsedItinerary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Your Travel Itinerary")?;
        writeln!(f, "=====================")?;
        writeln!(f, "{}", self.main_content.trim())?;

        match &self.flights {
            FlightSection::NotIncluded => {}
            FlightSection::NoFlights { .. } => {
                writeln!(f)?;
                writeln!(f, "Available Flights")?;
                writeln!(f, "=================")?;
                writeln!(f, "No available flights found.")?;
            }
            FlightSection::Options { blocks } => {
                writeln!(f)?;
                writeln!(f, "Available Flights")?;
                writeln!(f, "=================")?;
                for block in blocks {
                    writeln!(f, "{}", strip_delimiters(block))?;
                    writeln!(f)?;
                }
            }
        }
        Ok(())
    }
}
