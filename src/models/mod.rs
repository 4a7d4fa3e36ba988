//! Data models for the trip planner
//!
//! - Preferences: what the traveller asks for, and the form defaults
//! - Flight: normalized flight options as served by the flight endpoint

pub mod flight;
pub mod preferences;

pub use flight::{Airport, FlightOption};
pub use preferences::{TripDefaults, TripPreferences};
