//! Error types and handling for the trip planner

use thiserror::Error;

/// Main error type for the trip planner
#[derive(Error, Debug)]
pub enum TravelPlannerError {
    /// Missing or malformed input fields
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Network failure or non-success status from the flight provider
    #[error("Flight provider unavailable: {message}")]
    ProviderUnavailable { message: String },

    /// The provider answered but had no best flights for the route
    #[error("No flights found for {source_code} -> {destination} on {date}")]
    NoFlightsFound {
        source_code: String,
        destination: String,
        date: String,
    },

    /// The provider answered with a body missing fields we rely on
    #[error("Malformed provider response: {message}")]
    MalformedProviderResponse { message: String },

    /// The generative model call failed
    #[error("Plan generation failed: {message}")]
    PlanGenerationFailed { message: String },

    /// An outbound call exceeded its configured timeout
    #[error("{service} did not answer within {seconds}s")]
    Timeout { service: String, seconds: u64 },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TravelPlannerError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new provider-unavailable error
    pub fn provider_unavailable<S: Into<String>>(message: S) -> Self {
        Self::ProviderUnavailable {
            message: message.into(),
        }
    }

    pub fn no_flights_found(source: &str, destination: &str, date: &str) -> Self {
        Self::NoFlightsFound {
            source_code: source.to_string(),
            destination: destination.to_string(),
            date: date.to_string(),
        }
    }

    /// Create a new malformed-response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedProviderResponse {
            message: message.into(),
        }
    }

    /// Create a new plan generation error
    pub fn plan_generation<S: Into<String>>(message: S) -> Self {
        Self::PlanGenerationFailed {
            message: message.into(),
        }
    }

    pub fn timeout<S: Into<String>>(service: S, seconds: u64) -> Self {
        Self::Timeout {
            service: service.into(),
            seconds,
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Short, stable name of the error class, used in log records
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            TravelPlannerError::Validation { .. } => "validation",
            TravelPlannerError::ProviderUnavailable { .. } => "provider_unavailable",
            TravelPlannerError::NoFlightsFound { .. } => "no_flights_found",
            TravelPlannerError::MalformedProviderResponse { .. } => "malformed_provider_response",
            TravelPlannerError::PlanGenerationFailed { .. } => "plan_generation_failed",
            TravelPlannerError::Timeout { .. } => "timeout",
            TravelPlannerError::Config { .. } => "config",
            TravelPlannerError::Io { .. } => "io",
        }
    }

    /// Get a user-friendly error message
    ///
    /// Provider and model details never appear here; they are logged instead.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TravelPlannerError::Validation { message } => message.clone(),
            TravelPlannerError::NoFlightsFound { .. } => "No flights found".to_string(),
            TravelPlannerError::ProviderUnavailable { .. }
            | TravelPlannerError::MalformedProviderResponse { .. }
            | TravelPlannerError::Timeout { .. } => "Failed to fetch flights".to_string(),
            TravelPlannerError::PlanGenerationFailed { .. } => {
                "Failed to generate travel plan. Please try again.".to_string()
            }
            TravelPlannerError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TravelPlannerError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for TravelPlannerError {
    fn from(err: reqwest::Error) -> Self {
        TravelPlannerError::provider_unavailable(err.to_string())
    }
}
