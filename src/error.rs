//! Error types shared across the planner.

use crate::features::FeatureSchema;

/// The two failures a trip analysis can surface to its caller.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TripAnalysisError {
    #[error("could not find any routes from {origin} to {destination}")]
    NoRoutesFound { origin: String, destination: String },
    #[error("trip analysis failed: {0}")]
    Failed(String),
}

/// Ranking was asked to pick from zero routes.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot rank an empty set of routes")]
pub struct EmptyInputError;

#[derive(thiserror::Error, Debug)]
pub enum RoutingError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("malformed routing response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("routing provider returned {status}: {message}")]
    Provider { status: String, message: String },
    #[error("cannot resolve location '{0}', expected 'lat,lng'")]
    UnresolvableLocation(String),
    #[error("missing routing credentials: {0}")]
    MissingCredentials(String),
}

#[derive(thiserror::Error, Debug)]
pub enum WeatherError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("weather response has no conditions")]
    EmptyResponse,
    #[error("no weather API key configured")]
    MissingApiKey,
}

#[derive(thiserror::Error, Debug)]
pub enum EstimatorError {
    #[error("failed to load speed model from {path}: {message}")]
    Load { path: String, message: String },
    #[error(transparent)]
    Schema(#[from] SchemaMismatch),
    #[error("invalid feature vector: {0}")]
    InvalidFeatures(String),
    #[error("speed model failed: {0}")]
    Prediction(String),
}

/// The estimator was trained against a different feature layout.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("feature schema mismatch: expected {expected}, found {found}")]
pub struct SchemaMismatch {
    pub expected: FeatureSchema,
    pub found: FeatureSchema,
}
