//! Interfaces for the collaborators the trip planner depends on.
//!
//! The planner only scores and ranks routes; fetching routes, looking up
//! weather and predicting speeds are done by implementations of these traits,
//! injected into [`crate::pipeline::TripAnalysisPipeline`].

use chrono::NaiveDateTime;

use crate::error::{EstimatorError, RoutingError, WeatherError};
use crate::features::{FeatureSchema, FeatureVector};
use crate::route::CandidateRoute;
use crate::weather::WeatherCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    Driving,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
        }
    }
}

/// Request for route alternatives between two places.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    /// Free text address or "lat,lng".
    pub origin: String,
    pub destination: String,
    /// `None` means "leave now".
    pub departure: Option<NaiveDateTime>,
    pub mode: TravelMode,
    pub alternatives: bool,
}

impl RouteQuery {
    pub fn driving(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure,
            mode: TravelMode::Driving,
            alternatives: true,
        }
    }
}

/// Supplies candidate routes.
pub trait RouteProvider {
    /// An empty list means the provider found no route; it is not an error.
    fn routes(&self, query: &RouteQuery) -> Result<Vec<CandidateRoute>, RoutingError>;
}

/// Supplies the current weather for the planning area.
///
/// Callers go through [`crate::weather::resolve_weather`], which handles
/// future trips and turns failures into a default.
pub trait WeatherProvider {
    fn live_weather(&self) -> Result<WeatherCategory, WeatherError>;
}

/// Predicts average speed in km/h.
///
/// `predict` must not mutate shared state; one instance may serve
/// concurrent analyses.
pub trait SpeedEstimator {
    fn predict(&self, features: &FeatureVector) -> Result<f64, EstimatorError>;

    /// The feature layout this estimator was trained against.
    fn schema(&self) -> FeatureSchema {
        FeatureSchema::current()
    }
}

/// Adapts a plain function into a [`SpeedEstimator`].
#[derive(Debug, Clone, Copy)]
pub struct FnEstimator<F>(pub F);

impl<F> SpeedEstimator for FnEstimator<F>
where
    F: Fn(&FeatureVector) -> f64,
{
    fn predict(&self, features: &FeatureVector) -> Result<f64, EstimatorError> {
        Ok((self.0)(features))
    }
}

impl<T: RouteProvider + ?Sized> RouteProvider for Box<T> {
    fn routes(&self, query: &RouteQuery) -> Result<Vec<CandidateRoute>, RoutingError> {
        (**self).routes(query)
    }
}

impl<T: WeatherProvider + ?Sized> WeatherProvider for Box<T> {
    fn live_weather(&self) -> Result<WeatherCategory, WeatherError> {
        (**self).live_weather()
    }
}

impl<T: SpeedEstimator + ?Sized> SpeedEstimator for Box<T> {
    fn predict(&self, features: &FeatureVector) -> Result<f64, EstimatorError> {
        (**self).predict(features)
    }

    fn schema(&self) -> FeatureSchema {
        (**self).schema()
    }
}
