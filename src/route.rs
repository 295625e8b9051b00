//! Candidate routes from a routing provider and the scored results built from them.

use serde::{Deserialize, Serialize};

use crate::weather::WeatherCategory;

/// Provider duration text used when a leg reports none.
pub const MISSING_DURATION_TEXT: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// One path alternative returned by a routing provider. Read-only to the core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRoute {
    pub summary: Option<String>,
    pub legs: Vec<RouteLeg>,
    /// Encoded overview polyline, passed through untouched.
    pub overview_polyline: String,
}

impl CandidateRoute {
    pub fn first_leg(&self) -> Option<&RouteLeg> {
        self.legs.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub steps: Vec<RouteStep>,
    pub distance_meters: Option<f64>,
    /// Traffic-aware when the provider has it.
    pub duration_text: Option<String>,
    pub start_location: Option<LatLng>,
    pub end_location: Option<LatLng>,
}

impl RouteLeg {
    /// All step instructions joined by a single space, or `None` if the leg has
    /// no steps or any step is missing its instruction.
    pub fn instruction_text(&self) -> Option<String> {
        if self.steps.is_empty() {
            return None;
        }

        self.steps
            .iter()
            .map(|step| step.instruction.as_deref())
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.join(" "))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub instruction: Option<String>,
}

/// A candidate route after scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRoute {
    pub summary: String,
    /// Informational only, never used for ranking.
    pub provider_duration_text: String,
    pub duration_seconds: f64,
    /// Clamped speed, rounded to two decimals.
    pub speed_kph: f64,
    pub polyline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended: Option<bool>,
}

impl ScoredRoute {
    pub fn is_recommended(&self) -> bool {
        self.recommended.unwrap_or(false)
    }
}

/// Result of one trip analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripAnalysis {
    pub routes: Vec<ScoredRoute>,
    pub weather: WeatherCategory,
    pub start_location: LatLng,
    pub end_location: LatLng,
}

impl TripAnalysis {
    pub fn recommended(&self) -> Option<&ScoredRoute> {
        self.routes.iter().find(|route| route.is_recommended())
    }
}
