//! Google Directions API adapter.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::route::{CandidateRoute, LatLng, RouteLeg, RouteStep};
use crate::traits::{RouteProvider, RouteQuery};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api/directions/json".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectionsClient {
    config: DirectionsConfig,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl DirectionsClient {
    pub fn new(config: DirectionsConfig) -> Result<Self, RoutingError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| RoutingError::MissingCredentials("Google Maps API key".to_string()))?;
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }
}

impl RouteProvider for DirectionsClient {
    fn routes(&self, query: &RouteQuery) -> Result<Vec<CandidateRoute>, RoutingError> {
        let departure_time = departure_param(query.departure);
        let body = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("origin", query.origin.as_str()),
                ("destination", query.destination.as_str()),
                ("mode", query.mode.as_str()),
                ("alternatives", if query.alternatives { "true" } else { "false" }),
                ("departure_time", departure_time.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<DirectionsResponse>())?;

        body.into_candidates()
    }
}

/// Parse a raw Directions API response body.
pub fn candidates_from_json(body: &str) -> Result<Vec<CandidateRoute>, RoutingError> {
    serde_json::from_str::<DirectionsResponse>(body)?.into_candidates()
}

/// Unix seconds for a departure in local time, or "now".
fn departure_param(departure: Option<NaiveDateTime>) -> String {
    match departure {
        Some(departure) => departure
            .and_local_timezone(Local)
            .earliest()
            .map(|local| local.timestamp())
            .unwrap_or_else(|| departure.and_utc().timestamp())
            .to_string(),
        None => "now".to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

impl DirectionsResponse {
    fn into_candidates(self) -> Result<Vec<CandidateRoute>, RoutingError> {
        if self.status == "ZERO_RESULTS" {
            return Ok(Vec::new());
        }
        if self.status != "OK" {
            return Err(RoutingError::Provider {
                status: self.status,
                message: self.error_message.unwrap_or_default(),
            });
        }

        Ok(self.routes.into_iter().map(DirectionsRoute::into_candidate).collect())
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    summary: Option<String>,
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
    overview_polyline: Option<EncodedPolyline>,
}

impl DirectionsRoute {
    fn into_candidate(self) -> CandidateRoute {
        CandidateRoute {
            summary: self.summary,
            legs: self.legs.into_iter().map(DirectionsLeg::into_leg).collect(),
            overview_polyline: self.overview_polyline.map(|p| p.points).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    #[serde(default)]
    steps: Vec<DirectionsStep>,
    distance: Option<TextValue>,
    duration: Option<TextValue>,
    duration_in_traffic: Option<TextValue>,
    start_location: Option<LatLng>,
    end_location: Option<LatLng>,
}

impl DirectionsLeg {
    fn into_leg(self) -> RouteLeg {
        // Traffic-aware duration wins when present, even without text.
        let duration = self.duration_in_traffic.or(self.duration);
        RouteLeg {
            steps: self
                .steps
                .into_iter()
                .map(|step| RouteStep {
                    instruction: step.html_instructions,
                })
                .collect(),
            distance_meters: self.distance.and_then(|d| d.value),
            duration_text: duration.and_then(|d| d.text),
            start_location: self.start_location,
            end_location: self.end_location,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsStep {
    html_instructions: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: Option<String>,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct EncodedPolyline {
    points: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const RESPONSE: &str = r#"{
        "status": "OK",
        "geocoded_waypoints": [],
        "routes": [
            {
                "summary": "NH 9",
                "overview_polyline": {"points": "kzwmDaxxzM"},
                "legs": [{
                    "distance": {"text": "10.0 km", "value": 10000},
                    "duration": {"text": "18 mins", "value": 1080},
                    "duration_in_traffic": {"text": "27 mins", "value": 1620},
                    "start_location": {"lat": 28.6412, "lng": 77.3706},
                    "end_location": {"lat": 28.6692, "lng": 77.4538},
                    "steps": [
                        {"html_instructions": "Head <b>north</b> on <b>Shakti Khand Rd</b>"},
                        {"html_instructions": "Merge onto <b>NH 9</b>"}
                    ]
                }]
            },
            {
                "overview_polyline": {"points": "kzwmDaxxzN"},
                "legs": [{
                    "distance": {"text": "12.0 km", "value": 12000},
                    "duration": {"text": "24 mins", "value": 1440},
                    "steps": [{"travel_mode": "DRIVING"}]
                }]
            }
        ]
    }"#;

    #[test]
    fn test_parse_routes() {
        let routes = candidates_from_json(RESPONSE).unwrap();
        assert_eq!(routes.len(), 2);

        let first = &routes[0];
        assert_eq!(first.summary.as_deref(), Some("NH 9"));
        assert_eq!(first.overview_polyline, "kzwmDaxxzM");
        let leg = first.first_leg().unwrap();
        assert_eq!(leg.distance_meters, Some(10000.0));
        assert_eq!(leg.duration_text.as_deref(), Some("27 mins"));
        assert_eq!(leg.start_location, Some(LatLng::new(28.6412, 77.3706)));
        assert_eq!(
            leg.instruction_text().as_deref(),
            Some("Head <b>north</b> on <b>Shakti Khand Rd</b> Merge onto <b>NH 9</b>")
        );
    }

    #[test]
    fn test_missing_fields_kept_as_none() {
        let routes = candidates_from_json(RESPONSE).unwrap();
        let second = &routes[1];
        assert_eq!(second.summary, None);
        let leg = second.first_leg().unwrap();
        assert_eq!(leg.duration_text.as_deref(), Some("24 mins"));
        assert_eq!(leg.start_location, None);
        assert_eq!(leg.instruction_text(), None);
    }

    #[test]
    fn test_zero_results() {
        let routes = candidates_from_json(r#"{"status":"ZERO_RESULTS","routes":[]}"#).unwrap();
        assert!(routes.is_empty());
    }

    #[test]
    fn test_error_status() {
        let err = candidates_from_json(
            r#"{"status":"REQUEST_DENIED","error_message":"The provided API key is invalid.","routes":[]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RoutingError::Provider { ref status, .. } if status == "REQUEST_DENIED"));
    }

    #[test]
    fn test_invalid_body() {
        assert!(matches!(candidates_from_json("<html>"), Err(RoutingError::Decode(_))));
    }

    #[test]
    fn test_departure_param() {
        assert_eq!(departure_param(None), "now");
        let departure = NaiveDate::from_ymd_opt(2025, 9, 9).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let seconds: i64 = departure_param(Some(departure)).parse().unwrap();
        // Within a day of the UTC reading, whatever the local offset.
        assert!((seconds - departure.and_utc().timestamp()).abs() <= 86_400);
    }

    #[test]
    fn test_missing_api_key() {
        assert!(matches!(
            DirectionsClient::new(DirectionsConfig::default()),
            Err(RoutingError::MissingCredentials(_))
        ));
    }
}
