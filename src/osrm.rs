//! OSRM HTTP adapter for route alternatives.

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::route::{CandidateRoute, LatLng, RouteLeg, RouteStep};
use crate::traits::{RouteProvider, RouteQuery};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, origin: LatLng, destination: LatLng, alternatives: bool) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?alternatives={}&steps=true&overview=full&geometries=polyline",
            self.config.base_url,
            self.config.profile,
            origin.lng,
            origin.lat,
            destination.lng,
            destination.lat,
            alternatives
        )
    }
}

impl RouteProvider for OsrmClient {
    fn routes(&self, query: &RouteQuery) -> Result<Vec<CandidateRoute>, RoutingError> {
        let origin = parse_lat_lng(&query.origin)?;
        let destination = parse_lat_lng(&query.destination)?;
        if query.departure.is_some() {
            tracing::debug!("OSRM has no time-dependent routing, ignoring departure time");
        }

        let url = self.route_url(origin, destination, query.alternatives);
        // OSRM reports NoRoute with a 4xx status and a JSON body, so the body
        // is read regardless of status.
        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.json::<OsrmRouteResponse>())?;

        body.into_candidates()
    }
}

/// Parse a "lat,lng" pair.
pub fn parse_lat_lng(text: &str) -> Result<LatLng, RoutingError> {
    let unresolvable = || RoutingError::UnresolvableLocation(text.to_string());
    let (lat, lng) = text.split_once(',').ok_or_else(unresolvable)?;
    let lat: f64 = lat.trim().parse().map_err(|_| unresolvable())?;
    let lng: f64 = lng.trim().parse().map_err(|_| unresolvable())?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(unresolvable());
    }
    Ok(LatLng::new(lat, lng))
}

/// Google-style duration text, e.g. "25 mins" or "1 hour 5 mins".
pub fn format_duration(seconds: f64) -> String {
    let minutes = ((seconds / 60.0).round() as u64).max(1);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    let plural = |n: u64, unit: &str| {
        if n == 1 {
            format!("{n} {unit}")
        } else {
            format!("{n} {unit}s")
        }
    };

    match (hours, minutes) {
        (0, m) => plural(m, "min"),
        (h, 0) => plural(h, "hour"),
        (h, m) => format!("{} {}", plural(h, "hour"), plural(m, "min")),
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
    #[serde(default)]
    waypoints: Vec<OsrmWaypoint>,
}

impl OsrmRouteResponse {
    fn into_candidates(self) -> Result<Vec<CandidateRoute>, RoutingError> {
        if self.code == "NoRoute" {
            return Ok(Vec::new());
        }
        if self.code != "Ok" {
            return Err(RoutingError::Provider {
                status: self.code,
                message: self.message.unwrap_or_default(),
            });
        }

        let start = self.waypoints.first().map(OsrmWaypoint::lat_lng);
        let end = self.waypoints.last().map(OsrmWaypoint::lat_lng);

        Ok(self
            .routes
            .into_iter()
            .map(|route| {
                // OSRM sends "" when it has no road names to summarize.
                let summary = route
                    .legs
                    .first()
                    .map(|leg| leg.summary.clone())
                    .filter(|summary| !summary.is_empty());
                let legs = route
                    .legs
                    .into_iter()
                    .map(|leg| RouteLeg {
                        steps: leg
                            .steps
                            .iter()
                            .map(|step| RouteStep {
                                instruction: Some(step.instruction()),
                            })
                            .collect(),
                        distance_meters: Some(leg.distance),
                        duration_text: Some(format_duration(leg.duration)),
                        start_location: start,
                        end_location: end,
                    })
                    .collect();

                CandidateRoute {
                    summary,
                    legs,
                    overview_polyline: route.geometry,
                }
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    #[serde(default)]
    geometry: String,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
    #[serde(default)]
    summary: String,
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    #[serde(default)]
    name: String,
    #[serde(rename = "ref")]
    road_ref: Option<String>,
    maneuver: OsrmManeuver,
}

impl OsrmStep {
    fn road(&self) -> String {
        match (self.name.is_empty(), self.road_ref.as_deref()) {
            (false, Some(r)) => format!("{} ({})", self.name, r),
            (false, None) => self.name.clone(),
            (true, Some(r)) => r.to_string(),
            (true, None) => "the road".to_string(),
        }
    }

    fn instruction(&self) -> String {
        let road = self.road();
        let modifier = self.maneuver.modifier.as_deref().unwrap_or("straight");
        match self.maneuver.kind.as_str() {
            "depart" => format!("Head {modifier} on {road}"),
            "arrive" => "Arrive at your destination".to_string(),
            "turn" | "end of road" => format!("Turn {modifier} onto {road}"),
            "merge" => format!("Merge onto {road}"),
            "on ramp" => format!("Take the ramp onto {road}"),
            "off ramp" => format!("Take the exit onto {road}"),
            "fork" => format!("Keep {modifier} onto {road}"),
            "roundabout" | "rotary" | "roundabout turn" => {
                format!("At the roundabout, exit onto {road}")
            }
            _ => format!("Continue onto {road}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type")]
    kind: String,
    modifier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OsrmWaypoint {
    /// [lng, lat]
    location: [f64; 2],
}

impl OsrmWaypoint {
    fn lat_lng(&self) -> LatLng {
        LatLng::new(self.location[1], self.location[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{RoadSegmentCategory, classify_leg};

    const RESPONSE: &str = r#"{
        "code": "Ok",
        "routes": [
            {
                "geometry": "ooxmDsnszM",
                "distance": 10234.5,
                "duration": 1490.2,
                "legs": [{
                    "summary": "Grand Trunk Road, NH 9",
                    "distance": 10234.5,
                    "duration": 1490.2,
                    "steps": [
                        {"name": "Shakti Khand Road", "maneuver": {"type": "depart", "modifier": "left"}},
                        {"name": "Grand Trunk Road", "ref": "NH 9", "maneuver": {"type": "turn", "modifier": "right"}},
                        {"name": "", "maneuver": {"type": "arrive"}}
                    ]
                }]
            },
            {
                "geometry": "ooxmDsnszN",
                "distance": 12000.0,
                "duration": 1900.0,
                "legs": [{
                    "summary": "",
                    "distance": 12000.0,
                    "duration": 3900.0,
                    "steps": [
                        {"name": "Vaibhav Khand Road", "maneuver": {"type": "depart", "modifier": "right"}}
                    ]
                }]
            }
        ],
        "waypoints": [
            {"name": "Shakti Khand Road", "location": [77.3706, 28.6412]},
            {"name": "Raj Nagar", "location": [77.4538, 28.6692]}
        ]
    }"#;

    fn candidates() -> Vec<CandidateRoute> {
        serde_json::from_str::<OsrmRouteResponse>(RESPONSE)
            .unwrap()
            .into_candidates()
            .unwrap()
    }

    #[test]
    fn test_parse_routes() {
        let routes = candidates();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].summary.as_deref(), Some("Grand Trunk Road, NH 9"));
        assert_eq!(routes[0].overview_polyline, "ooxmDsnszM");
        assert_eq!(routes[1].summary, None);

        let leg = routes[0].first_leg().unwrap();
        assert_eq!(leg.distance_meters, Some(10234.5));
        assert_eq!(leg.duration_text.as_deref(), Some("25 mins"));
        assert_eq!(leg.start_location, Some(LatLng::new(28.6412, 77.3706)));
        assert_eq!(leg.end_location, Some(LatLng::new(28.6692, 77.4538)));
        assert_eq!(routes[1].first_leg().unwrap().duration_text.as_deref(), Some("1 hour 5 mins"));
    }

    #[test]
    fn test_step_instructions() {
        let routes = candidates();
        let text = routes[0].first_leg().unwrap().instruction_text().unwrap();
        assert_eq!(
            text,
            "Head left on Shakti Khand Road Turn right onto Grand Trunk Road (NH 9) Arrive at your destination"
        );
        assert_eq!(classify_leg(routes[0].first_leg()), RoadSegmentCategory::NH9);
        assert_eq!(classify_leg(routes[1].first_leg()), RoadSegmentCategory::Indirapuram);
    }

    #[test]
    fn test_no_route_is_empty() {
        let body: OsrmRouteResponse =
            serde_json::from_str(r#"{"code":"NoRoute","message":"Impossible route between points"}"#).unwrap();
        assert!(body.into_candidates().unwrap().is_empty());
    }

    #[test]
    fn test_other_codes_are_errors() {
        let body: OsrmRouteResponse =
            serde_json::from_str(r#"{"code":"InvalidQuery","message":"Query string malformed"}"#).unwrap();
        match body.into_candidates() {
            Err(RoutingError::Provider { status, message }) => {
                assert_eq!(status, "InvalidQuery");
                assert_eq!(message, "Query string malformed");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_lat_lng() {
        assert_eq!(parse_lat_lng("28.6412, 77.3706").unwrap(), LatLng::new(28.6412, 77.3706));
        assert!(parse_lat_lng("Indirapuram, Ghaziabad").is_err());
        assert!(parse_lat_lng("28.6").is_err());
        assert!(parse_lat_lng("128.6,77.3").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(20.0), "1 min");
        assert_eq!(format_duration(1500.0), "25 mins");
        assert_eq!(format_duration(3600.0), "1 hour");
        assert_eq!(format_duration(3900.0), "1 hour 5 mins");
        assert_eq!(format_duration(7260.0), "2 hours 1 min");
    }

    #[test]
    fn test_route_url() {
        let client = OsrmClient::new(OsrmConfig::default()).unwrap();
        let url = client.route_url(LatLng::new(28.6412, 77.3706), LatLng::new(28.6692, 77.4538), true);
        assert_eq!(
            url,
            "http://localhost:5000/route/v1/driving/77.370600,28.641200;77.453800,28.669200?alternatives=true&steps=true&overview=full&geometries=polyline"
        );
    }
}
