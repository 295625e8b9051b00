//! Builders for candidate routes.

use trip_planner::route::{CandidateRoute, LatLng, RouteLeg, RouteStep};

use super::ncr_locations::{INDIRAPURAM, RAJ_NAGAR};

pub struct RouteBuilder {
    summary: Option<String>,
    instructions: Vec<Option<String>>,
    distance_meters: Option<f64>,
    duration_text: Option<String>,
    start: Option<LatLng>,
    end: Option<LatLng>,
    polyline: String,
    has_leg: bool,
}

impl RouteBuilder {
    pub fn new(distance_meters: f64) -> Self {
        Self {
            summary: None,
            instructions: vec![Some("Head <b>north</b>".to_string())],
            distance_meters: Some(distance_meters),
            duration_text: Some("20 mins".to_string()),
            start: Some(INDIRAPURAM.lat_lng()),
            end: Some(RAJ_NAGAR.lat_lng()),
            polyline: "kzwmDaxxzM".to_string(),
            has_leg: true,
        }
    }

    pub fn summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    pub fn via(mut self, instruction: &str) -> Self {
        self.instructions.push(Some(instruction.to_string()));
        self
    }

    pub fn step_without_instruction(mut self) -> Self {
        self.instructions.push(None);
        self
    }

    pub fn no_distance(mut self) -> Self {
        self.distance_meters = None;
        self
    }

    pub fn no_duration_text(mut self) -> Self {
        self.duration_text = None;
        self
    }

    pub fn no_leg(mut self) -> Self {
        self.has_leg = false;
        self
    }

    pub fn polyline(mut self, encoded: &str) -> Self {
        self.polyline = encoded.to_string();
        self
    }

    pub fn build(self) -> CandidateRoute {
        let legs = if self.has_leg {
            vec![RouteLeg {
                steps: self
                    .instructions
                    .into_iter()
                    .map(|instruction| RouteStep { instruction })
                    .collect(),
                distance_meters: self.distance_meters,
                duration_text: self.duration_text,
                start_location: self.start,
                end_location: self.end,
            }]
        } else {
            Vec::new()
        };

        CandidateRoute {
            summary: self.summary,
            legs,
            overview_polyline: self.polyline,
        }
    }
}

/// One route per corridor: NH 9 (10 km), GT Road (12 km), Indirapuram (9 km).
pub fn three_corridors() -> Vec<CandidateRoute> {
    vec![
        RouteBuilder::new(10_000.0)
            .summary("NH 9")
            .via("Take the NH-9 Expressway north")
            .build(),
        RouteBuilder::new(12_000.0)
            .summary("GT Rd")
            .via("Turn right onto <b>GT Rd</b>")
            .build(),
        RouteBuilder::new(9_000.0)
            .summary("Shakti Khand Rd")
            .via("Continue onto <b>Shakti Khand Rd</b>")
            .build(),
    ]
}
