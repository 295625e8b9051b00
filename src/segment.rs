//! Road segment categories and route classification.
//!
//! A route is mapped to one of a fixed set of corridors by looking for road
//! names in its turn-by-turn instructions. Matching runs on the raw text,
//! markup included.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::route::RouteLeg;

/// The corridors the speed model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoadSegmentCategory {
    #[serde(rename = "segment_nh9")]
    NH9,
    #[serde(rename = "segment_gt_road")]
    GTRoad,
    #[serde(rename = "segment_indirapuram")]
    Indirapuram,
}

impl RoadSegmentCategory {
    pub const ALL: [RoadSegmentCategory; 3] = [
        RoadSegmentCategory::NH9,
        RoadSegmentCategory::GTRoad,
        RoadSegmentCategory::Indirapuram,
    ];

    /// Category used whenever a route can't be classified.
    pub const FALLBACK: RoadSegmentCategory = RoadSegmentCategory::Indirapuram;

    pub fn id(&self) -> &'static str {
        match self {
            RoadSegmentCategory::NH9 => "segment_nh9",
            RoadSegmentCategory::GTRoad => "segment_gt_road",
            RoadSegmentCategory::Indirapuram => "segment_indirapuram",
        }
    }
}

impl fmt::Display for RoadSegmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

const NH9_MARKERS: [&str; 2] = ["NH", "Expressway"];
const GT_ROAD_MARKERS: [&str; 2] = ["GT Rd", "Grand Trunk"];

/// Classify concatenated instruction text. First match wins, NH9 before GT Road.
pub fn classify(instruction_text: &str) -> RoadSegmentCategory {
    let contains_any = |markers: &[&str]| markers.iter().any(|m| instruction_text.contains(m));

    if contains_any(&NH9_MARKERS) {
        RoadSegmentCategory::NH9
    } else if contains_any(&GT_ROAD_MARKERS) {
        RoadSegmentCategory::GTRoad
    } else {
        RoadSegmentCategory::FALLBACK
    }
}

/// Classify a route leg by joining all of its step instructions.
///
/// A leg with no steps, or with any step missing its instruction, falls back
/// to [`RoadSegmentCategory::FALLBACK`].
pub fn classify_leg(leg: Option<&RouteLeg>) -> RoadSegmentCategory {
    match leg.and_then(RouteLeg::instruction_text) {
        Some(text) => classify(&text),
        None => {
            tracing::debug!("route leg has no usable instructions, using fallback segment");
            RoadSegmentCategory::FALLBACK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteStep;

    fn leg_with(instructions: &[Option<&str>]) -> RouteLeg {
        RouteLeg {
            steps: instructions
                .iter()
                .map(|text| RouteStep {
                    instruction: text.map(str::to_string),
                })
                .collect(),
            ..RouteLeg::default()
        }
    }

    #[test]
    fn test_nh_marker() {
        assert_eq!(classify("Take the NH-9 Expressway north"), RoadSegmentCategory::NH9);
        assert_eq!(classify("Merge onto <b>NH 24</b>"), RoadSegmentCategory::NH9);
        assert_eq!(classify("Continue on Delhi-Meerut Expressway"), RoadSegmentCategory::NH9);
    }

    #[test]
    fn test_gt_road_marker() {
        assert_eq!(classify("Turn right onto <b>GT Rd</b>"), RoadSegmentCategory::GTRoad);
        assert_eq!(classify("Continue onto Grand Trunk Road"), RoadSegmentCategory::GTRoad);
    }

    #[test]
    fn test_nh_checked_before_gt_road() {
        let text = "Turn left onto GT Rd then merge onto NH 9";
        assert_eq!(classify(text), RoadSegmentCategory::NH9);
    }

    #[test]
    fn test_unmatched_falls_back() {
        assert_eq!(classify("Head north on Shakti Khand Rd"), RoadSegmentCategory::Indirapuram);
        assert_eq!(classify(""), RoadSegmentCategory::Indirapuram);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert_eq!(classify("take the expressway"), RoadSegmentCategory::Indirapuram);
    }

    #[test]
    fn test_markup_is_not_stripped() {
        // "G<b>T Rd" does not contain the marker once markup splits it.
        assert_eq!(classify("Turn onto G<b>T Rd</b>"), RoadSegmentCategory::Indirapuram);
    }

    #[test]
    fn test_leg_joins_steps() {
        let leg = leg_with(&[Some("Head <b>east</b>"), Some("Turn onto Grand Trunk Road")]);
        assert_eq!(classify_leg(Some(&leg)), RoadSegmentCategory::GTRoad);
    }

    #[test]
    fn test_malformed_leg_falls_back() {
        let leg = leg_with(&[Some("Merge onto NH 9"), None]);
        assert_eq!(classify_leg(Some(&leg)), RoadSegmentCategory::Indirapuram);
        assert_eq!(classify_leg(Some(&leg_with(&[]))), RoadSegmentCategory::Indirapuram);
        assert_eq!(classify_leg(None), RoadSegmentCategory::Indirapuram);
    }
}
