//! Feature encoding for the speed estimator.
//!
//! The layout is a hard contract with whatever estimator is loaded: the
//! field order below is the order the model was trained on. It is carried
//! as an explicit [`FeatureSchema`] so a mismatched model fails at load time
//! instead of silently producing wrong speeds.

use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::SchemaMismatch;
use crate::segment::RoadSegmentCategory;
use crate::weather::WeatherCategory;

pub const FEATURE_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureField {
    Weekday,
    Hour,
    SegmentGtRoad,
    SegmentIndirapuram,
    SegmentNh9,
    WeatherClear,
    WeatherClouds,
    WeatherFog,
    WeatherHaze,
    WeatherRain,
}

impl FeatureField {
    pub fn for_segment(segment: RoadSegmentCategory) -> Self {
        match segment {
            RoadSegmentCategory::GTRoad => FeatureField::SegmentGtRoad,
            RoadSegmentCategory::Indirapuram => FeatureField::SegmentIndirapuram,
            RoadSegmentCategory::NH9 => FeatureField::SegmentNh9,
        }
    }

    pub fn for_weather(weather: WeatherCategory) -> Self {
        match weather {
            WeatherCategory::Clear => FeatureField::WeatherClear,
            WeatherCategory::Clouds => FeatureField::WeatherClouds,
            WeatherCategory::Fog => FeatureField::WeatherFog,
            WeatherCategory::Haze => FeatureField::WeatherHaze,
            WeatherCategory::Rain => FeatureField::WeatherRain,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FeatureField::Weekday => "weekday",
            FeatureField::Hour => "hour",
            FeatureField::SegmentGtRoad => "segment_gt_road",
            FeatureField::SegmentIndirapuram => "segment_indirapuram",
            FeatureField::SegmentNh9 => "segment_nh9",
            FeatureField::WeatherClear => "weather_clear",
            FeatureField::WeatherClouds => "weather_clouds",
            FeatureField::WeatherFog => "weather_fog",
            FeatureField::WeatherHaze => "weather_haze",
            FeatureField::WeatherRain => "weather_rain",
        }
    }
}

const CURRENT_FIELDS: [FeatureField; FEATURE_COUNT] = [
    FeatureField::Weekday,
    FeatureField::Hour,
    FeatureField::SegmentGtRoad,
    FeatureField::SegmentIndirapuram,
    FeatureField::SegmentNh9,
    FeatureField::WeatherClear,
    FeatureField::WeatherClouds,
    FeatureField::WeatherFog,
    FeatureField::WeatherHaze,
    FeatureField::WeatherRain,
];

const CURRENT_VERSION: u32 = 3;

/// Ordered, versioned list of named fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub fields: Vec<FeatureField>,
}

impl FeatureSchema {
    pub fn current() -> Self {
        Self {
            version: CURRENT_VERSION,
            fields: CURRENT_FIELDS.to_vec(),
        }
    }

    pub fn ensure_compatible(&self, other: &FeatureSchema) -> Result<(), SchemaMismatch> {
        if self == other {
            Ok(())
        } else {
            Err(SchemaMismatch {
                expected: self.clone(),
                found: other.clone(),
            })
        }
    }

    pub fn position(&self, field: FeatureField) -> Option<usize> {
        self.fields.iter().position(|f| *f == field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for FeatureSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.fields.iter().map(FeatureField::name).collect::<Vec<_>>();
        write!(f, "v{}[{}]", self.version, names.join(","))
    }
}

/// Fixed-length encoding of one (weekday, hour, segment, weather) tuple in
/// [`FeatureSchema::current`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// `weekday` is Monday = 0 through Sunday = 6, `hour` is 0-23.
    pub fn build(
        weekday: u32,
        hour: u32,
        segment: RoadSegmentCategory,
        weather: WeatherCategory,
    ) -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        values[slot(FeatureField::Weekday)] = f64::from(weekday);
        values[slot(FeatureField::Hour)] = f64::from(hour);
        values[slot(FeatureField::for_segment(segment))] = 1.0;
        values[slot(FeatureField::for_weather(weather))] = 1.0;
        Self { values }
    }

    pub fn for_departure(
        departure: NaiveDateTime,
        segment: RoadSegmentCategory,
        weather: WeatherCategory,
    ) -> Self {
        Self::build(
            departure.weekday().num_days_from_monday(),
            departure.hour(),
            segment,
            weather,
        )
    }

    /// Wrap raw values that are already in schema order.
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, field: FeatureField) -> f64 {
        self.values[slot(field)]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

fn slot(field: FeatureField) -> usize {
    match field {
        FeatureField::Weekday => 0,
        FeatureField::Hour => 1,
        FeatureField::SegmentGtRoad => 2,
        FeatureField::SegmentIndirapuram => 3,
        FeatureField::SegmentNh9 => 4,
        FeatureField::WeatherClear => 5,
        FeatureField::WeatherClouds => 6,
        FeatureField::WeatherFog => 7,
        FeatureField::WeatherHaze => 8,
        FeatureField::WeatherRain => 9,
    }
}
