//! Speed estimators.
//!
//! [`ProfileSpeedModel`] is a deterministic baseline built from the corridor
//! speed profiles the historical data was generated from. [`LinearSpeedModel`]
//! loads an exported regression whose schema is checked at load time.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EstimatorError;
use crate::features::{FeatureField, FeatureSchema, FeatureVector};
use crate::segment::RoadSegmentCategory;
use crate::traits::SpeedEstimator;
use crate::weather::WeatherCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBand {
    Rush,
    Day,
    Night,
}

impl TimeBand {
    /// Rush is 07-10 and 17-20, day is 10-17, everything else is night.
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            7..=9 | 17..=19 => TimeBand::Rush,
            10..=16 => TimeBand::Day,
            _ => TimeBand::Night,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentProfile {
    pub rush_kph: f64,
    pub day_kph: f64,
    pub night_kph: f64,
    pub weekend_modifier: f64,
}

impl SegmentProfile {
    pub fn base_speed(&self, band: TimeBand) -> f64 {
        match band {
            TimeBand::Rush => self.rush_kph,
            TimeBand::Day => self.day_kph,
            TimeBand::Night => self.night_kph,
        }
    }
}

/// Expected speed for a segment, time and weather, without sampling noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSpeedModel {
    pub nh9: SegmentProfile,
    pub gt_road: SegmentProfile,
    pub indirapuram: SegmentProfile,
    pub clear_modifier: f64,
    pub clouds_modifier: f64,
    pub fog_modifier: f64,
    pub haze_modifier: f64,
    pub rain_modifier: f64,
}

impl Default for ProfileSpeedModel {
    fn default() -> Self {
        Self {
            nh9: SegmentProfile {
                rush_kph: 25.0,
                day_kph: 60.0,
                night_kph: 80.0,
                weekend_modifier: 1.1,
            },
            gt_road: SegmentProfile {
                rush_kph: 15.0,
                day_kph: 35.0,
                night_kph: 50.0,
                weekend_modifier: 1.0,
            },
            indirapuram: SegmentProfile {
                rush_kph: 10.0,
                day_kph: 25.0,
                night_kph: 40.0,
                weekend_modifier: 1.2,
            },
            clear_modifier: 1.0,
            clouds_modifier: 0.95,
            fog_modifier: 0.5,
            haze_modifier: 0.9,
            rain_modifier: 0.7,
        }
    }
}

impl ProfileSpeedModel {
    pub fn profile(&self, segment: RoadSegmentCategory) -> &SegmentProfile {
        match segment {
            RoadSegmentCategory::NH9 => &self.nh9,
            RoadSegmentCategory::GTRoad => &self.gt_road,
            RoadSegmentCategory::Indirapuram => &self.indirapuram,
        }
    }

    pub fn weather_modifier(&self, weather: WeatherCategory) -> f64 {
        match weather {
            WeatherCategory::Clear => self.clear_modifier,
            WeatherCategory::Clouds => self.clouds_modifier,
            WeatherCategory::Fog => self.fog_modifier,
            WeatherCategory::Haze => self.haze_modifier,
            WeatherCategory::Rain => self.rain_modifier,
        }
    }
}

impl SpeedEstimator for ProfileSpeedModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, EstimatorError> {
        let segment = RoadSegmentCategory::ALL
            .into_iter()
            .find(|s| features.get(FeatureField::for_segment(*s)) == 1.0)
            .ok_or_else(|| EstimatorError::InvalidFeatures("no segment indicator set".into()))?;
        let weather = WeatherCategory::ALL
            .into_iter()
            .find(|w| features.get(FeatureField::for_weather(*w)) == 1.0)
            .ok_or_else(|| EstimatorError::InvalidFeatures("no weather indicator set".into()))?;

        let weekday = features.get(FeatureField::Weekday) as u32;
        let hour = features.get(FeatureField::Hour) as u32;

        let profile = self.profile(segment);
        let mut speed = profile.base_speed(TimeBand::for_hour(hour));
        if weekday >= 5 {
            speed *= profile.weekend_modifier;
        }
        Ok(speed * self.weather_modifier(weather))
    }
}

/// Linear regression over the feature vector, exported as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSpeedModel {
    schema: FeatureSchema,
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LinearSpeedModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Result<Self, EstimatorError> {
        Self::validated(FeatureSchema::current(), intercept, coefficients)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EstimatorError> {
        let path = path.as_ref();
        let load_error = |message: String| EstimatorError::Load {
            path: path.display().to_string(),
            message,
        };

        let text = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        let model: LinearSpeedModel =
            serde_json::from_str(&text).map_err(|e| load_error(e.to_string()))?;
        let model = Self::validated(model.schema, model.intercept, model.coefficients)?;

        tracing::info!(path = %path.display(), schema = %model.schema, "loaded linear speed model");
        Ok(model)
    }

    fn validated(
        schema: FeatureSchema,
        intercept: f64,
        coefficients: Vec<f64>,
    ) -> Result<Self, EstimatorError> {
        FeatureSchema::current().ensure_compatible(&schema)?;
        if coefficients.len() != schema.len() {
            return Err(EstimatorError::InvalidFeatures(format!(
                "{} coefficients for {} features",
                coefficients.len(),
                schema.len()
            )));
        }

        Ok(Self {
            schema,
            intercept,
            coefficients,
        })
    }
}

impl SpeedEstimator for LinearSpeedModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, EstimatorError> {
        let weighted: f64 = self
            .coefficients
            .iter()
            .zip(features.as_slice())
            .map(|(c, x)| c * x)
            .sum();
        Ok(self.intercept + weighted)
    }

    fn schema(&self) -> FeatureSchema {
        self.schema.clone()
    }
}
