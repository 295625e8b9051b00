//! Travel time from distance and predicted speed.

/// Predictions below this, and non-finite ones, are treated as this speed.
pub const MIN_SPEED_KPH: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteScore {
    pub duration_seconds: f64,
    /// The clamped speed, rounded to two decimals.
    pub speed_kph: f64,
}

/// Score a route of `distance_meters` at `predicted_speed_kph`.
///
/// The speed is clamped to [`MIN_SPEED_KPH`] before dividing, so the duration
/// is finite and non-negative for any non-negative distance. The reported
/// speed is the clamped one, keeping speed and duration consistent.
pub fn score(distance_meters: f64, predicted_speed_kph: f64) -> RouteScore {
    let speed_kph = if predicted_speed_kph.is_finite() && predicted_speed_kph >= MIN_SPEED_KPH {
        predicted_speed_kph
    } else {
        tracing::warn!(
            predicted_speed_kph,
            clamped_to = MIN_SPEED_KPH,
            "speed estimate not usable, clamping"
        );
        MIN_SPEED_KPH
    };

    let distance_km = distance_meters / 1000.0;
    RouteScore {
        duration_seconds: distance_km / speed_kph * 3600.0,
        speed_kph: round2(speed_kph),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
