//! Picks the recommended route.

use crate::error::EmptyInputError;
use crate::route::ScoredRoute;

/// Flag the route with the smallest estimated duration as recommended.
///
/// Ties go to the lowest index. Every other route keeps `recommended` unset.
pub fn rank(mut routes: Vec<ScoredRoute>) -> Result<Vec<ScoredRoute>, EmptyInputError> {
    let best = best_index(&routes).ok_or(EmptyInputError)?;
    routes[best].recommended = Some(true);
    Ok(routes)
}

/// `total_cmp` orders NaN after every finite duration, so a NaN never wins
/// over a finite route. `min_by` keeps the first of equal minimums.
fn best_index(routes: &[ScoredRoute]) -> Option<usize> {
    routes
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.duration_seconds.total_cmp(&b.duration_seconds))
        .map(|(index, _)| index)
}
