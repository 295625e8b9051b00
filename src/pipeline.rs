//! Trip analysis: fetch candidate routes, estimate each one's travel time and
//! recommend the fastest.

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use rayon::prelude::*;

use crate::error::{EmptyInputError, EstimatorError, RoutingError, SchemaMismatch, TripAnalysisError};
use crate::features::{FeatureSchema, FeatureVector};
use crate::polyline::Polyline;
use crate::ranking::rank;
use crate::route::{CandidateRoute, LatLng, MISSING_DURATION_TEXT, ScoredRoute, TripAnalysis};
use crate::scoring::score;
use crate::segment::classify_leg;
use crate::traits::{RouteProvider, RouteQuery, SpeedEstimator, WeatherProvider};
use crate::weather::{WeatherCategory, resolve_weather};

/// One trip to analyze. Origin and destination must be non-empty; callers
/// validate that before calling the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub origin: String,
    pub destination: String,
    /// `None` means leaving now.
    pub departure: Option<NaiveDateTime>,
}

impl TripRequest {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure: None,
        }
    }

    pub fn departing_at(mut self, departure: NaiveDateTime) -> Self {
        self.departure = Some(departure);
        self
    }
}

/// Trip-level inputs shared by every candidate route in one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripContext {
    pub departure: NaiveDateTime,
    /// True when the caller supplied a departure time.
    pub is_future: bool,
    pub weather: WeatherCategory,
}

impl TripContext {
    pub fn resolve<W: WeatherProvider + ?Sized>(
        departure: Option<NaiveDateTime>,
        now: NaiveDateTime,
        weather: &W,
    ) -> Self {
        let is_future = departure.is_some();
        Self {
            departure: departure.unwrap_or(now),
            is_future,
            weather: resolve_weather(weather, is_future),
        }
    }

    /// Monday = 0 through Sunday = 6.
    pub fn weekday(&self) -> u32 {
        self.departure.weekday().num_days_from_monday()
    }

    pub fn hour(&self) -> u32 {
        self.departure.hour()
    }
}

#[derive(thiserror::Error, Debug)]
enum StageError {
    #[error("routing provider failed: {0}")]
    Routing(#[from] RoutingError),
    #[error("route {index} has no legs")]
    MissingLeg { index: usize },
    #[error("route {index} has no distance")]
    MissingDistance { index: usize },
    #[error("speed estimate for route {index} failed: {source}")]
    Estimator { index: usize, source: EstimatorError },
    #[error(transparent)]
    Ranking(#[from] EmptyInputError),
    #[error("cannot determine trip start and end locations")]
    MissingEndpoints,
}

impl From<StageError> for TripAnalysisError {
    fn from(err: StageError) -> Self {
        tracing::error!(error = %err, "trip analysis failed");
        TripAnalysisError::Failed(err.to_string())
    }
}

/// Scores candidate routes with a speed estimator and recommends one.
///
/// Collaborators are injected once and only read afterwards, so one pipeline
/// can serve many analyses.
#[derive(Debug)]
pub struct TripAnalysisPipeline<R, W, E> {
    routes: R,
    weather: W,
    estimator: E,
}

impl<R, W, E> TripAnalysisPipeline<R, W, E>
where
    R: RouteProvider,
    W: WeatherProvider,
    E: SpeedEstimator,
{
    /// Fails if the estimator was trained on a different feature layout.
    pub fn new(routes: R, weather: W, estimator: E) -> Result<Self, SchemaMismatch> {
        FeatureSchema::current().ensure_compatible(&estimator.schema())?;
        Ok(Self {
            routes,
            weather,
            estimator,
        })
    }

    pub fn analyze(&self, request: &TripRequest) -> Result<TripAnalysis, TripAnalysisError> {
        self.analyze_at(request, Local::now().naive_local())
    }

    /// Same as [`Self::analyze`] with an explicit clock for "now" trips.
    pub fn analyze_at(
        &self,
        request: &TripRequest,
        now: NaiveDateTime,
    ) -> Result<TripAnalysis, TripAnalysisError> {
        let _span = tracing::info_span!(
            "trip_analysis",
            origin = %request.origin,
            destination = %request.destination
        )
        .entered();

        let query = RouteQuery::driving(&request.origin, &request.destination, request.departure);
        let candidates = self.routes.routes(&query).map_err(StageError::from)?;
        if candidates.is_empty() {
            tracing::warn!("routing provider returned no routes");
            return Err(TripAnalysisError::NoRoutesFound {
                origin: request.origin.clone(),
                destination: request.destination.clone(),
            });
        }

        let context = TripContext::resolve(request.departure, now, &self.weather);
        tracing::info!(
            future = context.is_future,
            departure = %context.departure,
            weather = %context.weather,
            candidates = candidates.len(),
            "analyzing trip"
        );

        self.analyze_routes(&context, &candidates)
    }

    /// Score and rank an already fetched set of candidate routes.
    pub fn analyze_routes(
        &self,
        context: &TripContext,
        candidates: &[CandidateRoute],
    ) -> Result<TripAnalysis, TripAnalysisError> {
        Ok(self.score_and_rank(context, candidates)?)
    }

    /// Analyze independent trips in parallel. Results are in request order.
    pub fn analyze_batch(
        &self,
        requests: &[TripRequest],
    ) -> Vec<Result<TripAnalysis, TripAnalysisError>>
    where
        R: Sync,
        W: Sync,
        E: Sync,
    {
        let now = Local::now().naive_local();
        requests
            .par_iter()
            .map(|request| self.analyze_at(request, now))
            .collect()
    }

    fn score_and_rank(
        &self,
        context: &TripContext,
        candidates: &[CandidateRoute],
    ) -> Result<TripAnalysis, StageError> {
        let scored = candidates
            .iter()
            .enumerate()
            .map(|(index, route)| self.score_route(index, route, context))
            .collect::<Result<Vec<_>, _>>()?;
        let routes = rank(scored)?;

        if let Some(best) = routes.iter().find(|r| r.is_recommended()) {
            tracing::info!(
                summary = %best.summary,
                duration_seconds = best.duration_seconds,
                "recommended route"
            );
        }

        let (start_location, end_location) = trip_endpoints(&candidates[0])?;
        Ok(TripAnalysis {
            routes,
            weather: context.weather,
            start_location,
            end_location,
        })
    }

    fn score_route(
        &self,
        index: usize,
        route: &CandidateRoute,
        context: &TripContext,
    ) -> Result<ScoredRoute, StageError> {
        let leg = route.first_leg().ok_or(StageError::MissingLeg { index })?;
        let segment = classify_leg(Some(leg));
        let features = FeatureVector::build(context.weekday(), context.hour(), segment, context.weather);
        let predicted = self
            .estimator
            .predict(&features)
            .map_err(|source| StageError::Estimator { index, source })?;
        let distance = leg.distance_meters.ok_or(StageError::MissingDistance { index })?;
        let route_score = score(distance, predicted);

        tracing::debug!(
            index,
            %segment,
            predicted_speed_kph = predicted,
            duration_seconds = route_score.duration_seconds,
            "scored route"
        );

        Ok(ScoredRoute {
            summary: route
                .summary
                .clone()
                .unwrap_or_else(|| format!("Route {}", index + 1)),
            provider_duration_text: leg
                .duration_text
                .clone()
                .unwrap_or_else(|| MISSING_DURATION_TEXT.to_string()),
            duration_seconds: route_score.duration_seconds,
            speed_kph: route_score.speed_kph,
            polyline: route.overview_polyline.clone(),
            recommended: None,
        })
    }
}

impl<R, W, E> TripAnalysisPipeline<R, W, E> {
    pub fn route_provider(&self) -> &R {
        &self.routes
    }

    pub fn weather_provider(&self) -> &W {
        &self.weather
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }
}

/// Start and end of the trip, taken from the first candidate. Alternatives
/// share endpoints, so the other candidates are not consulted.
fn trip_endpoints(route: &CandidateRoute) -> Result<(LatLng, LatLng), StageError> {
    let leg = route.first_leg();
    let start = leg.and_then(|leg| leg.start_location);
    let end = leg.and_then(|leg| leg.end_location);
    if let (Some(start), Some(end)) = (start, end) {
        return Ok((start, end));
    }

    let geometry = Polyline::decode(&route.overview_polyline).ok();
    let start = start.or_else(|| geometry.as_ref().and_then(Polyline::first));
    let end = end.or_else(|| geometry.as_ref().and_then(Polyline::last));
    start.zip(end).ok_or(StageError::MissingEndpoints)
}
