//! trip-planner: travel time estimates for alternative driving routes.
//!
//! Candidate routes come from a routing provider; each one is classified into
//! a road segment, encoded with the trip's time and weather, given a speed by
//! a trained estimator, and the fastest is recommended.

pub mod config;
pub mod directions;
pub mod error;
pub mod estimator;
pub mod features;
pub mod osrm;
pub mod osrm_data;
pub mod pipeline;
pub mod polyline;
pub mod ranking;
pub mod route;
pub mod scoring;
pub mod segment;
pub mod traits;
pub mod weather;
