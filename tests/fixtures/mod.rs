//! Test fixtures for trip-planner.
//!
//! Provides:
//! - Named Ghaziabad / Noida locations on the three modelled corridors
//! - Builders for candidate routes
//! - A recorded Directions API response

#![allow(dead_code)]

pub mod ncr_locations;
pub mod routes;

pub use ncr_locations::*;
pub use routes::*;

/// Directions API response for Indirapuram to Raj Nagar with three alternatives.
pub const DIRECTIONS_RESPONSE: &str = include_str!("directions_indirapuram_raj_nagar.json");
