//! Ghaziabad / Noida locations for test fixtures.
//!
//! Coordinates are approximate and routable with the OSRM northern-zone extract.

use trip_planner::route::LatLng;

#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// "lat,lng" as accepted by the routing providers.
    pub fn query(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

pub const INDIRAPURAM: Location = Location::new("Shipra Mall, Indirapuram", 28.6340, 77.3700);
pub const RAJ_NAGAR: Location = Location::new("Raj Nagar District Centre", 28.6805, 77.4490);
pub const VAISHALI: Location = Location::new("Vaishali Metro", 28.6500, 77.3400);
pub const LAL_KUAN: Location = Location::new("Lal Kuan, NH 9", 28.6180, 77.4360);
pub const MOHAN_NAGAR: Location = Location::new("Mohan Nagar, GT Road", 28.6780, 77.3830);
