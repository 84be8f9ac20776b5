//! Minimum freight estimate and toll plazas crossed by a route.
//!
//! The route geometry comes from a routing service outside this crate;
//! here it is just a list of points.

use crate::errors::{AppError, AppResult};
use crate::models::{GeoPoint, TollPlaza};
use clap::ValueEnum;
use serde::Serialize;

const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A plaza closer than this to any sampled route point is on the route.
pub const TOLL_RADIUS_KM: f64 = 5.0;

/// Only every Nth route point is tested against the plaza table.
pub const ROUTE_SAMPLE_STEP: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum VehicleClass {
    Carreta,
    CarretaTrucada,
    Truck,
    RodoTrem,
    Vanderleia,
}

impl VehicleClass {
    /// Minimum freight rate, BRL per km.
    pub fn rate_per_km(&self) -> f64 {
        match self {
            VehicleClass::Carreta => 7.0,
            VehicleClass::CarretaTrucada => 8.0,
            VehicleClass::Truck => 5.0,
            VehicleClass::RodoTrem => 15.0,
            VehicleClass::Vanderleia => 11.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleClass::Carreta => "Carreta",
            VehicleClass::CarretaTrucada => "Carreta Trucada",
            VehicleClass::Truck => "Truck",
            VehicleClass::RodoTrem => "Rodo-trem",
            VehicleClass::Vanderleia => "Vanderleia",
        }
    }

    pub fn from_label(s: &str) -> AppResult<Self> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], " ");
        [
            VehicleClass::Carreta,
            VehicleClass::CarretaTrucada,
            VehicleClass::Truck,
            VehicleClass::RodoTrem,
            VehicleClass::Vanderleia,
        ]
        .into_iter()
        .find(|v| v.label().to_lowercase().replace('-', " ") == wanted)
        .ok_or_else(|| AppError::InvalidVehicle(s.to_string()))
    }
}

pub fn estimate_freight(distance_km: f64, vehicle: VehicleClass) -> f64 {
    distance_km.max(0.0) * vehicle.rate_per_km()
}

/// Great-circle distance in km.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Plazas within `TOLL_RADIUS_KM` of the sampled route, in table order.
pub fn tolls_on_route<'a>(route: &[GeoPoint], plazas: &'a [TollPlaza]) -> Vec<&'a TollPlaza> {
    let sampled: Vec<GeoPoint> = route.iter().step_by(ROUTE_SAMPLE_STEP).copied().collect();

    plazas
        .iter()
        .filter(|p| {
            sampled
                .iter()
                .any(|pt| haversine_km(*pt, p.location) < TOLL_RADIUS_KM)
        })
        .collect()
}

pub fn toll_total(plazas: &[&TollPlaza]) -> f64 {
    plazas.iter().map(|p| p.light_fee).sum()
}

/// Route length along its points, km.
pub fn route_distance_km(route: &[GeoPoint]) -> f64 {
    route.windows(2).map(|w| haversine_km(w[0], w[1])).sum()
}
