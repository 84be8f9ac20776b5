use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Toll plaza from the plaza table ("praca", "rodovia", "lat", "lon", "valor_leve").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TollPlaza {
    pub name: String,
    pub highway: String,
    pub location: GeoPoint,
    /// Fee for light vehicles, BRL.
    pub light_fee: f64,
}
