//! Monitoring-station models for the map/overview surface.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One monitoring station with its latest readings.
#[derive(Debug, Clone, Serialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub aqi: i32,
    pub pm25: i32,
    pub pm10: i32,
    /// Dominant pollutant label (PM2.5 for the Kolkata region year-round).
    pub dominant: String,
    #[serde(rename = "lastUpdate")]
    pub last_update: DateTime<Utc>,
}

/// Station listing together with cache provenance, mirroring the dashboard's
/// station endpoint payload.
#[derive(Debug, Clone, Serialize)]
pub struct StationsOverview {
    pub cached: bool,
    pub count: usize,
    pub data: Vec<Station>,
}
